//! Renderer-agnostic chart specifications.
//!
//! A [`ChartSpec`] describes one chart completely (kind, labels, aligned
//! series, colors, display options) without referencing any drawing
//! library; the hosting layer maps it onto whatever renderer it uses.

use serde::Serialize;

/// Fixed 8-color palette, cycled by index for per-participant charts.
pub const PALETTE: [&str; 8] = [
    "#25D366", "#a78bfa", "#22d3ee", "#fbbf24", "#fb923c", "#f472b6", "#34d399", "#818cf8",
];

pub const POSITIVE_COLOR: &str = "#25D366";
pub const NEGATIVE_COLOR: &str = "#ef4444";
pub const NEUTRAL_COLOR: &str = "#94a3b8";

/// Color for the i-th item of a participant chart.
pub fn palette_color(index: usize) -> String {
    PALETTE[index % PALETTE.len()].to_string()
}

/// Suggested render-surface extent for charts with one bar per
/// participant: 40 units per bar, clamped so dense lists stay legible
/// and short lists don't collapse.
pub fn surface_extent(items: usize) -> u32 {
    ((items as u32) * 40).clamp(180, 600)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Doughnut,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// One numeric sequence aligned to the spec's labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub values: Vec<f64>,
    /// One color per value.
    pub colors: Vec<String>,
}

impl Series {
    /// Series painted in a single color.
    pub fn solid(label: Option<String>, values: Vec<f64>, color: &str) -> Self {
        let colors = vec![color.to_string(); values.len()];
        Series {
            label,
            values,
            colors,
        }
    }

    /// Series cycling through the palette by index.
    pub fn cycled(label: Option<String>, values: Vec<f64>) -> Self {
        let colors = (0..values.len()).map(palette_color).collect();
        Series {
            label,
            values,
            colors,
        }
    }
}

/// Inclusive display bounds for the value axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

/// Complete description of one chart. Empty input still yields a valid
/// spec (empty labels and series), never an absent one, for facets that
/// must always replace their previous chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub series: Vec<Series>,
    pub orientation: Orientation,
    pub begin_at_zero: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
    /// Empty-state hint shown in place of data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    /// Unit suffix for axis ticks (e.g. "%", "min").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_suffix: Option<String>,
    /// Pre-formatted tooltip payload, one entry per label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tooltips: Option<Vec<String>>,
    /// Suggested render-surface extent for dense participant lists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_extent: Option<u32>,
}

impl ChartSpec {
    pub fn new(kind: ChartKind, labels: Vec<String>, series: Vec<Series>) -> Self {
        ChartSpec {
            kind,
            labels,
            series,
            orientation: Orientation::Vertical,
            begin_at_zero: true,
            bounds: None,
            hint: None,
            value_suffix: None,
            tooltips: None,
            suggested_extent: None,
        }
    }

    pub fn horizontal(mut self) -> Self {
        self.orientation = Orientation::Horizontal;
        self
    }

    pub fn with_bounds(mut self, min: f64, max: f64) -> Self {
        self.bounds = Some(Bounds { min, max });
        self
    }

    pub fn with_hint(mut self, hint: String) -> Self {
        self.hint = Some(hint);
        self
    }

    pub fn with_suffix(mut self, suffix: String) -> Self {
        self.value_suffix = Some(suffix);
        self
    }

    pub fn with_tooltips(mut self, tooltips: Vec<String>) -> Self {
        self.tooltips = Some(tooltips);
        self
    }

    pub fn with_extent(mut self, items: usize) -> Self {
        self.suggested_extent = Some(surface_extent(items));
        self
    }

    /// Every series must carry exactly one value (and color) per label.
    pub fn is_aligned(&self) -> bool {
        self.series
            .iter()
            .all(|s| s.values.len() == self.labels.len() && s.colors.len() == self.labels.len())
    }
}

/// One ranked entry of the conversation-starter podium.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PodiumEntry {
    pub rank: usize,
    /// Medal glyph for ranks 1-3, "#N" beyond that.
    pub medal: String,
    pub name: String,
    pub count: f64,
    /// Pre-formatted percentage supplied by the backend.
    pub percentage: String,
    /// Bar width relative to the leader, 0-100.
    pub bar_width: f64,
    pub color: String,
}

/// Ranked top-5 list of conversation starters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Podium {
    pub entries: Vec<PodiumEntry>,
}
