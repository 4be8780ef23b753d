//! Markdown rendering of a built dashboard.
//!
//! Bar and doughnut facets render as text bar sketches inside code fences;
//! labels are padded by display width so emoji and wide glyphs line up.

use anyhow::Result;
use unicode_width::UnicodeWidthStr;

use crate::chart::{ChartKind, ChartSpec, Podium};
use crate::dashboard::Dashboard;
use crate::labels::Labels;
use crate::summary::PLACEHOLDER;

const SKETCH_WIDTH: usize = 30;

/// Render a dashboard to Markdown.
pub fn render(dashboard: &Dashboard, labels: &Labels) -> Result<String> {
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", labels.get("report.title")));

    render_summary(&mut output, dashboard, labels);

    for (facet, spec) in &dashboard.charts {
        output.push_str(&format!("### {}\n", labels.get(facet.title_key())));
        render_chart(&mut output, spec);
    }

    if let Some(ref podium) = dashboard.starters {
        output.push_str(&format!(
            "### {}\n",
            labels.get("chart.conversationStarters")
        ));
        render_podium(&mut output, podium, labels);
    }

    Ok(output)
}

fn render_summary(output: &mut String, dashboard: &Dashboard, labels: &Labels) {
    output.push_str(&format!("## {}\n", labels.get("report.summary")));

    let slot = |key: &str| {
        dashboard
            .summaries
            .get(key)
            .cloned()
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    };
    let with_detail = |value: String, detail: String| {
        if detail.is_empty() {
            value
        } else {
            format!("{} ({})", value, detail)
        }
    };

    let lines = [
        ("stats.totalMessages", slot("total_messages")),
        ("stats.participants", slot("participants")),
        ("stats.mediaShared", slot("media_shared")),
        (
            "stats.timeSpan",
            with_detail(slot("time_span"), slot("total_days")),
        ),
        (
            "stats.activeDays",
            with_detail(slot("active_days"), slot("active_days_detail")),
        ),
        ("stats.avgMessages", slot("avg_messages")),
        ("stats.emojisUsed", slot("emoji_count")),
        ("stats.hoursChatting", slot("hours_chatting")),
    ];

    for (key, value) in lines {
        output.push_str(&format!("- **{}:** {}\n", labels.get(key), value));
    }
    output.push('\n');
}

fn render_chart(output: &mut String, spec: &ChartSpec) {
    if spec.labels.is_empty() {
        if let Some(ref hint) = spec.hint {
            output.push_str(&format!("*{}*\n\n", hint));
        }
        return;
    }

    match spec.kind {
        ChartKind::Bar | ChartKind::Doughnut => render_bar_sketch(output, spec),
        ChartKind::Line => render_value_table(output, spec),
    }
}

/// Proportional bar sketch; one row per label.
fn render_bar_sketch(output: &mut String, spec: &ChartSpec) {
    let Some(series) = spec.series.first() else {
        return;
    };

    let max_value = series.values.iter().cloned().fold(0.0_f64, f64::max);
    let label_width = spec
        .labels
        .iter()
        .map(|l| UnicodeWidthStr::width(l.as_str()))
        .max()
        .unwrap_or(0);

    output.push_str("```\n");
    for (label, &value) in spec.labels.iter().zip(&series.values) {
        let bar_len = if max_value > 0.0 {
            ((value / max_value) * SKETCH_WIDTH as f64).round() as usize
        } else {
            0
        };
        let padding = label_width.saturating_sub(UnicodeWidthStr::width(label.as_str()));
        output.push_str(&format!(
            "{}{}  {} {}{}\n",
            label,
            " ".repeat(padding),
            "█".repeat(bar_len.max(1)),
            format_value(value),
            spec.value_suffix
                .as_deref()
                .map(|s| format!(" {}", s))
                .unwrap_or_default(),
        ));
    }
    output.push_str("```\n\n");
}

fn render_value_table(output: &mut String, spec: &ChartSpec) {
    let Some(series) = spec.series.first() else {
        return;
    };

    output.push_str("| Date | Value |\n");
    output.push_str("| ---- | ----- |\n");
    for (label, &value) in spec.labels.iter().zip(&series.values) {
        output.push_str(&format!("| {} | {} |\n", label, format_value(value)));
    }
    output.push('\n');
}

fn render_podium(output: &mut String, podium: &Podium, labels: &Labels) {
    for entry in &podium.entries {
        output.push_str(&format!(
            "- {} **{}** — {} {} ({})\n",
            entry.medal,
            entry.name,
            format_value(entry.count),
            labels.get("report.conversations"),
            entry.percentage
        ));
    }
    output.push('\n');
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}
