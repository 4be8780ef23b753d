//! Dashboard assembly.
//!
//! [`Dashboard`] owns the registry of built chart specs keyed by facet and
//! the formatted summary slots. Rebuilding releases each facet's previous
//! spec before attempting the new one, so there is never more than one
//! live spec per facet, and a failure in one facet's builder is logged and
//! contained without aborting the rest.

use anyhow::Result;
use chrono::{Local, NaiveDate};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::chart::{ChartSpec, Podium};
use crate::facets;
use crate::labels::Labels;
use crate::snapshot::{is_valid_stats, Snapshot};
use crate::summary::{empty_summaries, format_summaries};
use crate::timerange::RangeSelector;

/// One analytic facet, mapped to exactly one chart specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    MessagesPerDay,
    ParticipantShare,
    ActivityByHour,
    TopWords,
    SentimentByUser,
    SentimentTimeline,
    TopEmojis,
    EmojiUsageByUser,
    ParticipationRate,
    ConversationStarters,
    ResponseTime,
    WordsPerMessage,
}

impl Facet {
    /// Build order; also the render order of the output map.
    pub const ALL: [Facet; 12] = [
        Facet::MessagesPerDay,
        Facet::ParticipantShare,
        Facet::ActivityByHour,
        Facet::TopWords,
        Facet::SentimentByUser,
        Facet::SentimentTimeline,
        Facet::TopEmojis,
        Facet::EmojiUsageByUser,
        Facet::ParticipationRate,
        Facet::ConversationStarters,
        Facet::ResponseTime,
        Facet::WordsPerMessage,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Facet::MessagesPerDay => "messages_per_day",
            Facet::ParticipantShare => "participant_share",
            Facet::ActivityByHour => "activity_by_hour",
            Facet::TopWords => "top_words",
            Facet::SentimentByUser => "sentiment_by_user",
            Facet::SentimentTimeline => "sentiment_timeline",
            Facet::TopEmojis => "top_emojis",
            Facet::EmojiUsageByUser => "emoji_usage_by_user",
            Facet::ParticipationRate => "participation_rate",
            Facet::ConversationStarters => "conversation_starters",
            Facet::ResponseTime => "response_time",
            Facet::WordsPerMessage => "words_per_message",
        }
    }

    /// Label key for the facet's section title.
    pub fn title_key(&self) -> &'static str {
        match self {
            Facet::MessagesPerDay => "chart.messagesPerDay",
            Facet::ParticipantShare => "chart.participants",
            Facet::ActivityByHour => "chart.activityByHour",
            Facet::TopWords => "chart.mostUsedWords",
            Facet::SentimentByUser => "chart.sentimentByUser",
            Facet::SentimentTimeline => "chart.sentimentTimeline",
            Facet::TopEmojis => "chart.favoriteEmojis",
            Facet::EmojiUsageByUser => "chart.emojisByUser",
            Facet::ParticipationRate => "chart.participation",
            Facet::ConversationStarters => "chart.conversationStarters",
            Facet::ResponseTime => "chart.avgResponseTime",
            Facet::WordsPerMessage => "chart.avgWordsPerMessage",
        }
    }
}

/// The complete derived output for one snapshot and view-parameter set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub charts: IndexMap<Facet, ChartSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starters: Option<Podium>,
    pub summaries: IndexMap<String, String>,
}

impl Dashboard {
    /// Empty state: no charts, every summary slot holds the placeholder.
    pub fn new() -> Self {
        Dashboard {
            charts: IndexMap::new(),
            starters: None,
            summaries: empty_summaries(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty() && self.starters.is_none()
    }

    /// Rebuilds every facet from a raw snapshot, using local today as the
    /// time-range reference.
    pub fn rebuild(&mut self, raw: &Value, range: RangeSelector, labels: &Labels) {
        self.rebuild_at(raw, range, labels, Local::now().date_naive());
    }

    /// Rebuilds every facet relative to an explicit reference date.
    ///
    /// An invalid snapshot short-circuits to the empty state. Otherwise
    /// each facet's previous spec is released first, then its builder runs
    /// behind a `Result` boundary: failures are logged and skipped while
    /// the remaining facets still build.
    pub fn rebuild_at(
        &mut self,
        raw: &Value,
        range: RangeSelector,
        labels: &Labels,
        today: NaiveDate,
    ) {
        if !is_valid_stats(raw) {
            debug!("snapshot invalid or empty, showing empty state");
            self.charts.clear();
            self.starters = None;
            self.summaries = empty_summaries();
            return;
        }

        let snapshot = Snapshot::from_value(raw);
        self.summaries = format_summaries(&snapshot, labels);

        for facet in Facet::ALL {
            // Release the previous spec before building the replacement
            self.charts.shift_remove(&facet);

            if facet == Facet::ConversationStarters {
                self.starters = match facets::conversation_starters(&snapshot) {
                    Ok(podium) => podium,
                    Err(err) => {
                        warn!(facet = facet.id(), error = %err, "facet build failed");
                        None
                    }
                };
                continue;
            }

            match build_facet(facet, &snapshot, range, today, labels) {
                Ok(Some(spec)) => {
                    self.charts.insert(facet, spec);
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(facet = facet.id(), error = %err, "facet build failed");
                }
            }
        }
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Dashboard::new()
    }
}

fn build_facet(
    facet: Facet,
    snapshot: &Snapshot,
    range: RangeSelector,
    today: NaiveDate,
    labels: &Labels,
) -> Result<Option<ChartSpec>> {
    match facet {
        Facet::MessagesPerDay => facets::messages_per_day(snapshot, range, today, labels),
        Facet::ParticipantShare => facets::participant_share(snapshot),
        Facet::ActivityByHour => facets::activity_by_hour(snapshot, labels),
        Facet::TopWords => facets::top_words(snapshot, labels),
        Facet::SentimentByUser => facets::sentiment_by_user(snapshot, labels),
        Facet::SentimentTimeline => facets::sentiment_timeline(snapshot, today, labels),
        Facet::TopEmojis => facets::top_emojis(snapshot),
        Facet::EmojiUsageByUser => facets::emoji_usage_by_user(snapshot),
        Facet::ParticipationRate => facets::participation_rate(snapshot),
        Facet::ResponseTime => facets::response_time(snapshot, labels),
        Facet::WordsPerMessage => facets::words_per_message(snapshot, labels),
        // Handled separately; the podium is not a chart spec
        Facet::ConversationStarters => Ok(None),
    }
}

/// Runs the full normalize → filter → build pipeline once.
pub fn build_dashboard(raw: &Value, range: RangeSelector, labels: &Labels) -> Dashboard {
    let mut dashboard = Dashboard::new();
    dashboard.rebuild(raw, range, labels);
    dashboard
}

/// Pipeline with an explicit reference date, for reproducible output.
pub fn build_dashboard_at(
    raw: &Value,
    range: RangeSelector,
    labels: &Labels,
    today: NaiveDate,
) -> Dashboard {
    let mut dashboard = Dashboard::new();
    dashboard.rebuild_at(raw, range, labels, today);
    dashboard
}
