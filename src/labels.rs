//! Display-string lookup.
//!
//! All user-facing text produced by the pipeline goes through a [`Labels`]
//! table so the hosting application can swap languages by re-running the
//! pipeline with a different table. Unmapped keys resolve to themselves,
//! which keeps the output readable even with an empty table.

use anyhow::{Context, Result};
use indexmap::IndexMap;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct Labels {
    table: IndexMap<String, String>,
}

impl Labels {
    /// Empty table; every lookup returns its key.
    pub fn empty() -> Self {
        Labels::default()
    }

    /// Built-in English table covering every key the pipeline emits.
    pub fn english() -> Self {
        let entries = [
            ("stats.totalMessages", "Total messages"),
            ("stats.participants", "Participants"),
            ("stats.activeDays", "Active days"),
            ("stats.timeSpan", "Time span"),
            ("stats.avgMessages", "Avg. messages/day"),
            ("stats.hoursChatting", "Hours chatting"),
            ("stats.emojisUsed", "Emojis used"),
            ("stats.mediaShared", "Media shared"),
            ("stats.ofTotalDays", "of total days"),
            ("stats.day", "day"),
            ("stats.days", "days"),
            ("chart.messagesPerDay", "Messages per day"),
            ("chart.participants", "Participants"),
            ("chart.activityByHour", "Activity by hour"),
            ("chart.mostUsedWords", "Most used words"),
            ("chart.favoriteEmojis", "Favorite emojis"),
            ("chart.emojisByUser", "Emojis by user"),
            ("chart.sentimentByUser", "Sentiment by user"),
            ("chart.sentimentTimeline", "Sentiment timeline"),
            ("chart.participation", "Participation (message %)"),
            ("chart.conversationStarters", "Conversation starters"),
            ("chart.avgResponseTime", "Avg. response time"),
            ("chart.avgWordsPerMessage", "Avg. words per message"),
            ("chart.messages", "Messages"),
            ("chart.frequency", "Frequency"),
            ("chart.sentiment", "Sentiment"),
            ("chart.noMessages", "No messages in this period"),
            ("chart.noData", "No sentiment data"),
            ("chart.unavailable", "Sentiment unavailable"),
            ("chart.avgTime", "Avg. time (min)"),
            ("chart.avgWords", "Avg. words"),
            ("chart.responses", "responses"),
            ("unit.minutes", "min"),
            ("unit.words", "words"),
            ("report.title", "Chat analytics"),
            ("report.summary", "Summary"),
            ("report.conversations", "convs"),
        ];
        let table = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Labels { table }
    }

    /// Loads a table from a JSON object of string-to-string mappings.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read labels file: {}", path.display()))?;
        let raw: IndexMap<String, String> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse labels JSON from: {}", path.display()))?;
        Ok(Labels { table: raw })
    }

    /// Overlays `other` on top of this table; later entries win.
    pub fn merge(&mut self, other: Labels) {
        self.table.extend(other.table);
    }

    /// Resolves a key, falling back to the key itself when unmapped.
    pub fn get(&self, key: &str) -> String {
        self.table
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_unmapped_key_returns_itself() {
        let labels = Labels::empty();
        assert_eq!(labels.get("chart.noData"), "chart.noData");
    }

    #[test]
    fn test_english_table() {
        let labels = Labels::english();
        assert_eq!(labels.get("stats.day"), "day");
        assert_eq!(labels.get("chart.noMessages"), "No messages in this period");
    }

    #[test]
    fn test_merge_overrides() {
        let mut labels = Labels::english();
        let mut overrides = Labels::empty();
        overrides
            .table
            .insert("stats.day".to_string(), "día".to_string());
        labels.merge(overrides);
        assert_eq!(labels.get("stats.day"), "día");
        assert_eq!(labels.get("stats.days"), "days");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{}", r#"{"stats.day": "jour", "stats.days": "jours"}"#).unwrap();
        let labels = Labels::from_file(file.path()).unwrap();
        assert_eq!(labels.get("stats.day"), "jour");
        assert_eq!(labels.get("other"), "other");
    }
}
