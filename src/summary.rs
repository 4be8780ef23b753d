//! Scalar display summaries derived from a normalized snapshot.
//!
//! Every slot degrades to a placeholder instead of failing; the hosting
//! layer writes these strings into fixed display slots without further
//! processing.

use indexmap::IndexMap;

use crate::labels::Labels;
use crate::snapshot::Snapshot;

/// Shown for values that cannot be computed.
pub const PLACEHOLDER: &str = "--";

/// Display-slot identifiers, in render order.
pub const SUMMARY_SLOTS: [&str; 10] = [
    "total_messages",
    "participants",
    "media_shared",
    "time_span",
    "total_days",
    "active_days",
    "active_days_detail",
    "avg_messages",
    "emoji_count",
    "hours_chatting",
];

/// Formats a number with thousand separators and a fixed number of decimal
/// digits. Non-finite values render as the placeholder.
pub fn format_number(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return PLACEHOLDER.to_string();
    }

    let formatted = format!("{:.*}", digits, value);
    let (raw_int, fraction) = match formatted.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (formatted.as_str(), None),
    };
    let (sign, int_part) = match raw_int.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw_int),
    };

    // Insert commas every three digits, starting from the right
    let mut grouped_rev = String::new();
    for (count, ch) in int_part.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            grouped_rev.push(',');
        }
        grouped_rev.push(ch);
    }
    let grouped: String = grouped_rev.chars().rev().collect();

    match fraction {
        Some(frac) => format!("{}{}.{}", sign, grouped, frac),
        None => format!("{}{}", sign, grouped),
    }
}

/// Formats total chat hours: days + rounded hours from 24h up, one decimal
/// of hours below that.
pub fn format_hours(hours: f64) -> String {
    let hours = if hours.is_finite() { hours } else { 0.0 };
    if hours >= 24.0 {
        let days = (hours / 24.0).floor() as i64;
        let remainder = (hours % 24.0).round() as i64;
        format!("{}d {}h", days, remainder)
    } else {
        format!("{:.1}h", hours)
    }
}

/// All summary slots set to the placeholder; used for the empty state.
pub fn empty_summaries() -> IndexMap<String, String> {
    SUMMARY_SLOTS
        .iter()
        .map(|slot| (slot.to_string(), PLACEHOLDER.to_string()))
        .collect()
}

/// Derives every summary slot from a normalized snapshot.
pub fn format_summaries(snapshot: &Snapshot, labels: &Labels) -> IndexMap<String, String> {
    let mut slots = IndexMap::new();

    slots.insert(
        "total_messages".to_string(),
        format_number(snapshot.total_messages, 0),
    );
    slots.insert(
        "participants".to_string(),
        format_number(snapshot.participants.len() as f64, 0),
    );
    slots.insert(
        "media_shared".to_string(),
        format_number(snapshot.total_media, 0),
    );

    let span = &snapshot.time_span;
    let time_span = match (&span.start, &span.end) {
        (Some(start), Some(end)) => format!("{} - {}", start, end),
        _ => PLACEHOLDER.to_string(),
    };
    slots.insert("time_span".to_string(), time_span);

    let total_days = span.total_days;
    let total_days_label = if total_days > 0.0 {
        let day_word = if total_days == 1.0 {
            labels.get("stats.day")
        } else {
            labels.get("stats.days")
        };
        format!("{} {}", total_days as i64, day_word)
    } else {
        String::new()
    };
    slots.insert("total_days".to_string(), total_days_label);

    slots.insert(
        "active_days".to_string(),
        format_number(snapshot.active_days, 0),
    );

    // Percentage line only when both counts are meaningful
    let detail = if total_days > 0.0 && snapshot.active_days > 0.0 {
        let pct = (snapshot.active_days / total_days * 100.0).round() as i64;
        format!("{}% {}", pct, labels.get("stats.ofTotalDays"))
    } else {
        String::new()
    };
    slots.insert("active_days_detail".to_string(), detail);

    slots.insert(
        "avg_messages".to_string(),
        format_number(snapshot.avg_messages_per_day, 1),
    );
    slots.insert(
        "emoji_count".to_string(),
        format_number(snapshot.total_emojis, 0),
    );
    slots.insert(
        "hours_chatting".to_string(),
        format_hours(snapshot.hours_chatting),
    );

    slots
}
