//! Per-facet chart-spec builders.
//!
//! Each builder takes the normalized snapshot and produces the spec for one
//! analytic facet. Builders return `Ok(None)` when a facet has nothing to
//! show and should be cleared; facets that must always replace their
//! previous chart return an empty spec with a hint instead. Failures are
//! contained at the call site so one facet can never take down the rest.

use anyhow::Result;
use chrono::NaiveDate;

use crate::chart::{
    ChartKind, ChartSpec, Podium, PodiumEntry, Series, NEGATIVE_COLOR, NEUTRAL_COLOR, PALETTE,
    POSITIVE_COLOR,
};
use crate::labels::Labels;
use crate::snapshot::Snapshot;
use crate::summary::format_number;
use crate::timerange::{filter_series_at, RangeSelector};
use crate::tuples::sum_tuple_list;

/// The word list arrives capped at 20; the chart shows the top 10.
const WORD_CHART_LIMIT: usize = 10;
const EMOJI_CHART_LIMIT: usize = 20;
const PODIUM_LIMIT: usize = 5;

const MEDALS: [&str; 3] = ["🥇", "🥈", "🥉"];

/// Sentiment compound thresholds for bar coloring.
const SENTIMENT_POSITIVE_MIN: f64 = 0.05;
const SENTIMENT_NEGATIVE_MAX: f64 = -0.05;

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Messages-per-day bar chart for the selected rolling window.
///
/// Always produced, even with no data in the window, so the previous
/// chart is guaranteed to be replaced; the empty case carries a hint.
pub fn messages_per_day(
    snapshot: &Snapshot,
    range: RangeSelector,
    today: NaiveDate,
    labels: &Labels,
) -> Result<Option<ChartSpec>> {
    let filtered = filter_series_at(&snapshot.messages_per_day, range, today);
    let empty = filtered.is_empty();
    let series = Series::solid(
        Some(labels.get("chart.messages")),
        filtered.values,
        PALETTE[0],
    );
    let mut spec = ChartSpec::new(ChartKind::Bar, filtered.labels, vec![series]);
    if empty {
        spec = spec.with_hint(labels.get("chart.noMessages"));
    }
    Ok(Some(spec))
}

/// Doughnut of message share, one slice per participant.
pub fn participant_share(snapshot: &Snapshot) -> Result<Option<ChartSpec>> {
    if snapshot.messages_per_person.is_empty() {
        return Ok(None);
    }
    let names: Vec<String> = snapshot.messages_per_person.keys().cloned().collect();
    let values: Vec<f64> = snapshot.messages_per_person.values().copied().collect();
    let spec = ChartSpec::new(
        ChartKind::Doughnut,
        names,
        vec![Series::cycled(None, values)],
    );
    Ok(Some(spec))
}

/// Activity histogram over the full fixed set of 24 hour buckets.
pub fn activity_by_hour(snapshot: &Snapshot, labels: &Labels) -> Result<Option<ChartSpec>> {
    let hour_labels: Vec<String> = (0..24).map(|h| format!("{:02}", h)).collect();
    let values: Vec<f64> = hour_labels
        .iter()
        .map(|h| snapshot.messages_per_hour.get(h).copied().unwrap_or(0.0))
        .collect();
    let series = Series::solid(Some(labels.get("chart.messages")), values, PALETTE[3]);
    Ok(Some(ChartSpec::new(ChartKind::Bar, hour_labels, vec![series])))
}

/// Horizontal bar of the top words; cleared entirely when there are none.
pub fn top_words(snapshot: &Snapshot, labels: &Labels) -> Result<Option<ChartSpec>> {
    let words: Vec<_> = snapshot.top_words.iter().take(WORD_CHART_LIMIT).collect();
    if words.is_empty() {
        return Ok(None);
    }
    let word_labels: Vec<String> = words.iter().map(|(w, _)| w.clone()).collect();
    let values: Vec<f64> = words.iter().map(|(_, c)| *c).collect();
    let series = Series::solid(Some(labels.get("chart.frequency")), values, PALETTE[0]);
    let spec = ChartSpec::new(ChartKind::Bar, word_labels, vec![series]).horizontal();
    Ok(Some(spec))
}

/// Per-participant compound sentiment, most positive first.
///
/// Always produced: the empty case is a placeholder chart whose hint
/// distinguishes "no data yet" from "scoring engine disabled".
pub fn sentiment_by_user(snapshot: &Snapshot, labels: &Labels) -> Result<Option<ChartSpec>> {
    if snapshot.sentiment_per_person.is_empty() {
        return Ok(Some(empty_sentiment_spec(ChartKind::Bar, snapshot, labels)));
    }

    let mut people: Vec<_> = snapshot.sentiment_per_person.iter().collect();
    people.sort_by(|a, b| {
        b.1.compound
            .partial_cmp(&a.1.compound)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let names: Vec<String> = people.iter().map(|(name, _)| (*name).clone()).collect();
    let values: Vec<f64> = people.iter().map(|(_, s)| s.compound).collect();
    let colors: Vec<String> = values
        .iter()
        .map(|&v| {
            if v >= SENTIMENT_POSITIVE_MIN {
                POSITIVE_COLOR
            } else if v <= SENTIMENT_NEGATIVE_MAX {
                NEGATIVE_COLOR
            } else {
                NEUTRAL_COLOR
            }
            .to_string()
        })
        .collect();
    let tooltips: Vec<String> = people
        .iter()
        .map(|(_, info)| {
            // Guard against a zero sample count in the ratio lines
            let total = if info.total > 0.0 { info.total } else { 1.0 };
            let pct = |part: f64| (part / total * 100.0).round() as i64;
            format!(
                "Avg: {:.3}\nPositive: {}% ({})\nNeutral: {}% ({})\nNegative: {}% ({})",
                info.compound,
                pct(info.positive),
                info.positive as i64,
                pct(info.neutral),
                info.neutral as i64,
                pct(info.negative),
                info.negative as i64,
            )
        })
        .collect();

    let count = names.len();
    let series = Series {
        label: Some(labels.get("chart.sentiment")),
        values,
        colors,
    };
    let spec = ChartSpec::new(ChartKind::Bar, names, vec![series])
        .horizontal()
        .with_bounds(-1.0, 1.0)
        .with_tooltips(tooltips)
        .with_extent(count);
    Ok(Some(spec))
}

/// Compound sentiment per day as an ascending line, bounded to [-1, 1].
pub fn sentiment_timeline(
    snapshot: &Snapshot,
    today: NaiveDate,
    labels: &Labels,
) -> Result<Option<ChartSpec>> {
    let filtered = filter_series_at(&snapshot.sentiment_per_day, RangeSelector::All, today);
    if filtered.is_empty() {
        return Ok(Some(empty_sentiment_spec(ChartKind::Line, snapshot, labels)));
    }
    let series = Series::solid(
        Some(labels.get("chart.sentiment")),
        filtered.values,
        PALETTE[0],
    );
    let spec = ChartSpec::new(ChartKind::Line, filtered.labels, vec![series])
        .with_bounds(-1.0, 1.0);
    Ok(Some(spec))
}

fn empty_sentiment_spec(kind: ChartKind, snapshot: &Snapshot, labels: &Labels) -> ChartSpec {
    let hint = if snapshot.sentiment_enabled {
        labels.get("chart.noData")
    } else {
        labels.get("chart.unavailable")
    };
    ChartSpec::new(kind, Vec::new(), vec![Series::solid(None, Vec::new(), PALETTE[0])])
        .with_bounds(-1.0, 1.0)
        .with_hint(hint)
}

/// Bar chart of the top emojis.
pub fn top_emojis(snapshot: &Snapshot) -> Result<Option<ChartSpec>> {
    let emojis: Vec<_> = snapshot.top_emojis.iter().take(EMOJI_CHART_LIMIT).collect();
    if emojis.is_empty() {
        return Ok(None);
    }
    let emoji_labels: Vec<String> = emojis.iter().map(|(e, _)| e.clone()).collect();
    let values: Vec<f64> = emojis.iter().map(|(_, c)| *c).collect();
    let series = Series::solid(None, values, PALETTE[2]);
    Ok(Some(ChartSpec::new(ChartKind::Bar, emoji_labels, vec![series])))
}

/// Total emoji use per participant (sum of each person's filtered list).
pub fn emoji_usage_by_user(snapshot: &Snapshot) -> Result<Option<ChartSpec>> {
    if snapshot.emojis_per_person.is_empty() {
        return Ok(None);
    }
    let names: Vec<String> = snapshot.emojis_per_person.keys().cloned().collect();
    let values: Vec<f64> = snapshot
        .emojis_per_person
        .values()
        .map(|tuples| sum_tuple_list(tuples))
        .collect();
    let count = names.len();
    let spec = ChartSpec::new(ChartKind::Bar, names, vec![Series::cycled(None, values)])
        .horizontal()
        .with_extent(count);
    Ok(Some(spec))
}

/// Share of total messages per participant, percent to one decimal.
/// Skipped entirely when the total message count is zero.
pub fn participation_rate(snapshot: &Snapshot) -> Result<Option<ChartSpec>> {
    if snapshot.messages_per_person.is_empty() || snapshot.total_messages <= 0.0 {
        return Ok(None);
    }
    let names: Vec<String> = snapshot.messages_per_person.keys().cloned().collect();
    let values: Vec<f64> = snapshot
        .messages_per_person
        .values()
        .map(|&count| round1(count * 100.0 / snapshot.total_messages))
        .collect();
    let count = names.len();
    let spec = ChartSpec::new(ChartKind::Bar, names, vec![Series::cycled(None, values)])
        .horizontal()
        .with_bounds(0.0, 100.0)
        .with_suffix("%".to_string())
        .with_extent(count);
    Ok(Some(spec))
}

/// Ranked top-5 conversation starters with medals and relative bar widths.
pub fn conversation_starters(snapshot: &Snapshot) -> Result<Option<Podium>> {
    let podium = &snapshot.starters.podium;
    if podium.is_empty() {
        return Ok(None);
    }
    let leader_count = podium[0].1;
    let entries = podium
        .iter()
        .take(PODIUM_LIMIT)
        .enumerate()
        .map(|(idx, (name, count))| {
            let medal = MEDALS
                .get(idx)
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("#{}", idx + 1));
            // Division-by-zero guard when the leader has no conversations
            let bar_width = if leader_count > 0.0 {
                count / leader_count * 100.0
            } else {
                0.0
            };
            PodiumEntry {
                rank: idx + 1,
                medal,
                name: name.clone(),
                count: *count,
                percentage: snapshot
                    .starters
                    .percentages
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| "0%".to_string()),
                bar_width,
                color: crate::chart::palette_color(idx),
            }
        })
        .collect();
    Ok(Some(Podium { entries }))
}

/// Average response time per participant, in rounded minutes; the tooltip
/// carries the backend's pre-formatted duration and the sample count.
pub fn response_time(snapshot: &Snapshot, labels: &Labels) -> Result<Option<ChartSpec>> {
    if snapshot.response_time.is_empty() {
        return Ok(None);
    }
    let names: Vec<String> = snapshot.response_time.keys().cloned().collect();
    let values: Vec<f64> = snapshot
        .response_time
        .values()
        .map(|info| (info.avg_seconds / 60.0).round())
        .collect();
    let tooltips: Vec<String> = snapshot
        .response_time
        .values()
        .map(|info| {
            format!(
                "{} ({} {})",
                info.formatted,
                format_number(info.samples, 0),
                labels.get("chart.responses")
            )
        })
        .collect();
    let count = names.len();
    let spec = ChartSpec::new(
        ChartKind::Bar,
        names,
        vec![Series::cycled(Some(labels.get("chart.avgTime")), values)],
    )
    .horizontal()
    .with_suffix(labels.get("unit.minutes"))
    .with_tooltips(tooltips)
    .with_extent(count);
    Ok(Some(spec))
}

/// Raw average words per message, one bar per participant.
pub fn words_per_message(snapshot: &Snapshot, labels: &Labels) -> Result<Option<ChartSpec>> {
    if snapshot.words_per_message.is_empty() {
        return Ok(None);
    }
    let names: Vec<String> = snapshot.words_per_message.keys().cloned().collect();
    let values: Vec<f64> = snapshot.words_per_message.values().copied().collect();
    let count = names.len();
    let spec = ChartSpec::new(
        ChartKind::Bar,
        names,
        vec![Series::cycled(Some(labels.get("chart.avgWords")), values)],
    )
    .horizontal()
    .with_suffix(labels.get("unit.words"))
    .with_extent(count);
    Ok(Some(spec))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::Orientation;
    use serde_json::json;

    fn snap(raw: serde_json::Value) -> Snapshot {
        Snapshot::from_value(&raw)
    }

    fn labels() -> Labels {
        Labels::english()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    #[test]
    fn test_messages_per_day_always_produced() {
        let empty = snap(json!({}));
        let spec = messages_per_day(&empty, RangeSelector::All, today(), &labels())
            .unwrap()
            .unwrap();
        assert!(spec.labels.is_empty());
        assert_eq!(spec.hint.as_deref(), Some("No messages in this period"));
        assert!(spec.is_aligned());

        let populated = snap(json!({
            "mensajes_por_dia": {"2024-06-14": 3, "2024-06-13": 5}
        }));
        let spec = messages_per_day(&populated, RangeSelector::Days7, today(), &labels())
            .unwrap()
            .unwrap();
        assert_eq!(spec.labels, vec!["2024-06-13", "2024-06-14"]);
        assert_eq!(spec.series[0].values, vec![5.0, 3.0]);
        assert!(spec.hint.is_none());
    }

    #[test]
    fn test_participant_share_colors_cycle() {
        let mut people = serde_json::Map::new();
        for i in 0..10 {
            people.insert(format!("p{}", i), json!(i + 1));
        }
        let populated = snap(json!({"mensajes_por_persona": people}));
        let spec = participant_share(&populated).unwrap().unwrap();
        assert_eq!(spec.kind, ChartKind::Doughnut);
        assert_eq!(spec.labels.len(), 10);
        assert_eq!(spec.series[0].colors[0], PALETTE[0]);
        assert_eq!(spec.series[0].colors[8], PALETTE[0]);
        assert_eq!(spec.series[0].colors[9], PALETTE[1]);

        assert!(participant_share(&snap(json!({}))).unwrap().is_none());
    }

    #[test]
    fn test_hour_buckets_are_always_full() {
        let populated = snap(json!({"mensajes_por_hora": {"09": 4, "22": 1}}));
        let spec = activity_by_hour(&populated, &labels()).unwrap().unwrap();
        assert_eq!(spec.labels.len(), 24);
        assert_eq!(spec.labels[0], "00");
        assert_eq!(spec.labels[23], "23");
        assert_eq!(spec.series[0].values[9], 4.0);
        assert_eq!(spec.series[0].values[0], 0.0);

        let empty = activity_by_hour(&snap(json!({})), &labels()).unwrap().unwrap();
        assert_eq!(empty.labels.len(), 24);
        assert!(empty.series[0].values.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_top_words_limit_and_clearing() {
        let words: Vec<_> = (0..15).map(|i| json!([format!("w{}", i), 15 - i])).collect();
        let populated = snap(json!({"palabras_mas_utilizadas": words}));
        let spec = top_words(&populated, &labels()).unwrap().unwrap();
        assert_eq!(spec.labels.len(), 10);
        assert_eq!(spec.orientation, Orientation::Horizontal);

        assert!(top_words(&snap(json!({})), &labels()).unwrap().is_none());
    }

    #[test]
    fn test_sentiment_by_user_sorted_descending() {
        let populated = snap(json!({
            "sentimiento_por_persona": {
                "A": {"promedio_compound": 0.2, "total": 3, "positive": 2, "neutral": 1, "negative": 0},
                "B": {"promedio_compound": -0.1, "total": 2, "positive": 0, "neutral": 1, "negative": 1},
                "C": {"promedio_compound": 0.5, "total": 4, "positive": 4, "neutral": 0, "negative": 0}
            }
        }));
        let spec = sentiment_by_user(&populated, &labels()).unwrap().unwrap();
        assert_eq!(spec.labels, vec!["C", "A", "B"]);
        assert_eq!(spec.series[0].values, vec![0.5, 0.2, -0.1]);
        assert_eq!(
            spec.series[0].colors,
            vec![POSITIVE_COLOR, POSITIVE_COLOR, NEGATIVE_COLOR]
        );
        assert_eq!(spec.bounds.unwrap().min, -1.0);
        let tooltips = spec.tooltips.unwrap();
        assert!(tooltips[0].starts_with("Avg: 0.500"));
        assert!(tooltips[0].contains("Positive: 100% (4)"));
    }

    #[test]
    fn test_sentiment_neutral_band() {
        let populated = snap(json!({
            "sentimiento_por_persona": {
                "N": {"promedio_compound": 0.04, "total": 1, "positive": 0, "neutral": 1, "negative": 0}
            }
        }));
        let spec = sentiment_by_user(&populated, &labels()).unwrap().unwrap();
        assert_eq!(spec.series[0].colors, vec![NEUTRAL_COLOR]);
    }

    #[test]
    fn test_sentiment_empty_hints() {
        let disabled = snap(json!({"sentimiento_global": {"engine": "disabled"}}));
        let spec = sentiment_by_user(&disabled, &labels()).unwrap().unwrap();
        assert_eq!(spec.hint.as_deref(), Some("Sentiment unavailable"));

        let enabled = snap(json!({"sentimiento_global": {"engine": "vader"}}));
        let spec = sentiment_by_user(&enabled, &labels()).unwrap().unwrap();
        assert_eq!(spec.hint.as_deref(), Some("No sentiment data"));

        let timeline = sentiment_timeline(&enabled, today(), &labels())
            .unwrap()
            .unwrap();
        assert_eq!(timeline.kind, ChartKind::Line);
        assert_eq!(timeline.hint.as_deref(), Some("No sentiment data"));
    }

    #[test]
    fn test_sentiment_timeline_sorted_and_bounded() {
        let populated = snap(json!({
            "sentimiento_por_dia": {"2022-07-03": 0.4, "2022-07-01": -0.2, "bad-date": 0.9}
        }));
        let spec = sentiment_timeline(&populated, today(), &labels())
            .unwrap()
            .unwrap();
        assert_eq!(spec.labels, vec!["2022-07-01", "2022-07-03"]);
        assert_eq!(spec.series[0].values, vec![-0.2, 0.4]);
        assert_eq!(spec.bounds.unwrap().max, 1.0);
        assert!(spec.hint.is_none());
    }

    #[test]
    fn test_emoji_usage_sums_per_person() {
        let populated = snap(json!({
            "emojis_por_persona": {
                "Ana": [["😂", 3], ["❤️", 2], ["x", 0]],
                "Luis": [["👍", 1]]
            }
        }));
        let spec = emoji_usage_by_user(&populated).unwrap().unwrap();
        assert_eq!(spec.labels, vec!["Ana", "Luis"]);
        assert_eq!(spec.series[0].values, vec![5.0, 1.0]);
        assert_eq!(spec.suggested_extent, Some(180));
    }

    #[test]
    fn test_participation_rates() {
        let populated = snap(json!({
            "total_mensajes": 4,
            "mensajes_por_persona": {"A": 3, "B": 1}
        }));
        let spec = participation_rate(&populated).unwrap().unwrap();
        assert_eq!(spec.series[0].values, vec![75.0, 25.0]);
        assert_eq!(spec.value_suffix.as_deref(), Some("%"));
        assert_eq!(spec.bounds.unwrap().max, 100.0);

        let zero_total = snap(json!({"mensajes_por_persona": {"A": 3}}));
        assert!(participation_rate(&zero_total).unwrap().is_none());
    }

    #[test]
    fn test_podium_medals_and_widths() {
        let populated = snap(json!({
            "iniciadores_de_conversacion": {
                "podio": [["Ana", 10], ["Luis", 5], ["Marta", 2], ["Elena", 1]],
                "porcentajes": {"Ana": "56%", "Luis": "28%"}
            }
        }));
        let podium = conversation_starters(&populated).unwrap().unwrap();
        assert_eq!(podium.entries.len(), 4);
        assert_eq!(podium.entries[0].medal, "🥇");
        assert_eq!(podium.entries[2].medal, "🥉");
        assert_eq!(podium.entries[3].medal, "#4");
        assert_eq!(podium.entries[0].bar_width, 100.0);
        assert_eq!(podium.entries[1].bar_width, 50.0);
        assert_eq!(podium.entries[0].percentage, "56%");
        assert_eq!(podium.entries[2].percentage, "0%");

        assert!(conversation_starters(&snap(json!({}))).unwrap().is_none());
    }

    #[test]
    fn test_response_time_minutes_rounding() {
        let populated = snap(json!({
            "tiempo_respuesta_por_persona": {
                "Ana": {"promedio_segundos": 125, "promedio_formateado": "2 min 5 s", "total_respuestas": 12},
                "Luis": {"promedio_segundos": 90, "promedio_formateado": "1 min 30 s", "total_respuestas": 3}
            }
        }));
        let spec = response_time(&populated, &labels()).unwrap().unwrap();
        assert_eq!(spec.series[0].values, vec![2.0, 2.0]);
        let tooltips = spec.tooltips.unwrap();
        assert_eq!(tooltips[0], "2 min 5 s (12 responses)");
        assert_eq!(spec.value_suffix.as_deref(), Some("min"));
    }

    #[test]
    fn test_words_per_message_raw_averages() {
        let populated = snap(json!({
            "palabras_promedio_por_persona": {"Ana": 7.4, "Luis": 3.0}
        }));
        let spec = words_per_message(&populated, &labels()).unwrap().unwrap();
        assert_eq!(spec.series[0].values, vec![7.4, 3.0]);
        assert_eq!(spec.orientation, Orientation::Horizontal);
        assert!(spec.is_aligned());
    }
}
