//! Snapshot normalization.
//!
//! The analysis backend returns one JSON object per conversation with
//! Spanish field keys, and every field is optional. `Snapshot::from_value`
//! coerces that object into a fully-typed record with deterministic
//! defaults so the rest of the pipeline never deals with missing or
//! wrong-shaped data.

use indexmap::IndexMap;
use serde_json::Value;

use crate::tuples::{normalize_tuples, DEFAULT_TUPLE_LIMIT};

/// Gate between rendering results and showing the empty state: a snapshot
/// is valid iff it is a non-null object with at least one key.
pub fn is_valid_stats(value: &Value) -> bool {
    matches!(value, Value::Object(map) if !map.is_empty())
}

/// Per-participant sentiment aggregates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PersonSentiment {
    pub compound: f64,
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
    pub total: f64,
}

/// Per-participant response-time aggregates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResponseTime {
    pub avg_seconds: f64,
    /// Human-readable duration pre-formatted by the backend.
    pub formatted: String,
    pub samples: f64,
}

/// Conversation-starter ranking.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Starters {
    pub podium: Vec<(String, f64)>,
    /// Pre-formatted percentage strings keyed by participant.
    pub percentages: IndexMap<String, String>,
}

/// Time span covered by the conversation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSpan {
    pub start: Option<String>,
    pub end: Option<String>,
    pub total_days: f64,
}

/// Fully-typed view of one analytics snapshot. Every field is present;
/// absent or malformed input degrades to zero / empty.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot {
    pub total_messages: f64,
    pub participants: Vec<String>,
    pub total_media: f64,
    pub total_emojis: f64,
    pub active_days: f64,
    pub hours_chatting: f64,
    pub avg_messages_per_day: f64,
    pub messages_per_person: IndexMap<String, f64>,
    pub messages_per_day: IndexMap<String, f64>,
    pub messages_per_hour: IndexMap<String, f64>,
    /// NLP-refined word list when present and non-empty, plain list otherwise.
    pub top_words: Vec<(String, f64)>,
    pub top_emojis: Vec<(String, f64)>,
    pub emojis_per_person: IndexMap<String, Vec<(String, f64)>>,
    /// Whether the sentiment engine was active when the snapshot was built.
    pub sentiment_enabled: bool,
    pub sentiment_per_person: IndexMap<String, PersonSentiment>,
    pub sentiment_per_day: IndexMap<String, f64>,
    pub starters: Starters,
    pub response_time: IndexMap<String, ResponseTime>,
    pub words_per_message: IndexMap<String, f64>,
    pub time_span: TimeSpan,
}

impl Snapshot {
    pub fn from_value(raw: &Value) -> Self {
        let starters_raw = field(raw, "iniciadores_de_conversacion");
        let span_raw = field(raw, "lapso_tiempo");

        Snapshot {
            total_messages: number(field(raw, "total_mensajes")),
            participants: string_list(field(raw, "participantes")),
            total_media: number(field(raw, "total_multimedia")),
            total_emojis: number(field(raw, "total_emojis")),
            active_days: number(field(raw, "dias_activos")),
            hours_chatting: number(field(raw, "horas_totales_chat")),
            avg_messages_per_day: number(field(raw, "mensajes_promedio_por_dia")),
            messages_per_person: number_map(field(raw, "mensajes_por_persona")),
            messages_per_day: number_map(field(raw, "mensajes_por_dia")),
            messages_per_hour: number_map(field(raw, "mensajes_por_hora")),
            top_words: word_list(raw),
            top_emojis: normalize_tuples(
                field(raw, "emojis_mas_utilizados"),
                DEFAULT_TUPLE_LIMIT,
            ),
            emojis_per_person: emoji_map(field(raw, "emojis_por_persona")),
            sentiment_enabled: sentiment_engine_enabled(field(raw, "sentimiento_global")),
            sentiment_per_person: sentiment_map(field(raw, "sentimiento_por_persona")),
            sentiment_per_day: number_map(field(raw, "sentimiento_por_dia")),
            starters: Starters {
                podium: normalize_tuples(field(starters_raw, "podio"), DEFAULT_TUPLE_LIMIT),
                percentages: string_map(field(starters_raw, "porcentajes")),
            },
            response_time: response_time_map(field(raw, "tiempo_respuesta_por_persona")),
            words_per_message: number_map(field(raw, "palabras_promedio_por_persona")),
            time_span: TimeSpan {
                start: opt_string(field(span_raw, "inicio")),
                end: opt_string(field(span_raw, "fin")),
                total_days: number(field(span_raw, "total_dias")),
            },
        }
    }
}

/// Field access that never fails: missing keys and non-objects yield Null.
fn field<'a>(value: &'a Value, key: &str) -> &'a Value {
    value.get(key).unwrap_or(&Value::Null)
}

/// "Parse as number, default 0 if not finite."
fn number(value: &Value) -> f64 {
    let n = match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
        _ => f64::NAN,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

fn opt_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

fn string_list(value: &Value) -> Vec<String> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect()
}

fn number_map(value: &Value) -> IndexMap<String, f64> {
    let Some(map) = value.as_object() else {
        return IndexMap::new();
    };
    map.iter().map(|(k, v)| (k.clone(), number(v))).collect()
}

fn string_map(value: &Value) -> IndexMap<String, String> {
    let Some(map) = value.as_object() else {
        return IndexMap::new();
    };
    map.iter()
        .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
        .collect()
}

/// Cap applied to the word list before the chart's own top-10 truncation.
const WORD_LIST_LIMIT: usize = 20;

/// Word-list fallback chain: the NLP-refined list wins when it is present
/// and non-empty, otherwise the plain frequency list is used.
fn word_list(raw: &Value) -> Vec<(String, f64)> {
    let nlp = normalize_tuples(field(raw, "palabras_mas_utilizadas_nlp"), WORD_LIST_LIMIT);
    if !nlp.is_empty() {
        return nlp;
    }
    normalize_tuples(field(raw, "palabras_mas_utilizadas"), WORD_LIST_LIMIT)
}

fn emoji_map(value: &Value) -> IndexMap<String, Vec<(String, f64)>> {
    let Some(map) = value.as_object() else {
        return IndexMap::new();
    };
    map.iter()
        .map(|(k, v)| (k.clone(), normalize_tuples(v, DEFAULT_TUPLE_LIMIT)))
        .collect()
}

/// The engine field distinguishes "no data yet" from "scoring disabled".
fn sentiment_engine_enabled(global: &Value) -> bool {
    match field(global, "engine").as_str() {
        Some(engine) => !engine.is_empty() && engine != "disabled",
        None => false,
    }
}

fn sentiment_map(value: &Value) -> IndexMap<String, PersonSentiment> {
    let Some(map) = value.as_object() else {
        return IndexMap::new();
    };
    map.iter()
        .map(|(k, v)| {
            (
                k.clone(),
                PersonSentiment {
                    compound: number(field(v, "promedio_compound")),
                    positive: number(field(v, "positive")),
                    neutral: number(field(v, "neutral")),
                    negative: number(field(v, "negative")),
                    total: number(field(v, "total")),
                },
            )
        })
        .collect()
}

fn response_time_map(value: &Value) -> IndexMap<String, ResponseTime> {
    let Some(map) = value.as_object() else {
        return IndexMap::new();
    };
    map.iter()
        .map(|(k, v)| {
            (
                k.clone(),
                ResponseTime {
                    avg_seconds: number(field(v, "promedio_segundos")),
                    formatted: opt_string(field(v, "promedio_formateado")).unwrap_or_default(),
                    samples: number(field(v, "total_respuestas")),
                },
            )
        })
        .collect()
}
