// NerView - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// The analysis result is produced by the external prediction service and is
// treated as opaque: fields this client does not interpret are carried in
// `extra` maps so that persisting or exporting a result never drops data.

use crate::util::constants::{HISTORY_PREVIEW_CHARS, OUTSIDE_LABEL, PREVIEW_ELLIPSIS};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Analysis result (service output)
// =============================================================================

/// One recognised entity as reported by the service.
///
/// `start`/`end` are token-index bounds. No construction logic lives in the
/// client; entities are read-only input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: String,
    pub start: usize,
    pub end: usize,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity {
    /// Length of the entity text in UTF-16 code units, the unit the web
    /// client reported and downstream spreadsheets were built against.
    pub fn text_len(&self) -> usize {
        self.text.encode_utf16().count()
    }
}

/// Per-type entity count inside `Statistics::by_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeCount {
    pub label: String,
    pub count: u64,
    pub percentage: f64,
}

/// Aggregate statistics computed by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Statistics {
    pub total_entities: u64,
    pub total_tokens: u64,
    /// Percentage of tokens that belong to an entity.
    pub entity_density: f64,
    pub by_type: Vec<TypeCount>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The full response of a prediction call.
///
/// `labels` is expected to have the same length as `tokens`; consumers clamp
/// to `tokens` rather than trusting that.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub tokens: Vec<String>,

    /// A `null` entry (or a `null` list) reads as outside.
    #[serde(default, deserialize_with = "labels_or_outside")]
    pub labels: Vec<String>,

    /// Absent on the plain `/predict` endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Statistics>,

    /// Only the enhanced endpoints return grouped entities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<Vec<Entity>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn labels_or_outside<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Option<String>>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|label| label.unwrap_or_else(|| OUTSIDE_LABEL.to_string()))
        .collect())
}

impl AnalysisResult {
    /// Build a bare result from parallel token/label sequences.
    pub fn from_tagged(tokens: Vec<String>, labels: Vec<String>) -> Self {
        Self {
            tokens,
            labels,
            ..Default::default()
        }
    }

    /// Entities reported by the service (empty when none were sent).
    pub fn entities(&self) -> &[Entity] {
        self.entities.as_deref().unwrap_or(&[])
    }

    /// Number of entities, falling back to the statistics total when the
    /// service did not send the entity list.
    pub fn entity_count(&self) -> usize {
        match (&self.entities, &self.statistics) {
            (Some(entities), _) => entities.len(),
            (None, Some(stats)) => stats.total_entities as usize,
            (None, None) => 0,
        }
    }
}

// =============================================================================
// History record
// =============================================================================

/// One past analysis kept in the local history slot.
///
/// Created once when an analysis succeeds and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Millisecond-timestamp-derived identifier, unique within the slot.
    pub id: String,

    /// Full analysed text.
    pub text: String,

    pub results: AnalysisResult,

    /// ISO-8601 creation time.
    pub date: String,
}

impl HistoryRecord {
    /// Text shortened for list display: the first 200 characters, plus an
    /// ellipsis when anything was cut.
    pub fn preview(&self) -> String {
        match self.text.char_indices().nth(HISTORY_PREVIEW_CHARS) {
            Some((cut, _)) => format!("{}{PREVIEW_ELLIPSIS}", &self.text[..cut]),
            None => self.text.clone(),
        }
    }
}

/// Format a UTC instant as ISO-8601 with millisecond precision and a `Z`
/// suffix (e.g. `2025-06-01T08:00:00.000Z`).
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
