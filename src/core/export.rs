// NerView - core/export.rs
//
// JSON and CSV serialisation of analysis results.
// Core layer: produces byte buffers only; writing them anywhere is the
// caller's job.
//
// CSV fields are deliberately NOT escaped. Tokens are wrapped in double
// quotes verbatim and entity rows are written bare, which keeps the output
// byte-identical to files users already have, at the cost of corrupt rows
// when a token contains a quote or comma.

use crate::core::labels::label_at;
use crate::core::model::{iso_timestamp, AnalysisResult, Entity, HistoryRecord};
use crate::util::constants::{
    ANALYSIS_JSON_PREFIX, ENTITIES_CSV_PREFIX, HISTORY_ITEM_PREFIX, PDF_REPORT_PREFIX,
};
use crate::util::error::ExportError;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Downloadable JSON shape of a fresh analysis.
#[derive(Debug, Serialize)]
struct ResultDocument<'a> {
    text: &'a str,
    results: &'a AnalysisResult,
    timestamp: String,
}

/// Downloadable JSON shape of a history record.
#[derive(Debug, Serialize)]
struct RecordDocument<'a> {
    text: &'a str,
    results: &'a AnalysisResult,
    date: &'a str,
}

fn pretty_json<T: Serialize>(value: &T) -> Result<Vec<u8>, ExportError> {
    serde_json::to_vec_pretty(value).map_err(|e| ExportError::Json { source: e })
}

/// Pretty-printed `{text, results, timestamp}` stamped with the current time.
pub fn to_json(text: &str, result: &AnalysisResult) -> Result<Vec<u8>, ExportError> {
    to_json_at(text, result, Utc::now())
}

/// As [`to_json`], with an explicit timestamp.
pub fn to_json_at(
    text: &str,
    result: &AnalysisResult,
    at: DateTime<Utc>,
) -> Result<Vec<u8>, ExportError> {
    pretty_json(&ResultDocument {
        text,
        results: result,
        timestamp: iso_timestamp(at),
    })
}

/// Pretty-printed `{text, results, date}` for a stored history record.
pub fn record_to_json(record: &HistoryRecord) -> Result<Vec<u8>, ExportError> {
    pretty_json(&RecordDocument {
        text: &record.text,
        results: &record.results,
        date: &record.date,
    })
}

/// CSV writer that emits fields verbatim with `\n` line endings.
fn raw_csv_writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new())
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, ExportError> {
    writer.into_inner().map_err(|e| ExportError::Csv {
        source: csv::Error::from(e.into_error()),
    })
}

/// Token table: `Token,Label` header, then `"<token>","<label>"` per token.
///
/// One row per token; a missing label is written as `O` and surplus labels
/// are ignored.
pub fn to_csv(result: &AnalysisResult) -> Result<Vec<u8>, ExportError> {
    let mut writer = raw_csv_writer();
    writer
        .write_record(["Token", "Label"])
        .map_err(|e| ExportError::Csv { source: e })?;

    for (idx, token) in result.tokens.iter().enumerate() {
        let label = label_at(&result.labels, idx);
        writer
            .write_record([format!("\"{token}\""), format!("\"{label}\"")])
            .map_err(|e| ExportError::Csv { source: e })?;
    }

    finish(writer)
}

/// Entity table: `Text,Type,Position,Length`, one row per entity.
///
/// Rows are separated by `\n` with no newline after the last row.
pub fn entities_to_csv(entities: &[Entity]) -> Result<Vec<u8>, ExportError> {
    let mut writer = raw_csv_writer();
    writer
        .write_record(["Text", "Type", "Position", "Length"])
        .map_err(|e| ExportError::Csv { source: e })?;

    for entity in entities {
        writer
            .write_record([
                entity.text.clone(),
                entity.label.clone(),
                format!("{}-{}", entity.start, entity.end),
                entity.text_len().to_string(),
            ])
            .map_err(|e| ExportError::Csv { source: e })?;
    }

    let mut bytes = finish(writer)?;
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
    }
    Ok(bytes)
}

// =============================================================================
// File names
// =============================================================================

fn stamped(prefix: &str, epoch_ms: i64, extension: &str) -> String {
    format!("{prefix}-{epoch_ms}.{extension}")
}

/// `entites-<epoch-ms>.csv`
pub fn entities_csv_file_name(epoch_ms: i64) -> String {
    stamped(ENTITIES_CSV_PREFIX, epoch_ms, "csv")
}

/// `ner-analysis-<epoch-ms>.json`
pub fn analysis_json_file_name(epoch_ms: i64) -> String {
    stamped(ANALYSIS_JSON_PREFIX, epoch_ms, "json")
}

/// `rapport-ner-<epoch-ms>.pdf`
pub fn pdf_report_file_name(epoch_ms: i64) -> String {
    stamped(PDF_REPORT_PREFIX, epoch_ms, "pdf")
}

/// `ner_<id>.json`
pub fn record_file_name(id: &str) -> String {
    format!("{HISTORY_ITEM_PREFIX}_{id}.json")
}
