// NerView - tests/e2e_history_export.rs
//
// End-to-end tests for the analysis, history and export pipeline.
//
// These tests use the real filesystem history slot, real serde_json and csv
// serialisation, and real fixture files. Only the prediction service is
// replaced, by a deterministic tagger that labels capitalised words.

use nerview::app::analyze::{analyze_path, analyze_text};
use nerview::app::history::{FileSlot, HistoryStore};
use nerview::app::service::{PdfReportRequest, PredictionService};
use nerview::core::export;
use nerview::core::labels::distinct_types;
use nerview::core::model::{AnalysisResult, HistoryRecord};
use nerview::platform::fs::write_export;
use nerview::util::constants::HISTORY_CAPACITY;
use nerview::util::error::ServiceError;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to the on-disk fixture files.
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Tags "Paris" and "Besançon" as LOC, capitalised words after them as
/// continuation, everything else as outside.
struct GazetteerService;

impl PredictionService for GazetteerService {
    fn analyze_text(&self, text: &str) -> Result<AnalysisResult, ServiceError> {
        let tokens: Vec<String> = text.split_whitespace().map(str::to_owned).collect();
        let labels = tokens
            .iter()
            .map(|t| match t.as_str() {
                "Paris" | "Besançon" => "B-LOC".to_string(),
                "Victor" => "B-PER".to_string(),
                "Hugo" => "I-PER".to_string(),
                _ => "O".to_string(),
            })
            .collect();
        Ok(AnalysisResult::from_tagged(tokens, labels))
    }

    fn analyze_file(&self, path: &Path) -> Result<AnalysisResult, ServiceError> {
        let text = fs::read_to_string(path).map_err(|e| ServiceError::Upload {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.analyze_text(&text)
    }

    fn export_pdf(&self, request: &PdfReportRequest<'_>) -> Result<Vec<u8>, ServiceError> {
        Ok(format!("%PDF-1.4 {}", request.text).into_bytes())
    }
}

fn file_store(dir: &TempDir) -> HistoryStore<FileSlot> {
    HistoryStore::open(dir.path())
}

// =============================================================================
// Analysis -> history -> export
// =============================================================================

#[test]
fn e2e_text_analysis_is_saved_and_exported() {
    let data = TempDir::new().unwrap();
    let mut store = file_store(&data);

    let outcome = analyze_text(&GazetteerService, &mut store, "Paris est belle").unwrap();
    assert!(outcome.history_error.is_none());

    // A fresh store over the same directory sees the record.
    let reopened = file_store(&data);
    let history = reopened.load();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].text, "Paris est belle");

    let record = &history[0];
    assert_eq!(distinct_types(&record.results.labels), ["LOC"]);

    let csv = export::to_csv(&record.results).unwrap();
    assert_eq!(
        String::from_utf8(csv).unwrap(),
        "Token,Label\n\"Paris\",\"B-LOC\"\n\"est\",\"O\"\n\"belle\",\"O\"\n"
    );

    let json = export::to_json(&record.text, &record.results).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
    assert_eq!(value["text"], "Paris est belle");
    assert_eq!(value["results"]["labels"][0], "B-LOC");
    assert!(value["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[test]
fn e2e_text_file_input_round_trips_through_history() {
    let data = TempDir::new().unwrap();
    let mut store = file_store(&data);

    let outcome =
        analyze_path(&GazetteerService, &mut store, &fixture("sample_fr.txt")).unwrap();
    assert_eq!(outcome.record.text, "Victor Hugo est né à Besançon");
    assert_eq!(
        distinct_types(&outcome.result().labels),
        ["LOC", "PER"]
    );
    assert_eq!(store.get(&outcome.record.id).unwrap(), outcome.record);
}

#[test]
fn e2e_history_keeps_newest_fifty() {
    let data = TempDir::new().unwrap();
    let mut store = file_store(&data);

    let mut ids = Vec::new();
    for n in 0..=HISTORY_CAPACITY {
        let outcome =
            analyze_text(&GazetteerService, &mut store, &format!("analyse {n}")).unwrap();
        assert!(outcome.history_error.is_none());
        ids.push(outcome.record.id);
    }

    let history = file_store(&data).load();
    assert_eq!(history.len(), HISTORY_CAPACITY);
    assert_eq!(history[0].text, format!("analyse {HISTORY_CAPACITY}"));
    assert_eq!(history[HISTORY_CAPACITY - 1].text, "analyse 1");
    assert!(history.iter().all(|r| r.id != ids[0]));
}

#[test]
fn e2e_delete_and_clear() {
    let data = TempDir::new().unwrap();
    let mut store = file_store(&data);
    let first = analyze_text(&GazetteerService, &mut store, "un").unwrap().record;
    let second = analyze_text(&GazetteerService, &mut store, "deux").unwrap().record;

    store.remove(&first.id).unwrap();
    let left: Vec<String> = store.load().into_iter().map(|r| r.id).collect();
    assert_eq!(left, [second.id.clone()]);

    // Unknown id is a no-op.
    store.remove("does-not-exist").unwrap();
    assert_eq!(store.load().len(), 1);

    store.clear().unwrap();
    assert!(store.load().is_empty());
    assert!(!store.slot().path().exists());
}

// =============================================================================
// Legacy history and entity export
// =============================================================================

#[test]
fn e2e_legacy_history_is_normalised() {
    let data = TempDir::new().unwrap();
    let store = file_store(&data);
    fs::copy(fixture("legacy_history.json"), store.slot().path()).unwrap();

    let history = store.load();
    assert_eq!(history.len(), 2);

    let legacy: &HistoryRecord = &history[1];
    assert_eq!(legacy.id, "1748678400000");
    assert_eq!(legacy.text, "Victor Hugo est né à Besançon");
    assert_eq!(legacy.date, "2025-05-31T08:00:00.000Z");

    let csv = export::entities_to_csv(legacy.results.entities()).unwrap();
    assert_eq!(
        String::from_utf8(csv).unwrap(),
        "Text,Type,Position,Length\nVictor Hugo,PER,0-2,11\nBesançon,LOC,5-6,8"
    );

    // Unknown service fields survive a record export.
    let json = export::record_to_json(&history[0]).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&json).unwrap();
    assert_eq!(value["results"]["model_version"], "camembert-ner-2");
    assert_eq!(
        value["results"]["entities"],
        serde_json::Value::Null,
        "absent entities must not be invented"
    );
}

#[test]
fn e2e_rewrite_uses_canonical_shape() {
    let data = TempDir::new().unwrap();
    let mut store = file_store(&data);
    fs::copy(fixture("legacy_history.json"), store.slot().path()).unwrap();

    store.remove("1748764800000").unwrap();

    let raw = fs::read_to_string(store.slot().path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let only = &value[0];
    assert_eq!(only["id"], "1748678400000");
    assert_eq!(only["text"], "Victor Hugo est né à Besançon");
    assert_eq!(only["date"], "2025-05-31T08:00:00.000Z");
    assert!(only.get("fullText").is_none());
    assert!(only.get("timestamp").is_none());
    assert_eq!(only["results"]["entities"][1]["confidence"], 0.97);
}

#[test]
fn e2e_exports_are_written_to_disk() {
    let data = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let mut store = file_store(&data);
    let record = analyze_text(&GazetteerService, &mut store, "Paris est belle")
        .unwrap()
        .record;

    let csv = export::to_csv(&record.results).unwrap();
    let path = write_export(out.path(), "resultat_ner.csv", &csv).unwrap();
    assert_eq!(fs::read(&path).unwrap(), csv);

    let pdf = GazetteerService
        .export_pdf(&PdfReportRequest::new(&record.text, &record.results))
        .unwrap();
    let name = export::pdf_report_file_name(1_748_764_800_000);
    let path = write_export(&out.path().join("reports"), &name, &pdf).unwrap();
    assert!(path.ends_with("reports/rapport-ner-1748764800000.pdf"));
    assert!(fs::read(&path).unwrap().starts_with(b"%PDF"));

    // No temp files left behind.
    let leftovers: Vec<_> = fs::read_dir(out.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}
