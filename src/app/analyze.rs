// NerView - app/analyze.rs
//
// Analysis pipeline: input -> prediction service -> history.
//
// A successful analysis is always returned to the caller. Recording it in
// history is best-effort: a failed history write is logged and reported
// alongside the result rather than discarding the analysis.

use crate::app::history::{new_record, HistorySlot, HistoryStore};
use crate::app::service::PredictionService;
use crate::core::model::{AnalysisResult, HistoryRecord};
use crate::platform::fs;
use crate::util::error::{AnalyzeError, HistoryError};
use std::path::Path;

/// A completed analysis and what happened when recording it.
#[derive(Debug)]
pub struct AnalysisOutcome {
    /// The record describing this analysis (also in history unless
    /// `history_error` is set).
    pub record: HistoryRecord,

    /// Why the record could not be saved, if it could not.
    pub history_error: Option<HistoryError>,
}

impl AnalysisOutcome {
    pub fn result(&self) -> &AnalysisResult {
        &self.record.results
    }
}

/// Analyse free text and record it in history.
///
/// Surrounding whitespace is trimmed; empty input is rejected before any
/// request is made.
pub fn analyze_text<P, S>(
    service: &P,
    store: &mut HistoryStore<S>,
    text: &str,
) -> Result<AnalysisOutcome, AnalyzeError>
where
    P: PredictionService + ?Sized,
    S: HistorySlot,
{
    let text = text.trim();
    if text.is_empty() {
        return Err(AnalyzeError::EmptyInput);
    }

    let result = service.analyze_text(text)?;
    tracing::info!(
        tokens = result.tokens.len(),
        entities = result.entity_count(),
        "Analysis complete"
    );
    Ok(record(store, text, result))
}

/// Analyse a file.
///
/// Plain-text files are read locally and analysed as text. Other documents
/// are uploaded for server-side parsing; their history text is the returned
/// token sequence joined with spaces, since the client never sees the
/// extracted text itself.
pub fn analyze_path<P, S>(
    service: &P,
    store: &mut HistoryStore<S>,
    path: &Path,
) -> Result<AnalysisOutcome, AnalyzeError>
where
    P: PredictionService + ?Sized,
    S: HistorySlot,
{
    if fs::is_plain_text(path) {
        let content = fs::read_file_lossy(path).map_err(|e| AnalyzeError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        tracing::debug!(path = %path.display(), bytes = content.len(), "Read text input");
        return analyze_text(service, store, &content);
    }

    if !path.is_file() {
        return Err(AnalyzeError::Read {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        });
    }

    let result = service.analyze_file(path)?;
    tracing::info!(
        path = %path.display(),
        tokens = result.tokens.len(),
        entities = result.entity_count(),
        "Document analysis complete"
    );
    let text = result.tokens.join(" ");
    Ok(record(store, &text, result))
}

fn record<S: HistorySlot>(
    store: &mut HistoryStore<S>,
    text: &str,
    result: AnalysisResult,
) -> AnalysisOutcome {
    let record = new_record(text, result);
    let history_error = match store.append(record.clone()) {
        Ok(()) => None,
        Err(e) => {
            tracing::warn!(error = %e, "Analysis succeeded but could not be saved to history");
            Some(e)
        }
    };
    AnalysisOutcome {
        record,
        history_error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::history::MemorySlot;
    use crate::app::service::PdfReportRequest;
    use crate::util::error::ServiceError;
    use std::cell::Cell;
    use tempfile::TempDir;

    /// Service that tags every token as outside and counts calls.
    #[derive(Default)]
    struct EchoService {
        calls: Cell<usize>,
        uploads: Cell<usize>,
    }

    impl PredictionService for EchoService {
        fn analyze_text(&self, text: &str) -> Result<AnalysisResult, ServiceError> {
            self.calls.set(self.calls.get() + 1);
            let tokens: Vec<String> = text.split_whitespace().map(str::to_owned).collect();
            let labels = vec!["O".to_string(); tokens.len()];
            Ok(AnalysisResult::from_tagged(tokens, labels))
        }

        fn analyze_file(&self, _path: &Path) -> Result<AnalysisResult, ServiceError> {
            self.uploads.set(self.uploads.get() + 1);
            Ok(AnalysisResult::from_tagged(
                vec!["Rapport".to_string(), "annuel".to_string()],
                vec!["O".to_string(), "O".to_string()],
            ))
        }

        fn export_pdf(&self, _request: &PdfReportRequest<'_>) -> Result<Vec<u8>, ServiceError> {
            Ok(b"%PDF-1.4".to_vec())
        }
    }

    struct DownService;

    impl PredictionService for DownService {
        fn analyze_text(&self, _text: &str) -> Result<AnalysisResult, ServiceError> {
            Err(ServiceError::Status {
                url: "http://localhost:8000/predict-enhanced".to_string(),
                status: 502,
                body: String::new(),
            })
        }

        fn analyze_file(&self, path: &Path) -> Result<AnalysisResult, ServiceError> {
            Err(ServiceError::Upload {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "down"),
            })
        }

        fn export_pdf(&self, _request: &PdfReportRequest<'_>) -> Result<Vec<u8>, ServiceError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_empty_input_is_rejected_without_request() {
        let service = EchoService::default();
        let mut store = HistoryStore::new(MemorySlot::new());
        let err = analyze_text(&service, &mut store, "   \n\t").unwrap_err();
        assert!(matches!(err, AnalyzeError::EmptyInput));
        assert_eq!(service.calls.get(), 0);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_success_is_recorded_trimmed() {
        let service = EchoService::default();
        let mut store = HistoryStore::new(MemorySlot::new());
        let outcome = analyze_text(&service, &mut store, "  Paris est belle \n").unwrap();

        assert!(outcome.history_error.is_none());
        assert_eq!(outcome.record.text, "Paris est belle");
        assert_eq!(outcome.result().tokens.len(), 3);

        let history = store.load();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0], outcome.record);
    }

    #[test]
    fn test_service_failure_records_nothing() {
        let mut store = HistoryStore::new(MemorySlot::new());
        let err = analyze_text(&DownService, &mut store, "Paris").unwrap_err();
        assert!(matches!(err, AnalyzeError::Service(ServiceError::Status { status: 502, .. })));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_history_failure_keeps_result() {
        let service = EchoService::default();
        let mut store = HistoryStore::new(MemorySlot::new());
        store.slot_mut().set_fail_writes(true);

        let outcome = analyze_text(&service, &mut store, "Paris").unwrap();
        assert!(outcome.history_error.is_some());
        assert_eq!(outcome.result().tokens, ["Paris"]);
    }

    #[test]
    fn test_text_file_is_read_locally() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("input.txt");
        std::fs::write(&path, "Victor Hugo est né à Besançon\n").unwrap();

        let service = EchoService::default();
        let mut store = HistoryStore::new(MemorySlot::new());
        let outcome = analyze_path(&service, &mut store, &path).unwrap();

        assert_eq!(service.calls.get(), 1);
        assert_eq!(service.uploads.get(), 0);
        assert_eq!(outcome.record.text, "Victor Hugo est né à Besançon");
    }

    #[test]
    fn test_document_is_uploaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rapport.pdf");
        std::fs::write(&path, b"%PDF-1.4").unwrap();

        let service = EchoService::default();
        let mut store = HistoryStore::new(MemorySlot::new());
        let outcome = analyze_path(&service, &mut store, &path).unwrap();

        assert_eq!(service.uploads.get(), 1);
        assert_eq!(outcome.record.text, "Rapport annuel");
        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn test_missing_document_is_a_read_error() {
        let dir = TempDir::new().unwrap();
        let service = EchoService::default();
        let mut store = HistoryStore::new(MemorySlot::new());
        let err = analyze_path(&service, &mut store, &dir.path().join("absent.docx")).unwrap_err();
        assert!(matches!(err, AnalyzeError::Read { .. }));
        assert_eq!(service.uploads.get(), 0);
    }
}
