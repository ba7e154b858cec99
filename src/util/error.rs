// NerView - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// All errors preserve the causal chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all NerView operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum NerViewError {
    /// History slot could not be written.
    History(HistoryError),

    /// Export serialisation or writing failed.
    Export(ExportError),

    /// The prediction service call failed.
    Service(ServiceError),

    /// An analysis request could not be carried out.
    Analyze(AnalyzeError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for NerViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::History(e) => write!(f, "History error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Service(e) => write!(f, "Service error: {e}"),
            Self::Analyze(e) => write!(f, "Analysis error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for NerViewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::History(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Service(e) => Some(e),
            Self::Analyze(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// History errors
// ---------------------------------------------------------------------------

/// Errors raised while persisting the history slot.
///
/// Reads never produce an error: a missing or corrupt slot loads as an
/// empty list.
#[derive(Debug)]
pub enum HistoryError {
    /// The history list could not be serialised to JSON.
    Serialise { source: serde_json::Error },

    /// Writing the new slot value failed. The previous value is intact.
    Write { path: PathBuf, source: io::Error },

    /// Removing the slot failed.
    Remove { path: PathBuf, source: io::Error },

    /// No record with the requested id exists.
    NotFound { id: String },
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serialise { source } => {
                write!(f, "failed to serialise history: {source}")
            }
            Self::Write { path, source } => write!(
                f,
                "failed to write history '{}': {source}. Previous history kept.",
                path.display()
            ),
            Self::Remove { path, source } => {
                write!(f, "failed to remove history '{}': {source}", path.display())
            }
            Self::NotFound { id } => write!(f, "no history record with id '{id}'"),
        }
    }
}

impl std::error::Error for HistoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Serialise { source } => Some(source),
            Self::Write { source, .. } => Some(source),
            Self::Remove { source, .. } => Some(source),
            Self::NotFound { .. } => None,
        }
    }
}

impl From<HistoryError> for NerViewError {
    fn from(e: HistoryError) -> Self {
        Self::History(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { source: csv::Error },

    /// JSON serialisation error.
    Json { source: serde_json::Error },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { source } => write!(f, "CSV export error: {source}"),
            Self::Json { source } => write!(f, "JSON export error: {source}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source } => Some(source),
            Self::Json { source } => Some(source),
        }
    }
}

impl From<ExportError> for NerViewError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Service errors
// ---------------------------------------------------------------------------

/// Errors from the external prediction service.
#[derive(Debug)]
pub enum ServiceError {
    /// The HTTP client could not be constructed.
    Client { source: reqwest::Error },

    /// The request never produced a response (connection, timeout, TLS).
    Request { url: String, source: reqwest::Error },

    /// The service answered with a non-success status.
    Status {
        url: String,
        status: u16,
        body: String,
    },

    /// The response body could not be decoded.
    Decode { url: String, source: reqwest::Error },

    /// A document to upload could not be read.
    Upload { path: PathBuf, source: io::Error },
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client { source } => write!(f, "cannot create HTTP client: {source}"),
            Self::Request { url, source } => write!(
                f,
                "request to {url} failed: {source}. Check that the service is reachable."
            ),
            Self::Status { url, status, body } => {
                write!(f, "{url} returned HTTP {status}")?;
                if !body.is_empty() {
                    write!(f, ": {body}")?;
                }
                Ok(())
            }
            Self::Decode { url, source } => {
                write!(f, "cannot decode response from {url}: {source}")
            }
            Self::Upload { path, source } => {
                write!(f, "cannot read '{}' for upload: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Client { source } => Some(source),
            Self::Request { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
            Self::Upload { source, .. } => Some(source),
            Self::Status { .. } => None,
        }
    }
}

impl From<ServiceError> for NerViewError {
    fn from(e: ServiceError) -> Self {
        Self::Service(e)
    }
}

// ---------------------------------------------------------------------------
// Analyze errors
// ---------------------------------------------------------------------------

/// Errors related to preparing and running an analysis.
#[derive(Debug)]
pub enum AnalyzeError {
    /// Nothing to analyse after trimming whitespace.
    EmptyInput,

    /// An input file could not be read.
    Read { path: PathBuf, source: io::Error },

    /// The prediction service failed.
    Service(ServiceError),
}

impl fmt::Display for AnalyzeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "enter some text or choose a file to analyse"),
            Self::Read { path, source } => {
                write!(f, "cannot read '{}': {source}", path.display())
            }
            Self::Service(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for AnalyzeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::EmptyInput => None,
            Self::Read { source, .. } => Some(source),
            Self::Service(e) => Some(e),
        }
    }
}

impl From<ServiceError> for AnalyzeError {
    fn from(e: ServiceError) -> Self {
        Self::Service(e)
    }
}

impl From<AnalyzeError> for NerViewError {
    fn from(e: AnalyzeError) -> Self {
        Self::Analyze(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// A problem with `config.toml`.
///
/// Never fatal: `load_config` collects these as warnings and the affected
/// setting keeps its default.
#[derive(Debug)]
pub enum ConfigError {
    /// The file exists but could not be read.
    Unreadable { path: PathBuf, source: io::Error },

    /// The file is not valid TOML; every setting keeps its default.
    Unparseable {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// One setting was rejected, e.g. `service.timeout_seconds = 0`.
    InvalidValue {
        /// Dotted `section.key` name.
        key: String,
        value: String,
        expected: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreadable { path, source } => {
                write!(f, "cannot read '{}': {source}", path.display())
            }
            Self::Unparseable { path, source } => write!(
                f,
                "'{}' is not valid TOML, using built-in settings: {source}",
                path.display()
            ),
            Self::InvalidValue {
                key,
                value,
                expected,
            } => write!(
                f,
                "ignoring {key} = {value:?} (expected {expected}); using the default"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Unreadable { source, .. } => Some(source),
            Self::Unparseable { source, .. } => Some(source),
            Self::InvalidValue { .. } => None,
        }
    }
}

impl From<ConfigError> for NerViewError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for NerView results.
pub type Result<T> = std::result::Result<T, NerViewError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_history_write_error_keeps_source_chain() {
        let err: NerViewError = HistoryError::Write {
            path: PathBuf::from("history.json"),
            source: io::Error::new(io::ErrorKind::Other, "quota exceeded"),
        }
        .into();

        let msg = err.to_string();
        assert!(msg.starts_with("History error:"), "{msg}");
        assert!(msg.contains("Previous history kept"), "{msg}");

        let inner = err.source().expect("top-level error has a source");
        assert!(inner.source().is_some(), "io::Error must stay in the chain");
    }

    #[test]
    fn test_status_error_omits_empty_body() {
        let err = ServiceError::Status {
            url: "http://localhost:8000/predict-enhanced".to_string(),
            status: 503,
            body: String::new(),
        };
        assert_eq!(
            err.to_string(),
            "http://localhost:8000/predict-enhanced returned HTTP 503"
        );
    }

    #[test]
    fn test_analyze_service_error_displays_inner_message() {
        let err: AnalyzeError = ServiceError::Status {
            url: "u".to_string(),
            status: 500,
            body: "boom".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "u returned HTTP 500: boom");
    }

    #[test]
    fn test_invalid_config_value_names_key_and_fallback() {
        let err: NerViewError = ConfigError::InvalidValue {
            key: "service.timeout_seconds".to_string(),
            value: "0".to_string(),
            expected: "1-600".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Configuration error: ignoring service.timeout_seconds = \"0\" (expected 1-600); using the default"
        );
        assert!(err.source().and_then(|e| e.source()).is_none());
    }
}
