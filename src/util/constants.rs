// NerView - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "NerView";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "NerView";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Labels
// =============================================================================

/// The BIO "outside" sentinel: the token belongs to no entity.
pub const OUTSIDE_LABEL: &str = "O";

/// Prefix marking the first token of an entity span.
pub const BEGIN_PREFIX: &str = "B-";

/// Prefix marking a continuation token of an entity span.
pub const INSIDE_PREFIX: &str = "I-";

// =============================================================================
// Colour assignment
// =============================================================================

/// Number of hue degrees on the colour wheel.
pub const HUE_DEGREES: i64 = 360;

/// Background swatch: (saturation %, lightness %).
pub const BACKGROUND_SL: (u8, u8) = (55, 22);

/// Foreground (text) swatch: (saturation %, lightness %).
pub const FOREGROUND_SL: (u8, u8) = (85, 80);

/// Border swatch: (saturation %, lightness %).
pub const BORDER_SL: (u8, u8) = (60, 35);

/// Border width in CSS pixels.
pub const BORDER_WIDTH_PX: u8 = 1;

// =============================================================================
// History
// =============================================================================

/// Hard cap on the number of records kept in the history slot.
///
/// Every mutating operation leaves the list at or below this length; the
/// oldest (tail) record is evicted first.
pub const HISTORY_CAPACITY: usize = 50;

/// Name of the persisted history slot (file name in the data directory).
pub const HISTORY_FILE_NAME: &str = "history.json";

/// Characters of analysed text shown in a history listing before the
/// ellipsis.
pub const HISTORY_PREVIEW_CHARS: usize = 200;

/// Suffix appended to a truncated preview.
pub const PREVIEW_ELLIPSIS: &str = "...";

// =============================================================================
// Prediction service
// =============================================================================

/// Default base URL of the prediction service.
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8000";

/// Path of the enhanced text prediction endpoint.
pub const PREDICT_TEXT_PATH: &str = "/predict-enhanced";

/// Path of the multipart document prediction endpoint.
pub const PREDICT_FILE_PATH: &str = "/predict-file";

/// Path of the PDF report endpoint.
pub const EXPORT_PDF_PATH: &str = "/export-pdf";

/// Multipart field name carrying an uploaded document.
pub const UPLOAD_FIELD_NAME: &str = "file";

/// Default request timeout in seconds.
pub const DEFAULT_SERVICE_TIMEOUT_SECS: u64 = 30;

/// Minimum user-configurable request timeout in seconds.
pub const MIN_SERVICE_TIMEOUT_SECS: u64 = 1;

/// Maximum user-configurable request timeout in seconds.
/// Free-tier hosts can take a minute or more to wake from idle.
pub const MAX_SERVICE_TIMEOUT_SECS: u64 = 600;

/// Maximum characters of an error response body kept in an error message.
pub const MAX_ERROR_BODY_CHARS: usize = 200;

/// File extensions read locally and sent to the text endpoint.
/// Anything else is uploaded to the document endpoint for server-side parsing.
pub const PLAIN_TEXT_EXTENSIONS: &[&str] = &["txt", "md", "csv", "json"];

// =============================================================================
// Export
// =============================================================================

/// File name of the JSON result download.
pub const RESULT_JSON_FILE_NAME: &str = "resultat_ner.json";

/// File name of the token CSV download.
pub const RESULT_CSV_FILE_NAME: &str = "resultat_ner.csv";

/// File-name prefix of the timestamped entity CSV download.
pub const ENTITIES_CSV_PREFIX: &str = "entites";

/// File-name prefix of the timestamped analysis JSON download.
pub const ANALYSIS_JSON_PREFIX: &str = "ner-analysis";

/// File-name prefix of the timestamped PDF report.
pub const PDF_REPORT_PREFIX: &str = "rapport-ner";

/// File-name prefix of a single history record download.
pub const HISTORY_ITEM_PREFIX: &str = "ner";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Log levels accepted in config.toml.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
