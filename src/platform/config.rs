// NerView - platform/config.rs
//
// Platform-specific configuration, data directory resolution, and
// config.toml loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for NerView data and configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/nerview/ or %APPDATA%\NerView\config\)
    pub config_dir: PathBuf,

    /// Data directory holding the history slot.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[service]` section.
    pub service: ServiceSection,
    /// `[export]` section.
    pub export: ExportSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[service]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ServiceSection {
    /// Base URL of the prediction service.
    pub base_url: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: Option<u64>,
}

/// `[export]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExportSection {
    /// Directory export files are written to.
    pub output_directory: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Prediction service base URL, without trailing slash.
    pub service_url: String,
    /// Request timeout in seconds.
    pub service_timeout_secs: u64,
    /// Where exports are written.
    pub export_dir: PathBuf,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service_url: constants::DEFAULT_SERVICE_URL.to_string(),
            service_timeout_secs: constants::DEFAULT_SERVICE_TIMEOUT_SECS,
            export_dir: PathBuf::from("."),
            log_level: None,
        }
    }
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal
/// problems. A missing file is the normal first run: defaults, no warnings.
/// An unreadable or unparseable file yields defaults plus one error.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<ConfigError>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) => {
            let err = ConfigError::Unreadable {
                path: config_path,
                source: e,
            };
            return (AppConfig::default(), vec![err]);
        }
    };

    match toml::from_str::<RawConfig>(&content) {
        Ok(raw) => {
            tracing::info!(path = %config_path.display(), "Loaded config.toml");
            validate(raw)
        }
        Err(e) => {
            let err = ConfigError::Unparseable {
                path: config_path,
                source: e,
            };
            (AppConfig::default(), vec![err])
        }
    }
}

/// Check each field against named constants, accumulating all problems.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<ConfigError>) {
    let mut config = AppConfig::default();
    let mut warnings: Vec<ConfigError> = Vec::new();

    // -- Service: base_url --
    if let Some(url) = raw.service.base_url {
        let trimmed = url.trim().trim_end_matches('/');
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            config.service_url = trimmed.to_string();
        } else {
            warnings.push(ConfigError::InvalidValue {
                key: "service.base_url".to_string(),
                value: url,
                expected: "an http:// or https:// URL".to_string(),
            });
        }
    }

    // -- Service: timeout_seconds --
    if let Some(secs) = raw.service.timeout_seconds {
        if (constants::MIN_SERVICE_TIMEOUT_SECS..=constants::MAX_SERVICE_TIMEOUT_SECS)
            .contains(&secs)
        {
            config.service_timeout_secs = secs;
        } else {
            warnings.push(ConfigError::InvalidValue {
                key: "service.timeout_seconds".to_string(),
                value: secs.to_string(),
                expected: format!(
                    "{}-{}",
                    constants::MIN_SERVICE_TIMEOUT_SECS,
                    constants::MAX_SERVICE_TIMEOUT_SECS
                ),
            });
        }
    }

    // -- Export: output_directory --
    if let Some(dir) = raw.export.output_directory {
        if !dir.trim().is_empty() {
            config.export_dir = PathBuf::from(dir);
        }
    }

    // -- Logging: level --
    if let Some(level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(ConfigError::InvalidValue {
                key: "logging.level".to_string(),
                value: level,
                expected: constants::VALID_LOG_LEVELS.join(", "),
            });
        }
    }

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, body: &str) {
        std::fs::write(dir.path().join(constants::CONFIG_FILE_NAME), body).unwrap();
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let (config, warnings) = load_config(dir.path());
        assert_eq!(config, AppConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_valid_values_are_applied() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir,
            r#"
            [service]
            base_url = "https://ner.example.org/"
            timeout_seconds = 90

            [export]
            output_directory = "/tmp/ner-exports"

            [logging]
            level = "DEBUG"

            [future_section]
            ignored = true
            "#,
        );
        let (config, warnings) = load_config(dir.path());
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(config.service_url, "https://ner.example.org");
        assert_eq!(config.service_timeout_secs, 90);
        assert_eq!(config.export_dir, PathBuf::from("/tmp/ner-exports"));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_invalid_values_fall_back_with_warnings() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir,
            r#"
            [service]
            base_url = "ftp://nope"
            timeout_seconds = 0

            [logging]
            level = "loud"
            "#,
        );
        let (config, warnings) = load_config(dir.path());
        assert_eq!(warnings.len(), 3);
        assert_eq!(config, AppConfig::default());
        assert!(warnings[0].to_string().contains("service.base_url"));
    }

    #[test]
    fn test_unparseable_file_reports_error() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "[service\nbase_url = ");
        let (config, warnings) = load_config(dir.path());
        assert_eq!(config, AppConfig::default());
        assert!(matches!(warnings.as_slice(), [ConfigError::Unparseable { .. }]));
    }
}
