// NerView - util/logging.rs
//
// Structured logging with runtime-selectable debug mode.
//
// Activation:
//   - Environment variable: RUST_LOG=debug (or trace)
//   - CLI flag: --debug
//   - Config file: [logging] level = "debug"
//
// Output: stderr only, so exported bytes written to stdout are never mixed
// with log lines. Analysed text is never logged above debug level.

use tracing_subscriber::EnvFilter;

/// Pick the filter directive according to precedence.
///
/// Priority: RUST_LOG env var > CLI --debug flag > config level > default "warn".
/// Returns `None` when RUST_LOG is set so the caller defers to the environment.
fn filter_directive(env_set: bool, debug_flag: bool, config_level: Option<&str>) -> Option<String> {
    if env_set {
        None
    } else if debug_flag {
        Some("debug".to_string())
    } else if let Some(level) = config_level {
        Some(level.to_string())
    } else {
        Some(super::constants::DEFAULT_LOG_LEVEL.to_string())
    }
}

/// Initialise the logging subsystem.
///
/// `debug_flag` is true when the user passed --debug on the CLI.
/// `config_level` is the level from config.toml (if present).
pub fn init(debug_flag: bool, config_level: Option<&str>) {
    let env_set = std::env::var("RUST_LOG").is_ok();
    let filter = match filter_directive(env_set, debug_flag, config_level) {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::from_default_env(),
    };

    // try_init: integration tests may initialise more than once per process.
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(debug_flag)
        .with_line_number(debug_flag)
        .compact()
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(
            app = super::constants::APP_NAME,
            version = super::constants::APP_VERSION,
            "Logging initialised"
        );
    }
}
