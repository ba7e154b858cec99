// NerView - main.rs
//
// Command-line entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading and logging initialisation
// 3. Dispatch to analysis, history, export and colour commands

use clap::{Parser, Subcommand, ValueEnum};
use nerview::app::analyze;
use nerview::app::history::{FileSlot, HistoryStore};
use nerview::app::service::{HttpPredictionService, PdfReportRequest, PredictionService};
use nerview::core::colour::{colour_for, ColourCache};
use nerview::core::export;
use nerview::core::labels::canonical_type;
use nerview::core::model::HistoryRecord;
use nerview::platform::config::{load_config, AppConfig, PlatformPaths};
use nerview::platform::fs::write_export;
use nerview::ui::render;
use nerview::util::constants;
use nerview::util::error::{HistoryError, NerViewError, Result};
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::time::Duration;

/// NerView - client for a named-entity-recognition service.
///
/// Sends text or documents to the prediction service, shows the tagged
/// tokens with stable per-type colours, keeps the last 50 analyses, and
/// exports results as JSON, CSV or PDF.
#[derive(Parser, Debug)]
#[command(name = "nerview", version, about)]
struct Cli {
    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    /// Directory containing config.toml.
    #[arg(long = "config-dir", global = true)]
    config_dir: Option<PathBuf>,

    /// Directory holding the history file.
    #[arg(long = "data-dir", global = true)]
    data_dir: Option<PathBuf>,

    /// Prediction service base URL (overrides config.toml).
    #[arg(short = 's', long = "service-url", global = true)]
    service_url: Option<String>,

    /// Disable coloured output.
    #[arg(long = "no-colour", global = true)]
    no_colour: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyse text (argument or --file) and save it to history.
    Analyze {
        /// Text to analyse.
        text: Option<String>,

        /// Read input from a file (.txt is read locally; .pdf/.docx are uploaded).
        #[arg(short = 'f', long = "file", conflicts_with = "text")]
        file: Option<PathBuf>,
    },

    /// Inspect or edit the analysis history.
    #[command(subcommand)]
    History(HistoryCommand),

    /// Export a history record ("latest" for the newest).
    Export {
        /// Output format.
        #[arg(value_enum)]
        format: ExportFormat,

        /// History record id, or "latest".
        id: String,

        /// Output directory (defaults to [export] output_directory).
        #[arg(short = 'o', long = "out")]
        out: Option<PathBuf>,

        /// Write to stdout instead of a file.
        #[arg(long = "stdout", conflicts_with = "out")]
        stdout: bool,

        /// Use a timestamped JSON file name (ner-analysis-<ms>.json).
        #[arg(long = "stamped")]
        stamped: bool,
    },

    /// Show the colours assigned to entity types (labels are normalised).
    Colours {
        /// Entity types or BIO labels, e.g. PER or B-LOC.
        #[arg(required = true)]
        types: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
enum HistoryCommand {
    /// List saved analyses, newest first.
    List,
    /// Show one saved analysis.
    Show { id: String },
    /// Delete one saved analysis.
    Delete { id: String },
    /// Delete all saved analyses.
    Clear,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ExportFormat {
    /// {text, results, timestamp}
    Json,
    /// Token,Label table
    Csv,
    /// Text,Type,Position,Length table
    Entities,
    /// {text, results, date} as stored in history
    Record,
    /// PDF report rendered by the service
    Pdf,
}

/// Everything a command needs, resolved once at startup.
struct Context {
    config: AppConfig,
    store: HistoryStore<FileSlot>,
    colour: bool,
}

impl Context {
    fn service(&self) -> Result<HttpPredictionService> {
        let service = HttpPredictionService::new(
            &self.config.service_url,
            Duration::from_secs(self.config.service_timeout_secs),
        )?;
        Ok(service)
    }

    fn find(&self, id: &str) -> Result<HistoryRecord> {
        let found = if id == "latest" {
            self.store.load().into_iter().next()
        } else {
            self.store.get(id)
        };
        found.ok_or_else(|| HistoryError::NotFound { id: id.to_string() }.into())
    }
}

fn main() {
    let cli = Cli::parse();

    let paths = PlatformPaths::resolve();
    let config_dir = cli.config_dir.clone().unwrap_or(paths.config_dir.clone());
    let (mut config, config_warnings) = load_config(&config_dir);

    // Initialise logging subsystem
    nerview::util::logging::init(cli.debug, config.log_level.as_deref());

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        "NerView starting"
    );
    for warning in &config_warnings {
        tracing::warn!(error = %warning, "Configuration warning");
    }

    if let Some(url) = cli.service_url.as_deref() {
        config.service_url = url.trim_end_matches('/').to_string();
    }

    let data_dir = cli.data_dir.clone().unwrap_or(paths.data_dir);
    let ctx = Context {
        config,
        store: HistoryStore::open(&data_dir),
        colour: !cli.no_colour && std::io::stdout().is_terminal(),
    };

    if let Err(e) = run(cli.command, ctx) {
        tracing::debug!(error = ?e, "Command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(command: Command, mut ctx: Context) -> Result<()> {
    match command {
        Command::Analyze { text, file } => cmd_analyze(&mut ctx, text, file),
        Command::History(sub) => cmd_history(&mut ctx, sub),
        Command::Export {
            format,
            id,
            out,
            stdout,
            stamped,
        } => cmd_export(&ctx, format, &id, out, stdout, stamped),
        Command::Colours { types } => cmd_colours(&ctx, &types),
    }
}

fn print(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(text.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|e| NerViewError::Io {
            path: PathBuf::from("<stdout>"),
            operation: "write",
            source: e,
        })
}

fn cmd_analyze(ctx: &mut Context, text: Option<String>, file: Option<PathBuf>) -> Result<()> {
    let service = ctx.service()?;
    let outcome = match (file, text) {
        (Some(path), _) => analyze::analyze_path(&service, &mut ctx.store, &path)?,
        (None, Some(text)) => analyze::analyze_text(&service, &mut ctx.store, &text)?,
        (None, None) => analyze::analyze_text(&service, &mut ctx.store, "")?,
    };

    print(&render_record(&outcome.record, ctx.colour))?;

    match outcome.history_error {
        None => print(&format!("Saved to history as {}\n", outcome.record.id)),
        Some(e) => {
            eprintln!("Warning: {e}");
            Ok(())
        }
    }
}

fn render_record(record: &HistoryRecord, colour: bool) -> String {
    let mut cache = ColourCache::new();
    let result = &record.results;
    let mut out = String::new();
    out.push_str(&render::heading("Entities", colour));
    out.push_str(&render::render_tokens(result, &mut cache, colour));
    out.push_str("\n\n");
    out.push_str(&render::heading("Types", colour));
    out.push_str(&render::render_legend(result, &mut cache, colour));
    out.push('\n');
    out.push_str(&render::heading("Statistics", colour));
    out.push_str(&render::render_statistics(result.statistics.as_ref()));
    out
}

fn cmd_history(ctx: &mut Context, command: HistoryCommand) -> Result<()> {
    match command {
        HistoryCommand::List => print(&render::render_history(&ctx.store.load(), ctx.colour)),
        HistoryCommand::Show { id } => {
            let record = ctx.find(&id)?;
            let mut out = render::heading(&format!("{}  {}", record.id, record.date), ctx.colour);
            out.push_str(&record.text);
            out.push_str("\n\n");
            out.push_str(&render_record(&record, ctx.colour));
            print(&out)
        }
        HistoryCommand::Delete { id } => {
            let record = ctx.find(&id)?;
            ctx.store.remove(&record.id)?;
            print(&format!("Deleted {}\n", record.id))
        }
        HistoryCommand::Clear => {
            ctx.store.clear()?;
            print("History cleared\n")
        }
    }
}

fn cmd_export(
    ctx: &Context,
    format: ExportFormat,
    id: &str,
    out: Option<PathBuf>,
    to_stdout: bool,
    stamped: bool,
) -> Result<()> {
    let record = ctx.find(id)?;
    let now_ms = chrono::Utc::now().timestamp_millis();

    let (bytes, file_name) = match format {
        ExportFormat::Json => {
            let name = if stamped {
                export::analysis_json_file_name(now_ms)
            } else {
                constants::RESULT_JSON_FILE_NAME.to_string()
            };
            (export::to_json(&record.text, &record.results)?, name)
        }
        ExportFormat::Csv => (
            export::to_csv(&record.results)?,
            constants::RESULT_CSV_FILE_NAME.to_string(),
        ),
        ExportFormat::Entities => (
            export::entities_to_csv(record.results.entities())?,
            export::entities_csv_file_name(now_ms),
        ),
        ExportFormat::Record => (
            export::record_to_json(&record)?,
            export::record_file_name(&record.id),
        ),
        ExportFormat::Pdf => {
            let request = PdfReportRequest::new(&record.text, &record.results);
            (
                ctx.service()?.export_pdf(&request)?,
                export::pdf_report_file_name(now_ms),
            )
        }
    };

    if to_stdout {
        let mut stdout = std::io::stdout().lock();
        return stdout
            .write_all(&bytes)
            .and_then(|()| stdout.flush())
            .map_err(|e| NerViewError::Io {
                path: PathBuf::from("<stdout>"),
                operation: "export",
                source: e,
            });
    }

    let dir = out.unwrap_or_else(|| ctx.config.export_dir.clone());
    let path = write_export(&dir, &file_name, &bytes)?;
    print(&format!("Exported {}\n", path.display()))
}

fn cmd_colours(ctx: &Context, types: &[String]) -> Result<()> {
    let mut out = String::new();
    for raw in types {
        let entity_type = canonical_type(raw);
        let triple = colour_for(entity_type);
        let line = format!(
            "{entity_type}: background {}, text {}, border {}\n",
            triple.background,
            triple.foreground,
            triple.border_css()
        );
        if ctx.colour {
            use crossterm::style::Stylize;
            let (fg, bg) = nerview::ui::theme::chip_colours(&triple);
            let chip = format!(" {entity_type} ");
            out.push_str(&format!("{} {line}", chip.as_str().with(fg).on(bg)));
        } else {
            out.push_str(&line);
        }
    }
    print(&out)
}
