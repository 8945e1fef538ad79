//! Logging setup: stdout plus optional daily-rotated text and JSON log files.
//!
//! Level filtering comes from `RUST_LOG` (default: "info"), e.g.
//! `RUST_LOG=catalog_scraper=debug,reqwest=warn`.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Keeps the background log writers alive; drop it only at process exit.
#[must_use = "dropping the guard stops file logging"]
pub struct LogGuard {
    _text: WorkerGuard,
    _json: WorkerGuard,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install file and stdout logging.
///
/// Writes `scraper.log` (compact text) and `scraper.json.log` (structured)
/// into `log_dir`, rotated daily.
pub fn init_logging<P: AsRef<Path>>(log_dir: P) -> Result<LogGuard, Box<dyn std::error::Error>> {
    let log_path = log_dir.as_ref();
    std::fs::create_dir_all(log_path)?;

    let text_file_appender = tracing_appender::rolling::daily(log_path, "scraper.log");
    let (text_writer, text_guard) = tracing_appender::non_blocking(text_file_appender);

    let json_file_appender = tracing_appender::rolling::daily(log_path, "scraper.json.log");
    let (json_writer, json_guard) = tracing_appender::non_blocking(json_file_appender);

    let text_layer = fmt::layer()
        .with_writer(text_writer)
        .with_target(true)
        .with_line_number(true)
        .with_ansi(false)
        .compact()
        .with_filter(env_filter());

    let json_layer = fmt::layer()
        .json()
        .with_writer(json_writer)
        .with_target(true)
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(env_filter());

    let stdout_layer = fmt::layer()
        .with_target(false)
        .compact()
        .with_filter(env_filter());

    tracing_subscriber::registry()
        .with(text_layer)
        .with(json_layer)
        .with(stdout_layer)
        .try_init()?;

    tracing::debug!("Logging to {}", log_path.display());

    Ok(LogGuard {
        _text: text_guard,
        _json: json_guard,
    })
}

/// Install stdout-only logging
pub fn init_stdout_logging() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).compact().with_filter(env_filter()))
        .try_init()?;
    Ok(())
}
