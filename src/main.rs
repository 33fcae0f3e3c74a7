// grind - terminal client for a self-hosted coding-practice judge
//
// Architecture:
// - Session core: state machine + SQLite-backed persistence for code
//   buffers, notes and solved/attempted progress
// - Judge API client (reqwest): problem catalog, submissions, custom runs
// - TUI (ratatui): dashboard / problem list / editor views over the core
// - Logging: tracing captured into an in-memory buffer for the status
//   bar, optionally mirrored to rotating JSON files

mod api;
mod cli;
mod config;
mod logging;
mod session;
mod tui;

use anyhow::Result;
use config::{Config, LogRotation, VERSION};
use logging::{LogBuffer, TuiLogLayer};
use session::store::KvStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Handle CLI subcommands first (config --show, --reset, ...).
    // If one was handled, exit early.
    let Some(overrides) = cli::handle_cli() else {
        return Ok(());
    };

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let mut config = Config::from_env();
    overrides.apply(&mut config);

    // Logs must never hit stdout while the TUI owns the screen, so
    // tracing goes to an in-memory buffer the status bar reads, plus
    // optional JSON files.
    //
    // Precedence: RUST_LOG env var > config file > default "info"
    let log_buffer = LogBuffer::new();
    let default_filter = format!("grind={}", config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    // The guard must stay alive for the whole run so file logs flush
    let _file_guard = match file_writer(&config) {
        Some((non_blocking, guard)) => {
            // File layer uses JSON format for structured log parsing
            tracing_subscriber::registry()
                .with(filter)
                .with(TuiLogLayer::new(log_buffer.clone()))
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking)
                        .with_ansi(false),
                )
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(TuiLogLayer::new(log_buffer.clone()))
                .init();
            None
        }
    };

    tracing::info!(
        "grind {} starting (judge: {}, data: {})",
        VERSION,
        config.judge_url,
        config.data_dir.display()
    );

    let store = KvStore::open(&config.db_path());

    tui::run_tui(config, log_buffer, store).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Build the optional rotating file writer (non-blocking, background thread)
fn file_writer(
    config: &Config,
) -> Option<(
    tracing_appender::non_blocking::NonBlocking,
    tracing_appender::non_blocking::WorkerGuard,
)> {
    if !config.logging.file_enabled {
        return None;
    }

    if let Err(e) = std::fs::create_dir_all(&config.logging.file_dir) {
        eprintln!(
            "Warning: Could not create log directory {:?}: {}",
            config.logging.file_dir, e
        );
        return None;
    }

    let appender = match config.logging.file_rotation {
        LogRotation::Hourly => tracing_appender::rolling::hourly(
            &config.logging.file_dir,
            &config.logging.file_prefix,
        ),
        LogRotation::Daily => tracing_appender::rolling::daily(
            &config.logging.file_dir,
            &config.logging.file_prefix,
        ),
        LogRotation::Never => tracing_appender::rolling::never(
            &config.logging.file_dir,
            &config.logging.file_prefix,
        ),
    };

    Some(tracing_appender::non_blocking(appender))
}
