use anyhow::Result;
use std::path::Path;
use std::fs;
use chrono::Local;
use tracing::info;
use tracing_subscriber::{FmtSubscriber, EnvFilter};

const DEFAULT_FILTER: &str = "info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Sends all tracing output to a timestamped file under `log_dir`
pub fn init_logger(log_dir: &Path) -> Result<()> {
    // Create log directory if it doesn't exist
    if !log_dir.exists() {
        fs::create_dir_all(log_dir)?;
    }

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let log_file = log_dir.join(format!("webshot_recorder_{}.log", timestamp));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter())
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_target(false)
        .with_ansi(false)
        .with_writer(fs::File::create(&log_file)?)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    info!("Logger initialized, writing to {}", log_file.display());

    Ok(())
}

/// Sends tracing output to stderr; `verbose` lowers the default level to debug
pub fn init_console_logger(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        env_filter()
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
