// Bullpen grader entry point.
//
// Startup sequence:
// 1. Parse the command line
// 2. Copy default config files if needed, then load config
// 3. Initialize tracing (log to file, not terminal)
// 4. Run the requested command

use std::path::Path;

use anyhow::Context;
use bullpen_core::config;
use bullpen_tui::{app, cli::Cli};
use clap::Parser;
use tracing::{error, info};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let base_dir = app::base_dir(cli.config_dir)?;
    let config = config::load_config(&base_dir).context("failed to load configuration")?;

    init_tracing(&base_dir, &config.log_filter)?;
    info!("Bullpen grader starting in {}", base_dir.display());

    if let Err(e) = app::run(cli.command, &config) {
        error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which the viewer
/// uses). `RUST_LOG` overrides the configured filter.
fn init_tracing(base_dir: &Path, default_filter: &str) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = base_dir.join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create {}", log_dir.display()))?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("bullpen.log"))
        .context("failed to open log file")?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
