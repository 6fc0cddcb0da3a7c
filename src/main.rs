use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use refalt_annotator::cli;
use refalt_annotator::utils::logging::{rotating_log, LOG_BACKUPS, LOG_MAX_BYTES};

/// Console logging on stderr, plus a size-rotated plain-text log file.
///
/// `RUST_LOG` overrides the console level when set.
fn init_logging(cli: &cli::Cli) -> anyhow::Result<()> {
    let console_level = LevelFilter::from(cli.log_level);
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(console_level.to_string()));

    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(console_filter);

    let file = if cli.no_log_file {
        None
    } else {
        let writer = rotating_log(&cli.log_file, LOG_MAX_BYTES, LOG_BACKUPS).with_context(|| {
            format!("Failed to open log file {}", cli.log_file.display())
        })?;
        Some(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(writer))
                .with_ansi(false)
                .with_filter(LevelFilter::from(cli.log_file_level)),
        )
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file)
        .init();

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    init_logging(&cli)?;

    cli::annotate::run(cli)
}
