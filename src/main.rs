use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use hooklog::{GlobalFlags, LoggingConfig};

/// Emit one message per level through the console and file hooks
#[derive(Parser)]
#[command(name = "hooklog", version, about)]
struct Cli {
    /// Verbose output. Print info messages to stdout
    #[arg(short, long)]
    verbose: bool,

    /// Set log level to trace for file and stdout. Overrides -v
    #[arg(long)]
    debug: bool,

    /// Directory for the log file and its backups
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// TOML file with log directory, file name and rotation settings
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => LoggingConfig::load(path)?,
        None => LoggingConfig::default(),
    };
    if let Some(dir) = cli.log_dir {
        config.log_dir = dir;
    }

    let flags = GlobalFlags::new(cli.verbose, cli.debug);
    let logger = match hooklog::init_with_config(flags, &config) {
        Ok(logger) => Arc::new(logger),
        Err(e) => {
            eprintln!("failed to setup logging: {}", e);
            std::process::exit(1);
        }
    };
    logger.info("logging initialized");

    if let Err(e) = hooklog::init_tracing_bridge(Arc::clone(&logger)) {
        logger.warn(format!("tracing events will not be logged: {}", e));
    }
    tracing::info!(path = %config.log_file_path().display(), "log file ready");

    logger.trace("trace message");
    logger.debug("debug message");
    logger.info("info message");
    logger.warn("warn message");
    logger.error("error message");
    logger.fatal("fatal message")
}
