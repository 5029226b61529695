//! Logging setup from the verbose/debug flags
//!
//! Console output is colored and by default shows only warnings and worse.
//! The log file is plain text and also records info. `verbose` adds info to
//! the console. `debug` sends every level to both and annotates each line with
//! its call site; it overrides `verbose`.

use std::fs;
use std::path::Path;

use crate::config::LoggingConfig;
use crate::error::{LogError, Result};
use crate::format::Formatter;
use crate::hook::SinkHook;
use crate::logger::Logger;
use crate::severity::{LevelSet, Severity};
use crate::sink::{RotatingFileWriter, Sink};

/// Process-wide flags, fixed at startup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlobalFlags {
    pub verbose: bool,
    pub debug: bool,
}

impl GlobalFlags {
    pub fn new(verbose: bool, debug: bool) -> Self {
        Self { verbose, debug }
    }
}

/// Levels each sink accepts, plus the logger's minimum severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelPlan {
    pub console: LevelSet,
    pub file: LevelSet,
    pub min_level: Severity,
}

impl LevelPlan {
    pub fn from_flags(flags: GlobalFlags) -> Self {
        use Severity::*;

        let mut console = LevelSet::from(&[Panic, Fatal, Error, Warn][..]);
        let mut file = LevelSet::from(&[Panic, Fatal, Error, Warn, Info][..]);
        let mut min_level = Info;

        if flags.debug {
            console.extend_with(&[Info, Debug, Trace]);
            file.extend_with(&[Info, Debug, Trace]);
            min_level = Trace;
        } else if flags.verbose {
            console.insert(Info);
        }

        Self {
            console,
            file,
            min_level,
        }
    }
}

/// Create `dir` and any missing parents
pub fn ensure_log_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| LogError::DirectoryCreationFailed {
        path: dir.to_path_buf(),
        source,
    })
}

/// Set up console and file logging into `log_dir` with default rotation
pub fn init_logging(verbose: bool, debug: bool, log_dir: impl AsRef<Path>) -> Result<Logger> {
    let config = LoggingConfig::with_log_dir(log_dir.as_ref());
    init_with_config(GlobalFlags::new(verbose, debug), &config)
}

/// Set up console and file logging as described by `config`
pub fn init_with_config(flags: GlobalFlags, config: &LoggingConfig) -> Result<Logger> {
    init_with_console(flags, config, Sink::stdout())
}

/// Same as [`init_with_config`] but with the console hook writing to `console`
pub fn init_with_console(
    flags: GlobalFlags,
    config: &LoggingConfig,
    console: Sink,
) -> Result<Logger> {
    let plan = LevelPlan::from_flags(flags);

    ensure_log_dir(&config.log_dir)?;
    let file = RotatingFileWriter::new(config.log_file_path(), config.rotation);

    let logger = Logger::new(plan.min_level)
        .with_hook(SinkHook::new(
            console,
            plan.console,
            Formatter::colored(flags.debug),
        ))
        .with_hook(SinkHook::new(
            file,
            plan.file,
            Formatter::plain(flags.debug),
        ));

    Ok(logger)
}
