//! Hooklog - leveled logging routed to per-sink hooks
//!
//! Events go to a colored console and a size-rotated log file, each with its
//! own set of accepted levels and its own line format.
//!
//! ```no_run
//! let logger = hooklog::init_logging(false, false, "./logs")?;
//! logger.info("written to the log file only");
//! logger.warn("written to the console and the log file");
//! # Ok::<(), hooklog::LogError>(())
//! ```

pub mod bridge;
pub mod config;
pub mod error;
pub mod event;
pub mod format;
pub mod hook;
pub mod init;
pub mod logger;
pub mod severity;
pub mod sink;

pub use bridge::{init_tracing_bridge, TracingBridge};
pub use config::{LoggingConfig, RotationPolicy};
pub use error::{LogError, Result};
pub use event::{Caller, LogEvent};
pub use format::{Formatter, Style};
pub use hook::SinkHook;
pub use init::{init_logging, init_with_config, init_with_console, GlobalFlags, LevelPlan};
pub use logger::{Dispatch, Logger};
pub use severity::{LevelSet, Severity};
pub use sink::{LineBuffer, RotatingFileWriter, Sink};
