//! Logger facade
//!
//! A [`Logger`] owns an ordered list of hooks and a minimum severity. Every
//! event at or above the minimum goes to each hook whose level set contains
//! the event's level, in the order the hooks were added.
//!
//! Failing hooks never reach the caller of the emission methods. They are
//! reported on stderr and the remaining hooks still fire.
//!
//! `fatal` ends the process after every hook has fired and every sink has been
//! flushed. `panic` does the same and then panics.

use std::fmt;

use crate::error::LogError;
use crate::event::LogEvent;
use crate::hook::SinkHook;
use crate::severity::Severity;

/// Called with the exit status after a fatal event
pub type ExitHandler = fn(i32) -> !;

/// Exit status used after a fatal event
pub const FATAL_EXIT_CODE: i32 = 1;

/// Result of dispatching one event
#[derive(Debug, Default)]
pub struct Dispatch {
    /// Indices of hooks that were fired, in firing order
    pub fired: Vec<usize>,
    /// Hooks that fired but failed to write
    pub failures: Vec<(usize, LogError)>,
}

impl Dispatch {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Routes events to hooks
pub struct Logger {
    hooks: Vec<SinkHook>,
    min_level: Severity,
    exit: ExitHandler,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("hooks", &self.hooks)
            .field("min_level", &self.min_level)
            .finish_non_exhaustive()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(Severity::Info)
    }
}

impl Logger {
    /// Create a logger with no hooks
    pub fn new(min_level: Severity) -> Self {
        Self {
            hooks: Vec::new(),
            min_level,
            exit: std::process::exit,
        }
    }

    /// Append a hook; hooks fire in the order they were added
    pub fn add_hook(&mut self, hook: SinkHook) {
        self.hooks.push(hook);
    }

    /// Builder-style method for adding a hook
    pub fn with_hook(mut self, hook: SinkHook) -> Self {
        self.add_hook(hook);
        self
    }

    /// Replace what runs after a fatal event (`std::process::exit` by default)
    pub fn with_exit_handler(mut self, exit: ExitHandler) -> Self {
        self.exit = exit;
        self
    }

    pub fn min_level(&self) -> Severity {
        self.min_level
    }

    pub fn hooks(&self) -> &[SinkHook] {
        &self.hooks
    }

    /// Whether an event at `level` would reach at least one hook
    pub fn is_enabled(&self, level: Severity) -> bool {
        level >= self.min_level && self.hooks.iter().any(|h| h.accepts(level))
    }

    /// Fire every matching hook for `event`
    pub fn dispatch(&self, event: &LogEvent) -> Dispatch {
        let mut result = Dispatch::default();
        if event.level() < self.min_level {
            return result;
        }

        for (index, hook) in self.hooks.iter().enumerate() {
            if !hook.accepts(event.level()) {
                continue;
            }
            result.fired.push(index);
            if let Err(e) = hook.fire(event) {
                result.failures.push((index, e));
            }
        }
        result
    }

    /// Dispatch an already built event, reporting hook failures on stderr
    pub fn log_event(&self, event: &LogEvent) {
        for (_, e) in self.dispatch(event).failures {
            eprintln!("failed to fire hook: {}", e);
        }
    }

    /// Log `message` at `level`, annotated with the caller's location
    #[track_caller]
    pub fn log(&self, level: Severity, message: impl Into<String>) {
        if !self.is_enabled(level) {
            return;
        }
        self.log_event(&LogEvent::here(level, message));
    }

    #[track_caller]
    pub fn trace(&self, message: impl Into<String>) {
        self.log(Severity::Trace, message);
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(Severity::Debug, message);
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.log(Severity::Info, message);
    }

    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(Severity::Warn, message);
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.log(Severity::Error, message);
    }

    /// Log at fatal level, flush every sink, then exit with status 1
    #[track_caller]
    pub fn fatal(&self, message: impl Into<String>) -> ! {
        self.log(Severity::Fatal, message);
        self.flush();
        (self.exit)(FATAL_EXIT_CODE)
    }

    /// Log at panic level, flush every sink, then panic with the message
    #[track_caller]
    pub fn panic(&self, message: impl Into<String>) -> ! {
        let message = message.into();
        self.log(Severity::Panic, message.as_str());
        self.flush();
        panic!("{}", message)
    }

    /// Flush every sink, reporting failures on stderr
    pub fn flush(&self) {
        for hook in &self.hooks {
            if let Err(e) = hook.flush() {
                eprintln!("failed to flush hook: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RotationPolicy;
    use crate::format::Formatter;
    use crate::severity::LevelSet;
    use crate::sink::{LineBuffer, RotatingFileWriter};
    use std::panic::{self, AssertUnwindSafe};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn buffer_hook(levels: &[Severity]) -> (Arc<LineBuffer>, SinkHook) {
        let lines = Arc::new(LineBuffer::new(100));
        let hook = SinkHook::new(Arc::clone(&lines), levels.into(), Formatter::plain(false));
        (lines, hook)
    }

    fn exit_by_panicking(code: i32) -> ! {
        panic!("exit {}", code)
    }

    #[test]
    fn test_dispatch_fires_matching_hooks_in_order() {
        let (_, a) = buffer_hook(&[Severity::Error, Severity::Info]);
        let (_, b) = buffer_hook(&[Severity::Info]);
        let (_, c) = buffer_hook(&[Severity::Error]);
        let logger = Logger::new(Severity::Trace).with_hook(a).with_hook(b).with_hook(c);

        for level in Severity::ALL {
            let dispatch = logger.dispatch(&LogEvent::new(level, "m"));
            let expected: Vec<usize> = logger
                .hooks()
                .iter()
                .enumerate()
                .filter(|(_, h)| h.accepts(level))
                .map(|(i, _)| i)
                .collect();
            assert_eq!(dispatch.fired, expected, "level {}", level);
            assert!(dispatch.is_ok());
        }

        let info = logger.dispatch(&LogEvent::new(Severity::Info, "m"));
        assert_eq!(info.fired, vec![0, 1]);
        let error = logger.dispatch(&LogEvent::new(Severity::Error, "m"));
        assert_eq!(error.fired, vec![0, 2]);
    }

    #[test]
    fn test_minimum_level_filters_before_hooks() {
        let (lines, hook) = buffer_hook(&Severity::ALL);
        let logger = Logger::new(Severity::Info).with_hook(hook);

        assert!(logger.dispatch(&LogEvent::new(Severity::Debug, "hidden")).fired.is_empty());
        logger.debug("hidden");
        logger.info("shown");

        let out = lines.lines();
        assert_eq!(out.len(), 1);
        assert!(out[0].ends_with("| shown"));
        assert!(!logger.is_enabled(Severity::Debug));
        assert!(logger.is_enabled(Severity::Warn));
    }

    #[test]
    fn test_failing_hook_does_not_stop_later_hooks() {
        let temp_dir = TempDir::new().unwrap();
        let broken = SinkHook::new(
            RotatingFileWriter::new(
                temp_dir.path().join("missing").join("app.log"),
                RotationPolicy::default(),
            ),
            LevelSet::all(),
            Formatter::plain(false),
        );
        let (lines, ok) = buffer_hook(&Severity::ALL);
        let logger = Logger::new(Severity::Trace).with_hook(broken).with_hook(ok);

        let dispatch = logger.dispatch(&LogEvent::new(Severity::Error, "still delivered"));
        assert_eq!(dispatch.fired, vec![0, 1]);
        assert_eq!(dispatch.failures.len(), 1);
        assert_eq!(dispatch.failures[0].0, 0);

        // the emission path swallows the failure
        logger.error("again");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_emission_records_caller() {
        let lines = Arc::new(LineBuffer::new(10));
        let hook = SinkHook::new(Arc::clone(&lines), LevelSet::all(), Formatter::plain(true));
        let logger = Logger::new(Severity::Trace).with_hook(hook);

        logger.warn("where am I");

        let out = lines.lines();
        assert!(out[0].contains("logger.rs:"), "{}", out[0]);
        assert!(out[0].ends_with("| where am I"));
    }

    #[test]
    fn test_fatal_reaches_every_hook_before_exit() {
        let (first, a) = buffer_hook(&[Severity::Fatal]);
        let (second, b) = buffer_hook(&[Severity::Fatal, Severity::Error]);
        let logger = Logger::new(Severity::Info)
            .with_hook(a)
            .with_hook(b)
            .with_exit_handler(exit_by_panicking);

        let result = panic::catch_unwind(AssertUnwindSafe(|| logger.fatal("shutting down")));
        let payload = result.unwrap_err();
        assert_eq!(payload.downcast_ref::<String>().unwrap(), "exit 1");

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert!(first.lines()[0].contains("| Fatal   | shutting down"));
    }

    #[test]
    fn test_panic_level_logs_then_panics() {
        let (lines, hook) = buffer_hook(&[Severity::Panic]);
        let logger = Logger::new(Severity::Info).with_hook(hook);

        let result = panic::catch_unwind(AssertUnwindSafe(|| logger.panic("invariant broken")));
        let payload = result.unwrap_err();
        assert_eq!(payload.downcast_ref::<String>().unwrap(), "invariant broken");
        assert!(lines.lines()[0].contains("| Panic   | invariant broken"));
    }

    #[test]
    fn test_logger_is_shareable_across_threads() {
        let (lines, hook) = buffer_hook(&Severity::ALL);
        let logger = Arc::new(Logger::new(Severity::Trace).with_hook(hook));

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let logger = Arc::clone(&logger);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        logger.info(format!("{}-{}", t, i));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(lines.len(), 100);
    }
}
