//! Sink hooks
//!
//! A hook binds a sink to the formatter that renders for it and to the set of
//! levels it accepts. Writes go through a per-hook lock so concurrent callers
//! never interleave lines.

use std::io::Write;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::{LogError, Result};
use crate::event::LogEvent;
use crate::format::Formatter;
use crate::severity::{LevelSet, Severity};
use crate::sink::Sink;

/// A (sink, level set, formatter) triple
#[derive(Debug)]
pub struct SinkHook {
    sink: Mutex<Sink>,
    levels: LevelSet,
    formatter: Formatter,
}

impl SinkHook {
    pub fn new(sink: impl Into<Sink>, levels: LevelSet, formatter: Formatter) -> Self {
        Self {
            sink: Mutex::new(sink.into()),
            levels,
            formatter,
        }
    }

    /// Hook writing to standard output
    pub fn stdout(levels: LevelSet, formatter: Formatter) -> Self {
        Self::new(Sink::stdout(), levels, formatter)
    }

    pub fn levels(&self) -> &LevelSet {
        &self.levels
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    pub fn accepts(&self, level: Severity) -> bool {
        self.levels.contains(level)
    }

    pub fn sink_name(&self) -> &'static str {
        self.lock().name()
    }

    /// Format the event and write it to the sink as a single write
    pub fn fire(&self, event: &LogEvent) -> Result<()> {
        let line = self.formatter.format_bytes(event);
        let mut sink = self.lock();
        sink.write_all(&line).map_err(|source| LogError::WriteFailed {
            sink: sink.name(),
            source,
        })
    }

    pub fn flush(&self) -> Result<()> {
        let mut sink = self.lock();
        sink.flush().map_err(|source| LogError::WriteFailed {
            sink: sink.name(),
            source,
        })
    }

    /// A caller that panicked mid-write must not silence the sink for everyone else
    fn lock(&self) -> MutexGuard<'_, Sink> {
        self.sink.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
