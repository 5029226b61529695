//! Log events

use std::panic::Location;
use std::path::Path;

use chrono::{DateTime, FixedOffset, Local};

use crate::severity::Severity;

/// Source location that issued a log call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub file: String,
    pub line: u32,
}

impl Caller {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// `basename(file):line`
    pub fn short(&self) -> String {
        let name = Path::new(&self.file)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.file);
        format!("{}:{}", name, self.line)
    }
}

impl From<&Location<'_>> for Caller {
    fn from(location: &Location<'_>) -> Self {
        Caller::new(location.file(), location.line())
    }
}

/// A single log event, immutable once built
#[derive(Debug, Clone)]
pub struct LogEvent {
    timestamp: DateTime<FixedOffset>,
    level: Severity,
    message: String,
    caller: Option<Caller>,
}

impl LogEvent {
    /// Create an event stamped with the current local time and no caller
    pub fn new(level: Severity, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now().fixed_offset(),
            level,
            message: message.into(),
            caller: None,
        }
    }

    /// Create an event recording the location of the calling code
    #[track_caller]
    pub fn here(level: Severity, message: impl Into<String>) -> Self {
        Self::new(level, message).with_caller(Location::caller().into())
    }

    /// Builder-style method for setting the timestamp
    pub fn at(mut self, timestamp: DateTime<FixedOffset>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Builder-style method for setting the caller
    pub fn with_caller(mut self, caller: Caller) -> Self {
        self.caller = Some(caller);
        self
    }

    pub fn timestamp(&self) -> &DateTime<FixedOffset> {
        &self.timestamp
    }

    pub fn level(&self) -> Severity {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn caller(&self) -> Option<&Caller> {
        self.caller.as_ref()
    }
}
