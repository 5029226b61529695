//! Severity levels and level sets
//!
//! Levels are ordered from least to most severe. Each level carries an ANSI
//! color used by the colored formatter and a fixed-width label used by both
//! formatters.

use std::fmt;
use std::str::FromStr;

/// Resets all ANSI attributes
pub const RESET: &str = "\x1b[0m";

/// Width the level label is padded to
pub const LABEL_WIDTH: usize = 7;

/// Log severity, ordered `Trace < Debug < Info < Warn < Error < Fatal < Panic`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    Panic,
}

impl Severity {
    /// All levels, least severe first
    pub const ALL: [Severity; 7] = [
        Severity::Trace,
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Fatal,
        Severity::Panic,
    ];

    /// Lowercase short name
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "trace",
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
            Severity::Panic => "panic",
        }
    }

    /// ANSI color prefix for this level
    pub fn color(&self) -> &'static str {
        match self {
            Severity::Trace => "\x1b[90m", // grey
            Severity::Debug => "\x1b[34m", // blue
            Severity::Info => "\x1b[97m",  // white
            Severity::Warn => "\x1b[33m",  // yellow
            Severity::Error => "\x1b[31m", // red
            Severity::Fatal => "\x1b[35m", // magenta
            Severity::Panic => "\x1b[35m", // magenta
        }
    }

    /// Short name left-justified to [`LABEL_WIDTH`] with only the first
    /// character uppercased, e.g. `"Warn   "`.
    pub fn label(&self) -> String {
        let padded = format!("{:<width$}", self.as_str(), width = LABEL_WIDTH);
        let mut chars = padded.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => padded,
        }
    }

    fn bit(&self) -> u8 {
        1 << (*self as u8)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown level name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level: {0}")]
pub struct ParseSeverityError(pub String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Severity::Trace),
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            "fatal" => Ok(Severity::Fatal),
            "panic" => Ok(Severity::Panic),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

impl From<tracing::Level> for Severity {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE => Severity::Trace,
            tracing::Level::DEBUG => Severity::Debug,
            tracing::Level::INFO => Severity::Info,
            tracing::Level::WARN => Severity::Warn,
            tracing::Level::ERROR => Severity::Error,
        }
    }
}

/// Explicit set of levels a sink accepts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LevelSet(u8);

impl LevelSet {
    /// Set with no levels
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Set with every level
    pub fn all() -> Self {
        Severity::ALL.into_iter().collect()
    }

    /// Add a level; adding one twice has no effect
    pub fn insert(&mut self, level: Severity) {
        self.0 |= level.bit();
    }

    /// Add several levels
    pub fn extend_with(&mut self, levels: &[Severity]) {
        for level in levels {
            self.insert(*level);
        }
    }

    pub fn contains(&self, level: Severity) -> bool {
        self.0 & level.bit() != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Levels in the set, least severe first
    pub fn iter(&self) -> impl Iterator<Item = Severity> {
        let set = *self;
        Severity::ALL.into_iter().filter(move |l| set.contains(*l))
    }
}

impl FromIterator<Severity> for LevelSet {
    fn from_iter<I: IntoIterator<Item = Severity>>(iter: I) -> Self {
        let mut set = LevelSet::empty();
        for level in iter {
            set.insert(level);
        }
        set
    }
}

impl From<&[Severity]> for LevelSet {
    fn from(levels: &[Severity]) -> Self {
        levels.iter().copied().collect()
    }
}
