//! Line formatters
//!
//! Both formatters emit `timestamp | Level   | message\n`. In caller mode a
//! right-aligned `file.rs:line` column is inserted before the message.
//!
//! The colored formatter wraps only the level label when caller mode is off,
//! and the whole line when it is on.

use chrono::SecondsFormat;

use crate::event::LogEvent;
use crate::severity::RESET;

/// Width of the caller column
pub const CALLER_WIDTH: usize = 16;

/// Output style of a formatter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Plain text, for files
    Plain,
    /// ANSI colored, for a terminal
    Colored,
}

/// Renders events into lines of text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Formatter {
    style: Style,
    report_caller: bool,
}

impl Formatter {
    pub fn new(style: Style, report_caller: bool) -> Self {
        Self {
            style,
            report_caller,
        }
    }

    pub fn plain(report_caller: bool) -> Self {
        Self::new(Style::Plain, report_caller)
    }

    pub fn colored(report_caller: bool) -> Self {
        Self::new(Style::Colored, report_caller)
    }

    pub fn reports_caller(&self) -> bool {
        self.report_caller
    }

    /// Render an event as a newline-terminated line
    pub fn format(&self, event: &LogEvent) -> String {
        let timestamp = event
            .timestamp()
            .to_rfc3339_opts(SecondsFormat::Secs, true);
        let label = event.level().label();
        let color = event.level().color();

        let mut line = match (self.style, self.report_caller) {
            (Style::Plain, false) => format!("{} | {} | {}", timestamp, label, event.message()),
            (Style::Plain, true) => format!(
                "{} | {} | {:>width$} | {}",
                timestamp,
                label,
                caller_column(event),
                event.message(),
                width = CALLER_WIDTH
            ),
            (Style::Colored, false) => format!(
                "{} | {}{}{} | {}",
                timestamp,
                color,
                label,
                RESET,
                event.message()
            ),
            (Style::Colored, true) => format!(
                "{}{} | {} | {:>width$} | {}{}",
                color,
                timestamp,
                label,
                caller_column(event),
                event.message(),
                RESET,
                width = CALLER_WIDTH
            ),
        };

        line.push('\n');
        line
    }

    /// Render an event as bytes ready for a sink
    pub fn format_bytes(&self, event: &LogEvent) -> Vec<u8> {
        self.format(event).into_bytes()
    }
}

fn caller_column(event: &LogEvent) -> String {
    event.caller().map(|c| c.short()).unwrap_or_default()
}
