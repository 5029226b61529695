//! Routing `tracing` events through a [`Logger`]
//!
//! Libraries that log with `tracing::info!` and friends end up in the same
//! hooks as direct `Logger` calls. Event fields other than `message` are
//! appended to the message as `key=value`.

use std::fmt;
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::error::{LogError, Result};
use crate::event::{Caller, LogEvent};
use crate::logger::Logger;
use crate::severity::Severity;

/// A tracing layer that forwards events to a [`Logger`]
pub struct TracingBridge {
    logger: Arc<Logger>,
}

impl TracingBridge {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }

    /// Convert a tracing event into a log event
    fn convert(event: &Event<'_>) -> LogEvent {
        let metadata = event.metadata();
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        let log_event = LogEvent::new(Severity::from(*metadata.level()), visitor.finish());
        match (metadata.file(), metadata.line()) {
            (Some(file), Some(line)) => log_event.with_caller(Caller::new(file, line)),
            _ => log_event,
        }
    }
}

impl<S> Layer<S> for TracingBridge
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let level = Severity::from(*event.metadata().level());
        if !self.logger.is_enabled(level) {
            return;
        }
        self.logger.log_event(&Self::convert(event));
    }
}

/// Collects the `message` field and flattens the rest into `key=value` pairs
#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
    fields: Vec<String>,
}

impl MessageVisitor {
    fn finish(self) -> String {
        let mut parts = Vec::with_capacity(self.fields.len() + 1);
        parts.extend(self.message);
        parts.extend(self.fields);
        parts.join(" ")
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.push(format!("{}={}", field.name(), value));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        } else {
            self.fields.push(format!("{}={:?}", field.name(), value));
        }
    }
}

/// Filter directive matching the logger's minimum severity
pub fn filter_directive(min_level: Severity) -> &'static str {
    match min_level {
        Severity::Trace => "trace",
        Severity::Debug => "debug",
        Severity::Info => "info",
        Severity::Warn => "warn",
        Severity::Error | Severity::Fatal | Severity::Panic => "error",
    }
}

/// Install a global subscriber that forwards every tracing event to `logger`
///
/// `RUST_LOG` narrows or widens what tracing emits; without it the logger's
/// minimum severity is used.
pub fn init_tracing_bridge(logger: Arc<Logger>) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(logger.min_level())));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(TracingBridge::new(logger))
        .try_init()
        .map_err(|e| LogError::Subscriber(e.to_string()))
}
