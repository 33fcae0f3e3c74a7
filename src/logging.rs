// Logging module - in-memory log capture for TUI display
//
// A custom tracing layer captures log events into a bounded ring buffer
// the TUI renders in its status area. Writing logs to stdout would tear
// through the alternate screen and garble the display, so nothing is
// printed while the TUI runs; file logging (tracing-appender) is layered
// separately in main when enabled.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tracing::{Level, Metadata, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

/// Maximum number of log entries to keep in memory
const MAX_LOG_ENTRIES: usize = 500;

/// A single log entry captured from tracing
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// When the entry was captured - stored for future log-view support
    #[allow(dead_code)]
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub message: String,
}

/// In-memory log buffer with bounded size (ring buffer)
#[derive(Clone, Default)]
pub struct LogBuffer {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, entry: LogEntry) {
        let mut entries = self.entries.lock().unwrap();
        if entries.len() >= MAX_LOG_ENTRIES {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Most recent entry at warn level or above, for the status bar
    pub fn last_warning(&self) -> Option<LogEntry> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|e| e.level <= Level::WARN)
            .cloned()
    }

    /// The `n` most recent entries, oldest first
    #[allow(dead_code)]
    pub fn recent(&self, n: usize) -> Vec<LogEntry> {
        let entries = self.entries.lock().unwrap();
        entries
            .iter()
            .skip(entries.len().saturating_sub(n))
            .cloned()
            .collect()
    }
}

/// Custom tracing layer that captures logs into a `LogBuffer`
pub struct TuiLogLayer {
    buffer: LogBuffer,
}

impl TuiLogLayer {
    pub fn new(buffer: LogBuffer) -> Self {
        Self { buffer }
    }
}

impl<S> Layer<S> for TuiLogLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        let mut message = String::new();
        let mut visitor = MessageVisitor(&mut message);
        event.record(&mut visitor);

        self.buffer.push(LogEntry {
            timestamp: Utc::now(),
            level: *metadata.level(),
            message,
        });
    }

    fn enabled(&self, _metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        // Filtering happens at the subscriber level
        true
    }
}

/// Visitor to extract the message field from a tracing event
struct MessageVisitor<'a>(&'a mut String);

impl tracing::field::Visit for MessageVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.0 = format!("{value:?}");
            // Remove the quotes that Debug adds around plain strings
            if self.0.starts_with('"') && self.0.ends_with('"') {
                *self.0 = self.0[1..self.0.len() - 1].to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(level: Level, message: &str) -> LogEntry {
        LogEntry {
            timestamp: Utc::now(),
            level,
            message: message.to_string(),
        }
    }

    #[test]
    fn buffer_is_bounded() {
        let buffer = LogBuffer::new();
        for i in 0..MAX_LOG_ENTRIES + 10 {
            buffer.push(entry(Level::INFO, &format!("msg {i}")));
        }
        let recent = buffer.recent(MAX_LOG_ENTRIES + 10);
        assert_eq!(recent.len(), MAX_LOG_ENTRIES);
        // Oldest entries were evicted first
        assert_eq!(recent[0].message, "msg 10");
    }

    #[test]
    fn last_warning_skips_info_noise() {
        let buffer = LogBuffer::new();
        buffer.push(entry(Level::WARN, "storage degraded"));
        buffer.push(entry(Level::INFO, "opened problem 42"));

        assert_eq!(buffer.last_warning().unwrap().message, "storage degraded");
    }

    #[test]
    fn last_warning_empty_when_quiet() {
        let buffer = LogBuffer::new();
        buffer.push(entry(Level::INFO, "all fine"));
        assert!(buffer.last_warning().is_none());
    }
}
