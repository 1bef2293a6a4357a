use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Severity categories shared by the log panel and the status banner.
/// `Loading` only ever appears on the banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
    Warning,
    Data,
    Loading,
}

impl Severity {
    pub fn icon(self) -> &'static str {
        match self {
            Severity::Info => "ℹ️",
            Severity::Success => "✅",
            Severity::Error => "❌",
            Severity::Warning => "⚠️",
            Severity::Data => "📊",
            Severity::Loading => "📝",
        }
    }
}

/// Log entry for the operator panel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub severity: Severity,
    pub message: String,
}

/// Sink for the accumulating, newest-first log panel.
pub trait LogSink: Send + Sync {
    fn add(&self, message: &str, severity: Severity);
    fn clear(&self);
    fn entries(&self) -> Vec<LogEntry>;
}

/// Single-slot status banner; last write wins.
pub trait StatusSink: Send + Sync {
    fn show(&self, message: &str, severity: Severity);
}

/// Initialize the tracing pipeline
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_level(true))
        .with(filter)
        .init();

    info!("Logging system initialized");
}

/// Default log sink: keeps entries in memory (newest first) and mirrors each
/// one onto the tracing pipeline.
#[derive(Default)]
pub struct ConsoleLog {
    buffer: Mutex<Vec<LogEntry>>,
}

impl ConsoleLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LogSink for ConsoleLog {
    fn add(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Error => error!("{}", message),
            Severity::Warning => warn!("{}", message),
            Severity::Data => debug!("{}", message),
            _ => info!("{}", message),
        }

        let entry = LogEntry {
            timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
            severity,
            message: message.to_string(),
        };
        // Newest first, no cap.
        self.buffer.lock().unwrap().insert(0, entry);
    }

    fn clear(&self) {
        self.buffer.lock().unwrap().clear();
        self.add("Log limpo", Severity::Info);
    }

    fn entries(&self) -> Vec<LogEntry> {
        self.buffer.lock().unwrap().clone()
    }
}

/// Default status sink: prints the banner line to the terminal.
#[derive(Default)]
pub struct ConsoleStatus {
    current: Mutex<Option<(String, Severity)>>,
}

impl ConsoleStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<(String, Severity)> {
        self.current.lock().unwrap().clone()
    }
}

impl StatusSink for ConsoleStatus {
    fn show(&self, message: &str, severity: Severity) {
        println!("{}", message);
        *self.current.lock().unwrap() = Some((message.to_string(), severity));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_are_newest_first() {
        let log = ConsoleLog::new();
        log.add("primeiro", Severity::Info);
        log.add("segundo", Severity::Success);
        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "segundo");
        assert_eq!(entries[1].message, "primeiro");
    }

    #[test]
    fn clear_leaves_exactly_one_cleared_entry() {
        let log = ConsoleLog::new();
        log.add("a", Severity::Info);
        log.add("b", Severity::Error);
        log.clear();
        let entries = log.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].message, "Log limpo");
        assert_eq!(entries[0].severity, Severity::Info);
    }

    #[test]
    fn severity_icons() {
        assert_eq!(Severity::Info.icon(), "ℹ️");
        assert_eq!(Severity::Success.icon(), "✅");
        assert_eq!(Severity::Error.icon(), "❌");
        assert_eq!(Severity::Warning.icon(), "⚠️");
        assert_eq!(Severity::Data.icon(), "📊");
        assert_eq!(Severity::Loading.icon(), "📝");
    }

    #[test]
    fn status_last_write_wins() {
        let status = ConsoleStatus::new();
        status.show("um", Severity::Info);
        status.show("dois", Severity::Error);
        let (msg, sev) = status.current().unwrap();
        assert_eq!(msg, "dois");
        assert_eq!(sev, Severity::Error);
    }
}
