//! Structured logging capability for the core.
//!
//! The core never owns a global logger. Callers inject an implementation
//! of [`LinkLogger`]; the default [`NoopLogger`] discards everything,
//! and the CLI uses [`StderrLogger`].

use std::collections::BTreeMap;

/// Severity of a log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Internal counters and decisions.
    Debug,
    /// Notable but expected events.
    Info,
    /// Suspicious but recoverable events.
    Warn,
    /// Failures surfaced to the caller.
    Error,
}

impl std::fmt::Display for LogLevel {
    /// Render as a lowercase level name.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Error => write!(f, "error"),
        };
    }
}

/// Ordered key/value context attached to a log event.
pub type LogContext = BTreeMap<String, String>;

/// A structured logger accepting a level, a context map, and a message.
pub trait LinkLogger {
    /// Record one event. Implementations must not panic.
    fn log(&self, level: LogLevel, context: &LogContext, message: &str);
}

/// Discards every event. The default collaborator.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl LinkLogger for NoopLogger {
    /// Drop the event.
    fn log(&self, _level: LogLevel, _context: &LogContext, _message: &str) {}
}

/// Writes events to stderr as `level message key=value ...` lines,
/// filtered by a minimum level.
#[derive(Debug, Clone, Copy)]
pub struct StderrLogger {
    /// Events below this level are dropped.
    pub min_level: LogLevel,
}

impl StderrLogger {
    /// A logger that emits everything at or above the given level.
    pub fn with_min_level(min_level: LogLevel) -> Self {
        return Self { min_level };
    }
}

impl LinkLogger for StderrLogger {
    /// Print one event to stderr if it clears the level filter.
    fn log(&self, level: LogLevel, context: &LogContext, message: &str) {
        if level < self.min_level {
            return;
        }
        let fields = context
            .iter()
            .map(|(k, v)| return format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(" ");
        if fields.is_empty() {
            eprintln!("{level} {message}");
        } else {
            eprintln!("{level} {message} {fields}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_ordered() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Warn < LogLevel::Error);
    }

    #[test]
    fn noop_logger_accepts_any_event() {
        let logger = NoopLogger;
        logger.log(LogLevel::Error, &LogContext::new(), "dropped");
    }
}
