//! # Structured Logger
//!
//! JSON-lines logger for store events.
//!
//! One log line is one event: `event` key first, then `severity`, then
//! caller fields in alphabetical order, so output is deterministic and
//! greppable. A `Logger` is an explicitly constructed value handed to
//! each component at construction; the process entry point owns its
//! lifecycle and there is no global logger state. Errors go to stderr,
//! everything else to stdout, and tests use a capturing sink.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Debug-level detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
enum Sink {
    Console,
    Memory(Arc<Mutex<Vec<String>>>),
}

/// A structured logger handed to components at construction
#[derive(Debug, Clone)]
pub struct Logger {
    min_severity: Severity,
    sink: Sink,
}

impl Logger {
    /// Logger writing to the process streams, dropping events below
    /// `min_severity`
    pub fn new(min_severity: Severity) -> Self {
        Self {
            min_severity,
            sink: Sink::Console,
        }
    }

    /// Logger capturing every line in memory, for tests
    pub fn memory() -> Self {
        Self {
            min_severity: Severity::Trace,
            sink: Sink::Memory(Arc::new(Mutex::new(Vec::new()))),
        }
    }

    /// Lines captured so far; empty for console loggers
    pub fn captured(&self) -> Vec<String> {
        match &self.sink {
            Sink::Memory(lines) => lines.lock().map(|l| l.clone()).unwrap_or_default(),
            Sink::Console => Vec::new(),
        }
    }

    /// Log an event with the given severity and fields
    pub fn log(&self, severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if severity < self.min_severity {
            return;
        }
        let line = format_line(severity, event, fields);
        match &self.sink {
            Sink::Memory(lines) => {
                if let Ok(mut lines) = lines.lock() {
                    lines.push(line);
                }
            }
            Sink::Console => {
                if severity >= Severity::Error {
                    let _ = writeln!(io::stderr(), "{}", line);
                } else {
                    let _ = writeln!(io::stdout(), "{}", line);
                }
            }
        }
    }

    /// Log at TRACE level
    pub fn trace(&self, event: &str, fields: &[(&str, &str)]) {
        self.log(Severity::Trace, event, fields);
    }

    /// Log at INFO level
    pub fn info(&self, event: &str, fields: &[(&str, &str)]) {
        self.log(Severity::Info, event, fields);
    }

    /// Log at WARN level
    pub fn warn(&self, event: &str, fields: &[(&str, &str)]) {
        self.log(Severity::Warn, event, fields);
    }

    /// Log at ERROR level
    pub fn error(&self, event: &str, fields: &[(&str, &str)]) {
        self.log(Severity::Error, event, fields);
    }
}

/// Build one JSON line with deterministic key ordering
fn format_line(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut output = String::with_capacity(256);

    output.push('{');
    output.push_str("\"event\":\"");
    escape_json_string(&mut output, event);
    output.push('"');

    output.push_str(",\"severity\":\"");
    output.push_str(severity.as_str());
    output.push('"');

    let mut sorted_fields: Vec<_> = fields.iter().collect();
    sorted_fields.sort_by_key(|(k, _)| *k);

    for (key, value) in sorted_fields {
        output.push_str(",\"");
        escape_json_string(&mut output, key);
        output.push_str("\":\"");
        escape_json_string(&mut output, value);
        output.push('"');
    }

    output.push('}');
    output
}

/// Escape special characters for JSON strings
fn escape_json_string(output: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            c if c.is_control() => {
                output.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => output.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Trace < Severity::Info);
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
    }

    #[test]
    fn test_log_line_is_valid_json() {
        let logger = Logger::memory();
        logger.info("RECORD_CREATED", &[("id", "12"), ("scope", "prod")]);

        let lines = logger.captured();
        assert_eq!(lines.len(), 1);

        let parsed: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(parsed["event"], "RECORD_CREATED");
        assert_eq!(parsed["severity"], "INFO");
        assert_eq!(parsed["id"], "12");
        assert_eq!(parsed["scope"], "prod");
    }

    #[test]
    fn test_fields_are_sorted_deterministically() {
        let a = format_line(Severity::Info, "E", &[("zebra", "1"), ("apple", "2")]);
        let b = format_line(Severity::Info, "E", &[("apple", "2"), ("zebra", "1")]);
        assert_eq!(a, b);
        assert!(a.find("apple").unwrap() < a.find("zebra").unwrap());
    }

    #[test]
    fn test_event_key_comes_first() {
        let line = format_line(Severity::Warn, "MY_EVENT", &[("aaa", "1")]);
        assert!(line.find("\"event\"").unwrap() < line.find("\"severity\"").unwrap());
        assert!(line.find("\"severity\"").unwrap() < line.find("\"aaa\"").unwrap());
    }

    #[test]
    fn test_escapes_special_chars() {
        let logger = Logger::memory();
        logger.info("E", &[("message", "line1\nline2 \"quoted\"")]);

        let lines = logger.captured();
        let parsed: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(parsed["message"], "line1\nline2 \"quoted\"");
    }

    #[test]
    fn test_min_severity_filters() {
        let logger = Logger {
            min_severity: Severity::Warn,
            sink: Sink::Memory(Arc::new(Mutex::new(Vec::new()))),
        };

        logger.info("DROPPED", &[]);
        logger.warn("KEPT", &[]);
        logger.error("ALSO_KEPT", &[]);

        let lines = logger.captured();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("KEPT"));
    }

    #[test]
    fn test_console_logger_captures_nothing() {
        let logger = Logger::new(Severity::Info);
        assert!(logger.captured().is_empty());
    }
}
