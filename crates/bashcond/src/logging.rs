//! Logging configuration for Bashcond
//!
//! With the `logging` feature the evaluator emits `tracing` events:
//!
//! - **DEBUG**: `=~` patterns that fail to compile
//! - **TRACE**: operator results, failed status lookups, `BASH_REMATCH` export
//!
//! Operands are user data (paths, variable values, patterns) and can contain
//! secrets, so by default only their length is logged.

use std::borrow::Cow;

/// Configuration for logging behavior
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Whether operand values appear in log events (default: false)
    /// WARN: enabling this may log sensitive data
    pub log_operands: bool,

    /// Maximum length of logged values before truncation (default: 200)
    pub max_value_length: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_operands: false,
            max_value_length: 200,
        }
    }
}

impl LogConfig {
    /// Create a new log configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Include operand values in logs (UNSAFE)
    ///
    /// # Warning
    ///
    /// Operands may hold secrets taken from variables.
    pub fn unsafe_log_operands(mut self) -> Self {
        self.log_operands = true;
        self
    }

    /// Set maximum length for logged values
    pub fn max_value_length(mut self, len: usize) -> Self {
        self.max_value_length = len;
        self
    }

    /// Render an operand for a log event.
    pub fn operand<'a>(&self, value: &'a str) -> Cow<'a, str> {
        if !self.log_operands {
            return Cow::Owned(format!("[{} bytes]", value.len()));
        }
        let needs_sanitize = value.chars().any(|c| c.is_control());
        let value: Cow<'a, str> = if needs_sanitize {
            Cow::Owned(sanitize_for_log(value))
        } else {
            Cow::Borrowed(value)
        };
        self.truncate(value)
    }

    /// Truncate value if it exceeds max length, on a char boundary.
    fn truncate<'a>(&self, value: Cow<'a, str>) -> Cow<'a, str> {
        if value.len() <= self.max_value_length {
            return value;
        }
        let mut end = self.max_value_length;
        while end > 0 && !value.is_char_boundary(end) {
            end -= 1;
        }
        Cow::Owned(format!(
            "{}...[truncated {} bytes]",
            &value[..end],
            value.len() - end
        ))
    }
}

/// Escape characters that could forge extra log lines.
pub fn sanitize_for_log(input: &str) -> String {
    input
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
        .chars()
        .filter(|c| !c.is_control())
        .collect()
}
