//! Log line formatters and context serializers
//!
//! A [`LogFormatter`] turns one `(level, message, context)` call into exactly
//! one line of text; the storage layer is agnostic to the output shape. Some
//! formatters embed the context through a [`ContextSerializer`].

pub mod context;
pub mod json;
pub mod line;
pub mod syslog;

pub use context::{ContextSerializer, JsonContextSerializer, SyslogStructuredDataSerializer};
pub use json::JsonFormatter;
pub use line::LineFormatter;
pub use syslog::SyslogFormatter;

use crate::core::LogLevel;
use serde_json::Value;

/// Formats one log call into a single line of output text.
///
/// Implementations must never emit an embedded newline; the size-bounded
/// writer counts lines when it rotates.
pub trait LogFormatter: Send + Sync {
    fn format(&self, level: LogLevel, message: &str, context: Option<&Value>) -> String;
}

/// Escape line breaks so a message can never span multiple log lines.
pub(crate) fn escape_newlines(message: &str) -> String {
    message.replace('\n', "\\n").replace('\r', "\\r")
}
