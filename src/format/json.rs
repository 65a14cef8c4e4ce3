//! JSON line formatter

use super::LogFormatter;
use crate::core::LogLevel;
use chrono::{Local, SecondsFormat};
use serde_json::{Map, Value};

/// Formats each entry as a single-line JSON object (JSONL), compatible with
/// log aggregation tools.
///
/// Static context fields come first; `timestamp`, `severity`, `message` and
/// the per-entry `context` are set on top of them for every entry.
#[derive(Default)]
pub struct JsonFormatter {
    static_context: Map<String, Value>,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach fields included in every entry. The `timestamp`, `severity`,
    /// `message` and `context` keys are overwritten per entry.
    #[must_use]
    pub fn with_static_context(mut self, context: Map<String, Value>) -> Self {
        self.static_context = context;
        self
    }
}

impl LogFormatter for JsonFormatter {
    fn format(&self, level: LogLevel, message: &str, context: Option<&Value>) -> String {
        let mut data = self.static_context.clone();
        data.insert(
            "timestamp".to_string(),
            Value::String(Local::now().to_rfc3339_opts(SecondsFormat::Secs, false)),
        );
        data.insert("severity".to_string(), Value::String(level.as_str().to_string()));
        data.insert("message".to_string(), Value::String(message.to_string()));
        match context {
            None | Some(Value::Null) => {}
            Some(value) => {
                data.insert("context".to_string(), value.clone());
            }
        }

        match serde_json::to_string(&Value::Object(data)) {
            Ok(line) => line,
            // Unserializable context degrades to a context-free entry
            Err(_) => format!(
                r#"{{"timestamp":"{}","severity":"{}","message":{}}}"#,
                Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
                level.as_str(),
                Value::String(message.to_string())
            ),
        }
    }
}
