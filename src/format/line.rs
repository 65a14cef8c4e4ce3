//! Plain line formatter

use super::{escape_newlines, ContextSerializer, LogFormatter};
use crate::core::LogLevel;
use chrono::{Local, SecondsFormat};
use serde_json::{Map, Value};

/// The default human-readable line format:
/// `[2025-08-05T14:03:11+02:00] ERROR: message [serialized context]`.
///
/// A static context map can be attached; per-entry context keys override
/// static ones. Context that fails to serialize is dropped from the line
/// rather than failing the write.
pub struct LineFormatter {
    serializer: Box<dyn ContextSerializer>,
    static_context: Map<String, Value>,
}

impl LineFormatter {
    pub fn new(serializer: Box<dyn ContextSerializer>) -> Self {
        Self {
            serializer,
            static_context: Map::new(),
        }
    }

    /// Attach fields included in every formatted entry.
    #[must_use]
    pub fn with_static_context(mut self, context: Map<String, Value>) -> Self {
        self.static_context = context;
        self
    }

    /// Normalize an arbitrary context value into a field map.
    ///
    /// Objects pass through; a bare scalar or array lands under a `value`
    /// key; null and empty strings mean no context.
    fn transform_context(context: Option<&Value>) -> Map<String, Value> {
        match context {
            None | Some(Value::Null) => Map::new(),
            Some(Value::String(s)) if s.is_empty() => Map::new(),
            Some(Value::Object(map)) => map.clone(),
            Some(other) => {
                let mut map = Map::new();
                map.insert("value".to_string(), other.clone());
                map
            }
        }
    }
}

impl LogFormatter for LineFormatter {
    fn format(&self, level: LogLevel, message: &str, context: Option<&Value>) -> String {
        let mut merged = self.static_context.clone();
        merged.extend(Self::transform_context(context));

        let mut line = format!(
            "[{}] {}: {}",
            Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
            level,
            escape_newlines(message)
        );

        if !merged.is_empty() {
            if let Ok(fragment) = self.serializer.serialize(&Value::Object(merged)) {
                if !fragment.is_empty() {
                    line.push(' ');
                    line.push_str(&fragment);
                }
            }
        }
        line
    }
}
