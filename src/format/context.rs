//! Context serializers
//!
//! Turn an arbitrary context value into a string fragment embedded by the
//! formatters that want one.

use serde_json::Value;

/// Serializes a context value into a string fragment.
pub trait ContextSerializer: Send + Sync {
    fn serialize(&self, context: &Value) -> serde_json::Result<String>;
}

/// Compact JSON serialization of the whole context value.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonContextSerializer;

impl ContextSerializer for JsonContextSerializer {
    fn serialize(&self, context: &Value) -> serde_json::Result<String> {
        serde_json::to_string(context)
    }
}

/// RFC 5424 structured-data style serialization.
///
/// Objects become `[CONTEXT key="value" …]`, anything else becomes
/// `[DATA value="…"]`; an empty context serializes to an empty string.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyslogStructuredDataSerializer;

impl SyslogStructuredDataSerializer {
    /// Escape `"` and `\` inside a param value.
    fn escape(value: &str) -> String {
        value.replace('\\', "\\\\").replace('"', "\\\"")
    }

    fn param_value(value: &Value) -> serde_json::Result<String> {
        let raw = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => serde_json::to_string(other)?,
        };
        Ok(Self::escape(&raw))
    }

    fn is_empty(context: &Value) -> bool {
        match context {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Object(map) => map.is_empty(),
            _ => false,
        }
    }
}

impl ContextSerializer for SyslogStructuredDataSerializer {
    fn serialize(&self, context: &Value) -> serde_json::Result<String> {
        if Self::is_empty(context) {
            return Ok(String::new());
        }

        let pairs: Vec<(String, &Value)> = match context {
            Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
            scalar => {
                return Ok(format!("[DATA value=\"{}\"]", Self::param_value(scalar)?));
            }
        };

        let mut formatted = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            formatted.push(format!("{}=\"{}\"", key, Self::param_value(value)?));
        }
        Ok(format!("[CONTEXT {}]", formatted.join(" ")))
    }
}
