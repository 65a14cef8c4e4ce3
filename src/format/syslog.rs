//! RFC 5424 syslog-style formatter

use super::{escape_newlines, ContextSerializer, LogFormatter};
use crate::core::LogLevel;
use crate::logger::CHANNEL;
use chrono::{Local, SecondsFormat};
use serde_json::Value;

const FACILITY: u8 = 1; // user-level messages
const SYSLOG_VERSION: u8 = 1;
const NILVALUE: &str = "-";

/// Formats entries in the RFC 5424 shape:
/// `<pri>1 timestamp hostname app-name procid msgid structured-data tag: message`.
///
/// The reserved [`CHANNEL`] context key becomes the MSGID and is removed from
/// the structured data. Context that fails to serialize degrades to the nil
/// value instead of failing the write.
pub struct SyslogFormatter {
    serializer: Box<dyn ContextSerializer>,
    hostname: Option<String>,
    app_name: Option<String>,
    proc_id: Option<u32>,
}

impl SyslogFormatter {
    pub fn new(serializer: Box<dyn ContextSerializer>) -> Self {
        Self {
            serializer,
            hostname: None,
            app_name: None,
            proc_id: None,
        }
    }

    #[must_use]
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    #[must_use]
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    #[must_use]
    pub fn with_proc_id(mut self, proc_id: u32) -> Self {
        self.proc_id = Some(proc_id);
        self
    }

    fn pri_value(level: LogLevel) -> u8 {
        FACILITY * 8 + level.severity()
    }

    /// Pull a non-empty string MSGID out of the context's `channel` key,
    /// returning the remaining context.
    fn split_msgid(context: Option<&Value>) -> (String, Option<Value>) {
        let Some(Value::Object(map)) = context else {
            return (NILVALUE.to_string(), context.cloned());
        };

        match map.get(CHANNEL) {
            Some(Value::String(channel)) if !channel.is_empty() => {
                let mut rest = map.clone();
                rest.remove(CHANNEL);
                let msgid = channel.clone();
                let rest = if rest.is_empty() {
                    None
                } else {
                    Some(Value::Object(rest))
                };
                (msgid, rest)
            }
            Some(_) => {
                // Present but not a usable string: drop it from the data
                let mut rest = map.clone();
                rest.remove(CHANNEL);
                (NILVALUE.to_string(), Some(Value::Object(rest)))
            }
            None => (NILVALUE.to_string(), context.cloned()),
        }
    }
}

impl LogFormatter for SyslogFormatter {
    fn format(&self, level: LogLevel, message: &str, context: Option<&Value>) -> String {
        let (msgid, context) = Self::split_msgid(context);

        let structured_data = match &context {
            None | Some(Value::Null) => NILVALUE.to_string(),
            Some(value) => match self.serializer.serialize(value) {
                Ok(fragment) if !fragment.is_empty() => fragment,
                // Serialization failures never fail the log call
                _ => NILVALUE.to_string(),
            },
        };

        format!(
            "<{}>{} {} {} {} {} {} {} {}: {}",
            Self::pri_value(level),
            SYSLOG_VERSION,
            Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
            self.hostname.as_deref().unwrap_or(NILVALUE),
            self.app_name.as_deref().unwrap_or(NILVALUE),
            self.proc_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| NILVALUE.to_string()),
            msgid,
            structured_data,
            level.syslog_tag(),
            escape_newlines(message)
        )
    }
}
