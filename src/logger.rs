//! Host-facing daily logger

use crate::archive::LogArchiver;
use crate::core::{LogLevel, Result};
use crate::format::{JsonContextSerializer, LineFormatter, LogFormatter};
use crate::fs::PathResolver;
use crate::storage::{DailyLogStorage, Storage};
use serde_json::Value;
use std::error::Error;
use std::path::{Path, PathBuf};

/// Reserved context key naming the logical channel of an entry; the syslog
/// formatter lifts it into the MSGID field.
pub const CHANNEL: &str = "channel";

/// Convenience logger writing dated daily files under one directory.
///
/// Wraps a [`DailyLogStorage`] with the default line formatter and JSON
/// context serialization. Construction fails fast when the directory cannot
/// be created or written; per-call failures surface to the caller, which
/// decides whether a logging problem is worth failing over.
pub struct Logger {
    storage: DailyLogStorage,
    directory: PathBuf,
    file_name: String,
}

impl Logger {
    /// Logger writing `{path}/{file_name}-YYYY-MM-DD.log` lines.
    pub fn new(path: impl AsRef<Path>, file_name: &str) -> Result<Self> {
        let formatter = LineFormatter::new(Box::new(JsonContextSerializer));
        Self::with_formatter(path, file_name, Box::new(formatter))
    }

    /// Logger with a custom entry formatter.
    pub fn with_formatter(
        path: impl AsRef<Path>,
        file_name: &str,
        formatter: Box<dyn LogFormatter>,
    ) -> Result<Self> {
        let directory = path.as_ref().to_path_buf();
        let storage = DailyLogStorage::new(&directory, file_name, formatter)?;
        Ok(Self {
            storage,
            directory,
            file_name: file_name.to_string(),
        })
    }

    /// The dated file this logger currently writes to.
    pub fn pathname(&self) -> &Path {
        self.storage.pathname()
    }

    /// Log a message with an arbitrary level.
    pub fn log(&self, level: LogLevel, message: &str, context: Option<&Value>) -> Result<()> {
        self.storage.store(level, message, context)
    }

    pub fn debug(&self, message: &str, context: Option<&Value>) -> Result<()> {
        self.log(LogLevel::Debug, message, context)
    }

    pub fn info(&self, message: &str, context: Option<&Value>) -> Result<()> {
        self.log(LogLevel::Info, message, context)
    }

    pub fn notice(&self, message: &str, context: Option<&Value>) -> Result<()> {
        self.log(LogLevel::Notice, message, context)
    }

    pub fn warning(&self, message: &str, context: Option<&Value>) -> Result<()> {
        self.log(LogLevel::Warning, message, context)
    }

    pub fn error(&self, message: &str, context: Option<&Value>) -> Result<()> {
        self.log(LogLevel::Error, message, context)
    }

    pub fn critical(&self, message: &str, context: Option<&Value>) -> Result<()> {
        self.log(LogLevel::Critical, message, context)
    }

    pub fn alert(&self, message: &str, context: Option<&Value>) -> Result<()> {
        self.log(LogLevel::Alert, message, context)
    }

    pub fn emergency(&self, message: &str, context: Option<&Value>) -> Result<()> {
        self.log(LogLevel::Emergency, message, context)
    }

    /// Log an error as ERROR and its source chain as DEBUG entries.
    pub fn exception(&self, error: &dyn Error) -> Result<()> {
        self.error(&format!("Thrown exception: {}", error), None)?;

        let mut source = error.source();
        while let Some(cause) = source {
            self.debug(&format!("Caused by: {}", cause), None)?;
            source = cause.source();
        }
        Ok(())
    }

    /// Archive this logger's aged daily files with default retention.
    ///
    /// Typically called once at host startup, before the first log of the
    /// day, wrapped defensively so archival problems never take the host
    /// down with them.
    pub fn archive_old(&self) -> Result<Option<Vec<String>>> {
        LogArchiver::new(PathResolver::from_env()).archive_old(
            &self.directory,
            &self.file_name,
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_logger_writes_daily_file() {
        let dir = tempdir().unwrap();
        let logger = Logger::new(dir.path(), "app").unwrap();

        logger.info("service started", None).unwrap();
        logger
            .warning("high memory", Some(&json!({"used_mb": 912})))
            .unwrap();

        let content = fs::read_to_string(logger.pathname()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("INFO: service started"));
        assert!(lines[1].contains("WARNING: high memory"));
        assert!(lines[1].contains(r#"{"used_mb":912}"#));
    }

    #[test]
    fn test_exception_logs_error_and_chain() {
        use std::fmt;

        #[derive(Debug)]
        struct Inner;
        impl fmt::Display for Inner {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "connection refused")
            }
        }
        impl Error for Inner {}

        #[derive(Debug)]
        struct Outer(Inner);
        impl fmt::Display for Outer {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "request failed")
            }
        }
        impl Error for Outer {
            fn source(&self) -> Option<&(dyn Error + 'static)> {
                Some(&self.0)
            }
        }

        let dir = tempdir().unwrap();
        let logger = Logger::new(dir.path(), "app").unwrap();
        logger.exception(&Outer(Inner)).unwrap();

        let content = fs::read_to_string(logger.pathname()).unwrap();
        assert!(content.contains("ERROR: Thrown exception: request failed"));
        assert!(content.contains("DEBUG: Caused by: connection refused"));
    }

    #[test]
    fn test_archive_old_with_no_files_is_a_noop() {
        let dir = tempdir().unwrap();
        let logger = Logger::new(dir.path(), "app").unwrap();
        // No dated files written yet: nothing to do
        assert_eq!(logger.archive_old().unwrap(), None);
    }
}
