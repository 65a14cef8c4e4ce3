//! Daily-file storage

use super::{FileStorage, Storage};
use crate::core::{LogLevel, Result};
use crate::format::LogFormatter;
use chrono::Local;
use serde_json::Value;
use std::path::Path;

/// Storage writing to `{directory}/{name}-YYYY-MM-DD.log`.
///
/// The dated filename is computed once at construction. A long-lived
/// instance keeps writing to the same file even past midnight; hosts that
/// need rollover during a long-running process reconstruct the storage per
/// calendar day.
pub struct DailyLogStorage {
    inner: FileStorage,
}

impl DailyLogStorage {
    pub fn new(
        directory: impl AsRef<Path>,
        log_name: &str,
        formatter: Box<dyn LogFormatter>,
    ) -> Result<Self> {
        let filename = format!("{}-{}.log", log_name, Local::now().format("%Y-%m-%d"));
        let pathname = directory.as_ref().join(filename);
        Ok(Self {
            inner: FileStorage::new(pathname, formatter)?,
        })
    }

    /// The resolved dated pathname this instance writes to.
    pub fn pathname(&self) -> &Path {
        self.inner.pathname()
    }
}

impl Storage for DailyLogStorage {
    fn store(&self, level: LogLevel, message: &str, context: Option<&Value>) -> Result<()> {
        self.inner.store(level, message, context)
    }
}
