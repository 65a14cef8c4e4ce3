//! Size-rotated single-file storage

use super::writer::{AppendWriter, SizeBoundedWriter};
use super::{FileStorage, Storage};
use crate::core::{LogLevel, Result};
use crate::format::LogFormatter;
use crate::fs::PathResolver;
use serde_json::Value;
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024; // 5 MiB

/// Storage that keeps a single file under a byte ceiling by dropping the
/// oldest entries when a new one would push it over.
///
/// The ceiling bounds the steady-state size, not any individual write: a
/// single entry larger than the ceiling is still written on its own.
pub struct RotatingFileStorage {
    inner: FileStorage,
}

impl RotatingFileStorage {
    pub fn new(pathname: impl Into<PathBuf>, formatter: Box<dyn LogFormatter>) -> Result<Self> {
        Self::with_max_size(pathname, formatter, DEFAULT_MAX_FILE_SIZE)
    }

    pub fn with_max_size(
        pathname: impl Into<PathBuf>,
        formatter: Box<dyn LogFormatter>,
        max_file_size: u64,
    ) -> Result<Self> {
        let pathname = pathname.into();
        let writer = Box::new(SizeBoundedWriter::new(
            AppendWriter::new(&pathname),
            max_file_size,
        ));
        Ok(Self {
            inner: FileStorage::with_writer(
                pathname,
                formatter,
                writer,
                &PathResolver::from_env(),
            )?,
        })
    }

    pub fn pathname(&self) -> &Path {
        self.inner.pathname()
    }
}

impl Storage for RotatingFileStorage {
    fn store(&self, level: LogLevel, message: &str, context: Option<&Value>) -> Result<()> {
        self.inner.store(level, message, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{JsonContextSerializer, LineFormatter};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_rotation_keeps_file_under_ceiling() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rotating.log");

        let storage = RotatingFileStorage::with_max_size(
            &path,
            Box::new(LineFormatter::new(Box::new(JsonContextSerializer))),
            512,
        )
        .unwrap();

        for i in 0..50 {
            storage
                .store(LogLevel::Info, &format!("message number {}", i), None)
                .unwrap();
        }

        assert!(fs::metadata(&path).unwrap().len() <= 512);

        // Oldest entries were evicted, the newest survived
        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("message number 0\n"));
        assert!(content.contains("message number 49"));
    }
}
