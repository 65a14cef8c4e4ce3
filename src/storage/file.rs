//! Single-file log storage

use super::writer::{AppendWriter, EntryWriter};
use super::Storage;
use crate::core::{LogError, LogLevel, Result};
use crate::format::LogFormatter;
use crate::fs::PathResolver;
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// Stores formatted entries in a single file, creating the file and its
/// directory on demand.
///
/// Construction fails fast when the target directory cannot be created or is
/// not writable. Every [`store`](Storage::store) re-checks that the file
/// exists and is writable before committing exactly one line through the
/// configured writer; nothing is buffered across calls.
pub struct FileStorage {
    pathname: PathBuf,
    formatter: Box<dyn LogFormatter>,
    writer: Box<dyn EntryWriter>,
}

impl FileStorage {
    /// Plain appending storage with an environment-captured path boundary.
    pub fn new(pathname: impl Into<PathBuf>, formatter: Box<dyn LogFormatter>) -> Result<Self> {
        let pathname = pathname.into();
        let writer = Box::new(AppendWriter::new(&pathname));
        Self::with_writer(pathname, formatter, writer, &PathResolver::from_env())
    }

    /// Storage with an explicit writer and path resolver.
    pub fn with_writer(
        pathname: PathBuf,
        formatter: Box<dyn LogFormatter>,
        writer: Box<dyn EntryWriter>,
        resolver: &PathResolver,
    ) -> Result<Self> {
        if let Some(dir) = pathname.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            if !dir.is_dir() {
                resolver.create_dir_tree(dir)?;
            }
            let writable = fs::metadata(dir)
                .map(|meta| !meta.permissions().readonly())
                .unwrap_or(false);
            if !writable {
                return Err(LogError::file_system(dir, "Directory is not writable"));
            }
        }

        Ok(Self {
            pathname,
            formatter,
            writer,
        })
    }

    pub fn pathname(&self) -> &Path {
        &self.pathname
    }

    fn ensure_file(&self) -> Result<()> {
        if !self.pathname.exists() {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.pathname)
                .map_err(|_| {
                    LogError::file_system(&self.pathname, "Unable to create log file")
                })?;
        }

        let writable = fs::metadata(&self.pathname)
            .map(|meta| !meta.permissions().readonly())
            .unwrap_or(false);
        if !writable {
            return Err(LogError::file_system(&self.pathname, "Log file is not writable"));
        }
        Ok(())
    }
}

impl Storage for FileStorage {
    fn store(&self, level: LogLevel, message: &str, context: Option<&Value>) -> Result<()> {
        self.ensure_file()?;
        let entry = self.formatter.format(level, message, context);
        self.writer.write_entry(&entry)
    }
}
