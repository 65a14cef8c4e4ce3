//! Physical entry writers
//!
//! [`AppendWriter`] appends one line under an exclusive advisory lock.
//! [`SizeBoundedWriter`] wraps it and keeps the file under a byte ceiling by
//! evicting the oldest lines before the file would grow past it.

use crate::core::{LogError, Result};
use fs2::FileExt;
use std::collections::VecDeque;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Commits one already-formatted entry to disk.
pub trait EntryWriter: Send + Sync {
    /// Write `entry` plus a trailing newline. The target file is expected to
    /// exist; [`FileStorage`](super::FileStorage) guarantees that before
    /// every call.
    fn write_entry(&self, entry: &str) -> Result<()>;

    fn pathname(&self) -> &Path;
}

/// Plain locked append.
///
/// The exclusive lock covers only the single physical write, so concurrent
/// writers within a process or across processes never interleave partial
/// lines. It does not serialize anything beyond that.
#[derive(Debug, Clone)]
pub struct AppendWriter {
    pathname: PathBuf,
}

impl AppendWriter {
    pub fn new(pathname: impl Into<PathBuf>) -> Self {
        Self {
            pathname: pathname.into(),
        }
    }
}

impl EntryWriter for AppendWriter {
    fn write_entry(&self, entry: &str) -> Result<()> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.pathname)
            .map_err(|_| LogError::file_system(&self.pathname, "Unable to open log file"))?;

        file.lock_exclusive()
            .map_err(|_| LogError::file_system(&self.pathname, "Unable to lock log file"))?;

        let mut line = String::with_capacity(entry.len() + 1);
        line.push_str(entry);
        line.push('\n');

        let result = (&file).write_all(line.as_bytes()).and_then(|_| (&file).flush());
        let _ = FileExt::unlock(&file);

        result.map_err(|_| LogError::file_system(&self.pathname, "Unable to write to log file"))
    }

    fn pathname(&self) -> &Path {
        &self.pathname
    }
}

/// Keeps a single file under `max_file_size` bytes by dropping oldest lines.
///
/// When an entry still fits, this is a plain delegated append. Otherwise the
/// whole file is read, lines are evicted oldest-first until the new entry
/// fits, and the retained tail plus the new entry is rewritten in one locked
/// write. The file therefore ends up either fully rewritten or untouched.
///
/// The read-evict decision runs outside any lock; two writers racing near
/// the ceiling can both choose to rewrite. Only the final write is locked.
pub struct SizeBoundedWriter {
    inner: AppendWriter,
    max_file_size: u64,
}

impl SizeBoundedWriter {
    pub fn new(inner: AppendWriter, max_file_size: u64) -> Self {
        Self {
            inner,
            max_file_size,
        }
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    fn rewrite_evicted(&self, entry: &str) -> Result<()> {
        let pathname = self.inner.pathname();
        let entry_size = entry.len() as u64 + 1;

        let content = fs::read_to_string(pathname).map_err(|_| {
            LogError::file_system(pathname, "Unable to read log file for rotation")
        })?;
        let mut lines: VecDeque<&str> = content.lines().filter(|line| !line.is_empty()).collect();
        let mut file_size: u64 = lines.iter().map(|line| line.len() as u64 + 1).sum();

        // Evict oldest first; an entry larger than the whole ceiling is
        // still written once nothing is left to evict.
        while file_size + entry_size > self.max_file_size {
            match lines.pop_front() {
                Some(removed) => file_size -= removed.len() as u64 + 1,
                None => break,
            }
        }

        let mut output = String::with_capacity((file_size + entry_size) as usize);
        for line in &lines {
            output.push_str(line);
            output.push('\n');
        }
        output.push_str(entry);
        output.push('\n');

        let file = OpenOptions::new()
            .write(true)
            .open(pathname)
            .map_err(|_| LogError::file_system(pathname, "Unable to open log file"))?;
        file.lock_exclusive()
            .map_err(|_| LogError::file_system(pathname, "Unable to lock log file"))?;

        let result = file
            .set_len(0)
            .and_then(|_| (&file).write_all(output.as_bytes()))
            .and_then(|_| (&file).flush());
        let _ = FileExt::unlock(&file);

        result.map_err(|_| LogError::file_system(pathname, "Unable to write to log file"))
    }
}

impl EntryWriter for SizeBoundedWriter {
    fn write_entry(&self, entry: &str) -> Result<()> {
        let entry_size = entry.len() as u64 + 1;
        let file_size = fs::metadata(self.inner.pathname())
            .map(|meta| meta.len())
            .map_err(|_| {
                LogError::file_system(self.inner.pathname(), "Unable to get log file size")
            })?;

        if file_size + entry_size <= self.max_file_size {
            return self.inner.write_entry(entry);
        }
        self.rewrite_evicted(entry)
    }

    fn pathname(&self) -> &Path {
        self.inner.pathname()
    }
}
