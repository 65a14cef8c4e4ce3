//! Weekly archival of dated log files
//!
//! [`LogArchiver`] scans a directory for `{name}-YYYY-MM-DD.log` files older
//! than the retention cutoff, groups them by year-week, bundles each group
//! into a compressed `{name}-{week}.tar.gz` archive and deletes the originals
//! only after the bundle has been durably written. A file's age comes from
//! the date embedded in its name, never from filesystem timestamps.

use crate::core::{ArchiveErrorKind, LogError, Result};
use crate::fs::PathResolver;
use chrono::{Duration, Local, NaiveDate, NaiveTime};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Default retention: files dated more than two days ago are archived.
pub const DEFAULT_RETENTION_DAYS: i64 = 2;

/// One-shot archiver over a directory of dated log files.
///
/// A single [`archive_old`](LogArchiver::archive_old) call is synchronous
/// and keeps no state between runs beyond the files themselves. It is meant
/// to run from one scheduled caller; no mutual exclusion is provided against
/// concurrent runs over the same directory.
pub struct LogArchiver {
    resolver: PathResolver,
    retention: Duration,
}

impl LogArchiver {
    pub fn new(resolver: PathResolver) -> Self {
        Self {
            resolver,
            retention: Duration::days(DEFAULT_RETENTION_DAYS),
        }
    }

    /// Override how old a file must be before it is archived.
    #[must_use]
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    /// Archive all eligible `{file_name}-*.log` files under `path`.
    ///
    /// Returns `Ok(None)` when no file matched the name pattern at all
    /// (no work existed), otherwise the list of week keys that had at least
    /// one eligible file. `archive_dir` defaults to the log directory; a
    /// relative value resolves beneath it.
    ///
    /// A failure on one week's bundle aborts the run at that point; weeks
    /// already archived and deleted stay archived.
    pub fn archive_old(
        &self,
        path: impl AsRef<Path>,
        file_name: &str,
        archive_dir: Option<&str>,
    ) -> Result<Option<Vec<String>>> {
        let path = path.as_ref();

        let mut files = Self::matching_files(path, file_name);
        if files.is_empty() {
            return Ok(None);
        }
        files.sort();

        // The cutoff is one instant per run; a file qualifies when the
        // midnight of its embedded date lies strictly before it.
        let cutoff = Local::now().naive_local() - self.retention;
        let mut groups: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
        for file in files {
            let Some(date) = Self::embedded_date(&file, file_name) else {
                continue;
            };
            if date.and_time(NaiveTime::MIN) < cutoff {
                let week = date.format("%G-%m-%V").to_string();
                groups.entry(week).or_default().push(file);
            }
        }

        let archive_dir = match archive_dir {
            None => path.to_path_buf(),
            Some(dir) if Path::new(dir).is_absolute() => PathBuf::from(dir),
            Some(dir) => path.join(dir),
        };
        self.resolver.create_dir_tree(&archive_dir)?;

        for (week, group) in &groups {
            let archive_path = archive_dir.join(format!("{}-{}.tar.gz", file_name, week));
            self.extend_archive(&archive_path, path, group)?;

            // Originals go only after the bundle is durably in place;
            // a leftover is picked up again by the next run.
            for file in group {
                let _ = fs::remove_file(file);
            }
        }

        Ok(Some(groups.keys().cloned().collect()))
    }

    /// Files named `{file_name}-*.log` directly under `path`.
    fn matching_files(path: &Path, file_name: &str) -> Vec<PathBuf> {
        let prefix = format!("{}-", file_name);
        let Ok(entries) = fs::read_dir(path) else {
            return Vec::new();
        };
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|candidate| {
                candidate
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(&prefix) && name.ends_with(".log"))
            })
            .collect()
    }

    /// Parse the date embedded in `{file_name}-YYYY-MM-DD.log`.
    ///
    /// Unrelated files that happen to match the pattern simply fail to
    /// parse and are skipped.
    fn embedded_date(file: &Path, file_name: &str) -> Option<NaiveDate> {
        let name = file.file_name()?.to_str()?;
        let stem = name
            .strip_prefix(&format!("{}-", file_name))?
            .strip_suffix(".log")?;
        NaiveDate::parse_from_str(stem, "%Y-%m-%d").ok()
    }

    /// Create or extend one weekly bundle with the group's files.
    ///
    /// An existing bundle is read back and rebuilt so reopening a week
    /// appends. The rebuilt bundle lands in a temp file first and is
    /// renamed over the final name only after the gzip stream is finished
    /// and synced; the originals are untouched until then.
    fn extend_archive(&self, archive_path: &Path, log_dir: &Path, group: &[PathBuf]) -> Result<()> {
        let relative_names: Vec<PathBuf> = group
            .iter()
            .map(|file| file.strip_prefix(log_dir).unwrap_or(file.as_path()).to_path_buf())
            .collect();

        let mut existing: Vec<(PathBuf, Vec<u8>)> = Vec::new();
        if archive_path.exists() {
            let file = File::open(archive_path)
                .map_err(|_| LogError::archive(ArchiveErrorKind::OpenFailed))?;
            let mut archive = tar::Archive::new(GzDecoder::new(file));
            let entries = archive
                .entries()
                .map_err(|_| LogError::archive(ArchiveErrorKind::NotAnArchive))?;
            for entry in entries {
                let mut entry =
                    entry.map_err(|_| LogError::archive(ArchiveErrorKind::ReadError))?;
                let name = entry
                    .path()
                    .map_err(|_| LogError::archive(ArchiveErrorKind::ReadError))?
                    .into_owned();
                let mut data = Vec::new();
                entry
                    .read_to_end(&mut data)
                    .map_err(|_| LogError::archive(ArchiveErrorKind::ReadError))?;
                // A member being re-archived replaces its previous copy
                if !relative_names.contains(&name) {
                    existing.push((name, data));
                }
            }
        }

        let temp_path = archive_path.with_extension("gz.tmp");
        let fail = |code: ArchiveErrorKind| {
            let _ = fs::remove_file(&temp_path);
            LogError::archive(code)
        };

        let temp_file =
            File::create(&temp_path).map_err(|_| LogError::archive(ArchiveErrorKind::OpenFailed))?;
        let encoder = GzEncoder::new(temp_file, Compression::default());
        let mut builder = tar::Builder::new(encoder);

        for (name, data) in &existing {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, name, data.as_slice())
                .map_err(|_| fail(ArchiveErrorKind::Save))?;
        }

        for (file, relative) in group.iter().zip(&relative_names) {
            builder
                .append_path_with_name(file, relative)
                .map_err(|_| fail(ArchiveErrorKind::ReadError))?;
        }

        // Finalize; flush errors only surface at close time
        let encoder = builder.into_inner().map_err(|_| fail(ArchiveErrorKind::Save))?;
        let temp_file = encoder.finish().map_err(|_| fail(ArchiveErrorKind::Save))?;
        temp_file.sync_all().map_err(|_| fail(ArchiveErrorKind::Save))?;
        fs::rename(&temp_path, archive_path).map_err(|_| fail(ArchiveErrorKind::Save))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_date_parses_dated_names() {
        let file = Path::new("/var/log/app-2025-08-01.log");
        assert_eq!(
            LogArchiver::embedded_date(file, "app"),
            NaiveDate::from_ymd_opt(2025, 8, 1)
        );
    }

    #[test]
    fn test_embedded_date_rejects_unrelated_names() {
        assert!(LogArchiver::embedded_date(Path::new("/var/log/app-notes.log"), "app").is_none());
        assert!(LogArchiver::embedded_date(Path::new("/var/log/app-2025-13-40.log"), "app").is_none());
        assert!(LogArchiver::embedded_date(Path::new("/var/log/other-2025-08-01.log"), "app").is_none());
    }

    #[test]
    fn test_week_key_format() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 8).unwrap();
        assert_eq!(date.format("%G-%m-%V").to_string(), "2025-01-02");
    }
}
