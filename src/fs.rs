//! Filesystem path handling
//!
//! [`PathResolver`] normalizes paths into segments, joins them back with
//! `..` resolution, and creates directory trees while honoring a restricted
//! base-directory boundary: directories inside the configured allow-list
//! prefix are assumed to exist and are never created, so a read-only parent
//! outside the process's permission boundary never sees a `mkdir` attempt.

use crate::core::{LogError, Result};
use std::env;
use std::fs;
use std::path::{Path, MAIN_SEPARATOR};

/// Name of the process variable holding the restricted base-directory
/// allow-list (`:`-separated; only the first entry is used).
pub const BASE_DIR_ENV: &str = "LOGVAULT_BASE_DIR";

/// Path normalization and directory creation with an allow-list boundary.
///
/// Construct one explicitly with [`PathResolver::new`], or capture the
/// process environment once with [`PathResolver::from_env`]. The resolver
/// holds only immutable computed state and is safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct PathResolver {
    base_dirs: Vec<String>,
}

impl PathResolver {
    /// Create a resolver with an explicit allow-list boundary.
    ///
    /// `base` is the restricted root under which directories are assumed to
    /// already exist; pass an empty path for no boundary.
    pub fn new(base: impl AsRef<Path>) -> Self {
        let raw = base.as_ref().to_string_lossy();
        Self {
            base_dirs: Self::extract_segments(&raw)
                .into_iter()
                .filter(|dir| dir != ".")
                .collect(),
        }
    }

    /// Create a resolver from the `LOGVAULT_BASE_DIR` process variable.
    ///
    /// The variable is read once here; an absent variable means no boundary.
    pub fn from_env() -> Self {
        match env::var(BASE_DIR_ENV) {
            Ok(value) => {
                let first = value.split(':').next().unwrap_or("");
                Self::new(first)
            }
            Err(_) => Self::default(),
        }
    }

    /// The captured allow-list boundary, as path segments.
    pub fn base_dirs(&self) -> &[String] {
        &self.base_dirs
    }

    /// Split a path into its non-empty components.
    ///
    /// Repeated, leading and trailing separators all collapse away.
    pub fn extract_segments(path: &str) -> Vec<String> {
        path.split(MAIN_SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .map(String::from)
            .collect()
    }

    /// Join segments back into a path, resolving `..` against the nearest
    /// retained preceding segment.
    ///
    /// Whitespace-only and empty segments are dropped. A leading `..` with
    /// nothing left to pop is retained literally. The separator prefix is
    /// added iff `absolute` is requested and the result is not already a
    /// platform-absolute path (e.g. `C:\`).
    pub fn join_segments<S: AsRef<str>>(segments: &[S], absolute: bool) -> String {
        let mut retained: Vec<&str> = Vec::with_capacity(segments.len());
        for segment in segments {
            let segment = segment.as_ref().trim();
            if segment.is_empty() {
                continue;
            }
            if segment == ".." {
                match retained.last() {
                    Some(&last) if last != ".." => {
                        retained.pop();
                    }
                    _ => retained.push(".."),
                }
            } else {
                retained.push(segment);
            }
        }

        let joined = retained.join(&MAIN_SEPARATOR.to_string());
        if absolute && !Self::is_platform_absolute(&joined) {
            format!("{}{}", MAIN_SEPARATOR, joined)
        } else {
            joined
        }
    }

    /// Whether the path is absolute in the platform drive-letter form.
    ///
    /// Only ever true on platforms whose separator is a backslash.
    pub fn is_platform_absolute(path: &str) -> bool {
        if !cfg!(windows) {
            return false;
        }
        let bytes = path.as_bytes();
        bytes.len() >= 2 && bytes[0].is_ascii_uppercase() && bytes[1] == b':'
    }

    /// Create every missing level of `path`, left to right.
    ///
    /// Levels still inside the allow-list's matched prefix are skipped.
    /// A failed `mkdir` is tolerated when the directory exists afterwards,
    /// so two processes racing on the same tree both succeed; otherwise the
    /// offending level is reported as a [`LogError::DirectoryCreation`].
    pub fn create_dir_tree(&self, path: impl AsRef<Path>) -> Result<()> {
        let raw = path.as_ref().to_string_lossy();
        let absolute = raw.starts_with(MAIN_SEPARATOR) || Self::is_platform_absolute(&raw);
        let segments = Self::extract_segments(&raw);

        let mut prefix = String::with_capacity(raw.len());
        let mut in_base = absolute && !self.base_dirs.is_empty();
        for (index, segment) in segments.iter().enumerate() {
            if absolute || index > 0 {
                prefix.push(MAIN_SEPARATOR);
            }
            prefix.push_str(segment);

            in_base = in_base && self.base_dirs.get(index) == Some(segment);
            if in_base {
                continue;
            }

            let dir = Path::new(&prefix);
            if !dir.exists() && fs::create_dir(dir).is_err() && !dir.is_dir() {
                return Err(LogError::directory_creation(dir));
            }
        }
        Ok(())
    }
}
