//! # Logvault
//!
//! A file-based logging library: leveled messages with optional structured
//! context, formatted into single lines and appended to daily or
//! size-rotated log files, with aged daily files bundled into compressed
//! weekly archives.
//!
//! ## Features
//!
//! - **Daily files**: one `name-YYYY-MM-DD.log` file per calendar day
//! - **Size-bounded rotation**: a single file kept under a byte ceiling by
//!   dropping the oldest entries first
//! - **Weekly archival**: aged daily files grouped by year-week into
//!   `.tar.gz` bundles, originals removed only after a durable write
//! - **Pluggable formatting**: plain line, JSON and syslog-style formatters
//!   over exchangeable context serializers

pub mod archive;
pub mod core;
pub mod format;
pub mod fs;
pub mod logger;
pub mod storage;

pub mod prelude {
    pub use crate::archive::LogArchiver;
    pub use crate::core::{ArchiveErrorKind, LogError, LogLevel, Result};
    pub use crate::format::{
        ContextSerializer, JsonContextSerializer, JsonFormatter, LineFormatter, LogFormatter,
        SyslogFormatter, SyslogStructuredDataSerializer,
    };
    pub use crate::fs::PathResolver;
    pub use crate::logger::{Logger, CHANNEL};
    pub use crate::storage::{DailyLogStorage, FileStorage, RotatingFileStorage, Storage};
}

pub use crate::archive::LogArchiver;
pub use crate::core::{ArchiveErrorKind, LogError, LogLevel, Result};
pub use crate::format::{
    ContextSerializer, JsonContextSerializer, JsonFormatter, LineFormatter, LogFormatter,
    SyslogFormatter, SyslogStructuredDataSerializer,
};
pub use crate::fs::PathResolver;
pub use crate::logger::{Logger, CHANNEL};
pub use crate::storage::{DailyLogStorage, FileStorage, RotatingFileStorage, Storage};
