//! Log storage backends
//!
//! A [`Storage`] accepts leveled log calls and lands them on disk through a
//! [`LogFormatter`](crate::format::LogFormatter). The write path is built by
//! composition: an [`EntryWriter`] performs the physical write, and decorator
//! writers add policy (size-bounded eviction) around an inner writer.

pub mod daily;
pub mod file;
pub mod rotating;
pub mod writer;

pub use daily::DailyLogStorage;
pub use file::FileStorage;
pub use rotating::{RotatingFileStorage, DEFAULT_MAX_FILE_SIZE};
pub use writer::{AppendWriter, EntryWriter, SizeBoundedWriter};

use crate::core::{LogLevel, Result};
use serde_json::Value;

/// Stores one log call with optional structured context.
pub trait Storage: Send + Sync {
    fn store(&self, level: LogLevel, message: &str, context: Option<&Value>) -> Result<()>;
}
