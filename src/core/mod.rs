//! Core types: levels and errors

pub mod error;
pub mod log_level;

pub use error::{ArchiveErrorKind, LogError, Result};
pub use log_level::LogLevel;
