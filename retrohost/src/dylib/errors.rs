use std::path::PathBuf;
use std::result;

use thiserror::Error;

/// The error type for opening libraries.
#[derive(Error, Debug, Eq, PartialEq)]
pub enum DylibError {
    #[error("Failed to open {}: {reason}", path.display())]
    Open { path: PathBuf, reason: String },
}

/// A specialized `Result` type for library operations.
pub type DylibResult<T> = result::Result<T, DylibError>;
