use std::path::PathBuf;
use std::{io, result};

use thiserror::Error;

/// The error type for reading and writing configuration files.
#[derive(Error, Debug)]
pub enum ConfError {
    #[error("Couldn't access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Malformed entry on line {line}: {content}")]
    Parse { line: usize, content: String },
}

/// A specialized `Result` type for configuration files.
pub type ConfResult<T> = result::Result<T, ConfError>;
