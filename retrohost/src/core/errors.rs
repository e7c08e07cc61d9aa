use std::path::PathBuf;
use std::{io, result};

use thiserror::Error;

use crate::dylib::DylibError;

/// The error type for binding and driving a core.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("No core path is configured")]
    EmptyPath,
    #[error("The libretro interface is statically linked into the frontend")]
    StaticallyLinked,
    #[error("Couldn't resolve core path {}: {source}", path.display())]
    ResolvePath {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Couldn't load core")]
    Load(#[from] DylibError),
    #[error("Core is missing required export {0}")]
    MissingSymbol(&'static str),
    #[error("The core needs content to run")]
    ContentRequired,
    #[error("Couldn't read content {}: {source}", path.display())]
    ContentRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Content path contains a NUL byte")]
    ContentPath,
    #[error("The core failed to load the content")]
    LoadGame,
}

/// A specialized `Result` type for core operations.
pub type CoreResult<T> = result::Result<T, CoreError>;

/// The error type for probing a core's metadata.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProbeError {
    #[error("Couldn't open core for probing")]
    Open(#[from] DylibError),
    #[error("{} does not export retro_get_system_info", .0.display())]
    MissingMetadata(PathBuf),
}

/// A specialized `Result` type for probing.
pub type ProbeResult<T> = result::Result<T, ProbeError>;
