use std::path::PathBuf;
use std::{io, result};

use thiserror::Error;

use crate::conf::ConfError;
use crate::format::FilterFormats;

/// Why a softfilter implementation table was not accepted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error("no implementation returned")]
    Null,
    #[error("API version {found}, expected {expected}")]
    ApiVersion { found: i32, expected: i32 },
    #[error("missing function {0}")]
    MissingFunction(&'static str),
    #[error("missing identifier")]
    MissingIdent,
}

/// The error type for discovering, building and running softfilters.
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("No softfilter plugins found")]
    NoFilters,
    #[error("No softfilter is configured")]
    NoFilterConfigured,
    #[error("Couldn't find softfilter \"{0}\"")]
    NotFound(String),
    #[error("Softfilter \"{filter}\" does not accept {format:?} input")]
    UnsupportedInput { filter: String, format: FilterFormats },
    #[error("Softfilter \"{0}\" has no compatible output format")]
    NoCompatibleFormat(String),
    #[error("Failed to create softfilter \"{0}\"")]
    CreateFailed(String),
    #[error("Softfilter \"{0}\" reports no worker threads")]
    NoThreads(String),
    #[error("Built-in softfilter \"{0}\" returned no implementation")]
    BuiltinUnavailable(&'static str),
    #[error("Softfilter {origin} rejected: {reason}")]
    Rejected {
        origin: String,
        #[source]
        reason: RejectReason,
    },
    #[error("Frame of {width}x{height} exceeds the maximum of {max_width}x{max_height}")]
    FrameTooLarge {
        width: u32,
        height: u32,
        max_width: u32,
        max_height: u32,
    },
    #[error("{what} stride {stride} is shorter than a row of {row} bytes")]
    StrideTooSmall {
        what: &'static str,
        stride: usize,
        row: usize,
    },
    #[error("{what} buffer holds {len} bytes, {needed} needed")]
    BufferTooSmall {
        what: &'static str,
        len: usize,
        needed: usize,
    },
    #[error("{what} buffer is not aligned to its pixel size")]
    Misaligned { what: &'static str },
    #[error("Couldn't read softfilter directory {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Couldn't read filter config")]
    Conf(#[from] ConfError),
}

/// A specialized `Result` type for softfilter operations.
pub type FilterResult<T> = result::Result<T, FilterError>;
