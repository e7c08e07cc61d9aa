use std::result;

use thiserror::Error;

use crate::conf::ConfError;

/// The error type for core option operations.
#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("Option {0} has no ';' between description and values")]
    MissingSeparator(String),
    #[error("Option {0} declares no values")]
    NoValues(String),
    #[error("No option named {0}")]
    UnknownKey(String),
    #[error("{value:?} is not a valid value for {key}")]
    InvalidValue { key: String, value: String },
    #[error("Option index {index} out of bounds ({len} options)")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error(transparent)]
    Conf(#[from] ConfError),
}

/// A specialized `Result` type for core option operations.
pub type OptionsResult<T> = result::Result<T, OptionsError>;
