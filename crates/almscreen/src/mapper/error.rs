//! Error types for the mapper

use std::io;
use thiserror::Error;

/// Mapper error type
#[derive(Error, Debug)]
pub enum MapperError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("DMS error: {0}")]
    Dms(#[from] almscreen_dms::DmsError),

    #[error("File is not valid Windows-1252 text: {path}")]
    Decode { path: String },

    #[error("Empty datapoint key")]
    EmptyKey,

    #[error("DMS rejected write to '{key}': {message}")]
    StoreWrite { key: String, message: String },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, MapperError>;
