//! Error types for the DMS client

use std::io;
use thiserror::Error;

/// DMS client error type
#[derive(Error, Debug)]
pub enum DmsError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid opcode: {0}")]
    InvalidOpCode(u8),

    #[error("Protocol version mismatch: expected {expected:#04x}, got {got:#04x}")]
    VersionMismatch { expected: u8, got: u8 },

    #[error("Payload too large: {size} bytes (max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    #[error("Unexpected reply opcode: {0:?}")]
    UnexpectedReply(crate::wire::OpCode),

    #[error("Invalid path filter '{pattern}': {message}")]
    InvalidFilter { pattern: String, message: String },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, DmsError>;
