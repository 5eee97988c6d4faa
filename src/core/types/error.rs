//! Custom error types for memory-monitor

use std::fmt;
use thiserror::Error;

/// Main error type for memory operations
#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Invalid memory address: {0}")]
    InvalidAddress(String),

    #[error("Failed to read memory at {address}: {reason}")]
    ReadFailed { address: String, reason: String },

    #[error("Failed to write memory at {address}: {reason}")]
    WriteFailed { address: String, reason: String },

    #[error("Invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("Unable to detect bitness of process {pid}: {reason}")]
    BitnessDetection { pid: u32, reason: String },

    #[error("OS API error: {0}")]
    OsApi(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for memory operations
pub type MemoryResult<T> = Result<T, MemoryError>;

impl MemoryError {
    /// Creates a read failed error
    pub fn read_failed(address: impl fmt::Display, reason: impl Into<String>) -> Self {
        MemoryError::ReadFailed {
            address: address.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates a write failed error
    pub fn write_failed(address: impl fmt::Display, reason: impl Into<String>) -> Self {
        MemoryError::WriteFailed {
            address: address.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates a construction-time argument error
    pub fn invalid_argument(name: &'static str, reason: impl Into<String>) -> Self {
        MemoryError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    /// Creates a bitness detection error
    pub fn bitness_detection(pid: u32, reason: impl Into<String>) -> Self {
        MemoryError::BitnessDetection {
            pid,
            reason: reason.into(),
        }
    }
}
