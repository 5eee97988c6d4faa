//! Core module containing fundamental types for memory-monitor
//!
//! Everything the backends, the I/O facade and the monitors agree on:
//! addresses, plain-data value transcoding, text encodings, platform
//! descriptors and the error type.

pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    Address, Bitness, MemoryError, MemoryResult, MemoryType, Platform, ProcessId, TextEncoding,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");

#[cfg(not(any(windows, target_os = "linux")))]
compile_error!("memory-monitor only supports Windows and Linux hosts");
