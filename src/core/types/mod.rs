//! Core type definitions for memory-monitor
//!
//! Address wrapper, fixed-size value transcoding, text encodings,
//! platform descriptors and the crate-wide error type.

mod address;
mod encoding;
mod error;
mod platform;
mod value;

// Re-export all public types
pub use address::Address;
pub use encoding::TextEncoding;
pub use error::{MemoryError, MemoryResult};
pub use platform::{Bitness, Platform};
pub use value::{decode_slice, encode_slice, MemoryType};

// Common type aliases
pub type ProcessId = u32;
pub type Offset = isize;
