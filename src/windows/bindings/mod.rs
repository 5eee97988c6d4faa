//! Windows API bindings
//!
//! Low-level FFI wrappers around kernel32.

pub mod kernel32;
