//! Windows API layer
//!
//! All unsafe FFI calls used by the Windows backend are contained here.

pub mod bindings;

pub use bindings::kernel32;
