//! Linux syscall layer
//!
//! All unsafe FFI calls used by the Linux backend are contained here.

pub mod bindings;

pub use bindings::uio;
