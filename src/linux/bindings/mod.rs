//! Linux syscall bindings

pub mod uio;
