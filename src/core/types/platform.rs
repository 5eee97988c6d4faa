//! Host platform and target bitness descriptors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating system family a backend talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    Linux,
    /// In-process buffer with no OS involvement
    Simulated,
}

impl Platform {
    /// The platform this crate was compiled for, if it has a native backend
    pub const fn host() -> Option<Self> {
        if cfg!(windows) {
            Some(Platform::Windows)
        } else if cfg!(target_os = "linux") {
            Some(Platform::Linux)
        } else {
            None
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Windows => write!(f, "windows"),
            Platform::Linux => write!(f, "linux"),
            Platform::Simulated => write!(f, "simulated"),
        }
    }
}

/// Pointer width of the target process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Bitness {
    Bit32,
    Bit64,
}

impl Bitness {
    /// Bitness of the calling process
    pub const fn host() -> Self {
        if cfg!(target_pointer_width = "64") {
            Bitness::Bit64
        } else {
            Bitness::Bit32
        }
    }

    pub const fn from_is_64bit(is_64bit: bool) -> Self {
        if is_64bit {
            Bitness::Bit64
        } else {
            Bitness::Bit32
        }
    }

    /// Size in bytes of a pointer in the target
    pub const fn pointer_size(&self) -> usize {
        match self {
            Bitness::Bit32 => 4,
            Bitness::Bit64 => 8,
        }
    }

    pub const fn is_64bit(&self) -> bool {
        matches!(self, Bitness::Bit64)
    }
}

impl fmt::Display for Bitness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bitness::Bit32 => write!(f, "32-bit"),
            Bitness::Bit64 => write!(f, "64-bit"),
        }
    }
}
