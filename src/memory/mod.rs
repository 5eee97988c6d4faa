//! Foreign process memory I/O
//!
//! Two layers:
//! - [`backend`]: raw byte transfer through the host OS (or a simulated
//!   range), selected once per process binding
//! - [`MemoryIO`]: typed values, arrays and encoded strings on top of
//!   the raw transfer, with best-effort semantics

pub mod backend;
pub mod io;

pub use backend::{PlatformBackend, RawMemory, SimulatedMemory};
#[cfg(target_os = "linux")]
pub use backend::LinuxBackend;
#[cfg(windows)]
pub use backend::WindowsBackend;
pub use io::{MemoryIO, DEFAULT_MAX_STRING_LENGTH};
