//! Target process identity
//!
//! Process discovery and attachment happen elsewhere; this module only
//! describes a process the caller already holds and detects its bitness.

pub mod bitness;
pub mod handle;
#[cfg(target_os = "linux")]
pub mod privileges;

pub use bitness::detect as detect_bitness;
pub use handle::{ProcessHandle, RawHandle};
#[cfg(target_os = "linux")]
pub use privileges::is_root;
