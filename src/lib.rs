//! memory-monitor: foreign process memory I/O and polling change detection
//!
//! - [`memory`]: raw transfer backends (Windows, Linux, simulated) and the
//!   typed [`MemoryIO`] facade
//! - [`monitor`]: region, value and array monitors, addressed directly or
//!   through a pointer
//! - [`process`]: process handles and bitness detection
//! - [`config`] and [`logging`]: ambient settings

pub mod config;
pub mod core;
pub mod logging;
pub mod memory;
pub mod monitor;
pub mod process;

#[cfg(target_os = "linux")]
pub mod linux;
#[cfg(windows)]
pub mod windows;

// Re-export main types from core module
pub use crate::core::types::{
    Address, Bitness, MemoryError, MemoryResult, MemoryType, Offset, Platform, ProcessId,
    TextEncoding,
};

pub use memory::{MemoryIO, PlatformBackend, RawMemory, SimulatedMemory};
pub use monitor::{
    ArrayChange, ArrayMonitor, CancellationToken, MemoryChange, Monitor, RegionMonitor,
    SubscriptionId, ValueMonitor, DEFAULT_POLLING_INTERVAL,
};
pub use process::ProcessHandle;

// Version information
pub use crate::core::{AUTHORS, VERSION};
