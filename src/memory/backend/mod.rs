//! Raw byte transfer against a foreign address space
//!
//! A backend copies bytes between a local buffer and the target and keeps
//! no state besides its process binding. [`PlatformBackend`] picks the
//! host's implementation once, at construction.

#[cfg(target_os = "linux")]
pub mod linux;
pub mod simulated;
#[cfg(windows)]
pub mod windows;

#[cfg(target_os = "linux")]
pub use linux::LinuxBackend;
pub use simulated::SimulatedMemory;
#[cfg(windows)]
pub use windows::WindowsBackend;

use crate::core::types::{Address, Bitness, MemoryResult, Platform};
use crate::process::ProcessHandle;
use std::sync::Arc;

/// Raw byte transfer primitive every backend provides.
///
/// Implementations must treat zero-length requests as successful no-ops
/// and must report an invalid target address as an `Err`, never by
/// faulting the calling process.
pub trait RawMemory: Send + Sync {
    /// Copies up to `buffer.len()` bytes from `address` into `buffer`,
    /// returning how many bytes were transferred
    fn read_into(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<usize>;

    /// Copies `data` to `address`, returning how many bytes were transferred
    fn write_from(&self, address: Address, data: &[u8]) -> MemoryResult<usize>;

    /// Pointer width of the target
    fn bitness(&self) -> Bitness;

    /// Operating system family the transfer goes through
    fn platform(&self) -> Platform;
}

impl<R: RawMemory + ?Sized> RawMemory for Arc<R> {
    fn read_into(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<usize> {
        (**self).read_into(address, buffer)
    }

    fn write_from(&self, address: Address, data: &[u8]) -> MemoryResult<usize> {
        (**self).write_from(address, data)
    }

    fn bitness(&self) -> Bitness {
        (**self).bitness()
    }

    fn platform(&self) -> Platform {
        (**self).platform()
    }
}

/// The host operating system's backend
#[derive(Debug, Clone)]
pub enum PlatformBackend {
    #[cfg(windows)]
    Windows(WindowsBackend),
    #[cfg(target_os = "linux")]
    Linux(LinuxBackend),
}

impl PlatformBackend {
    /// Builds the backend matching the host OS for `handle`
    pub fn for_process(handle: ProcessHandle) -> Self {
        #[cfg(windows)]
        {
            PlatformBackend::Windows(WindowsBackend::new(handle))
        }
        #[cfg(target_os = "linux")]
        {
            PlatformBackend::Linux(LinuxBackend::new(handle))
        }
    }

    /// The process this backend is bound to
    pub fn process(&self) -> &ProcessHandle {
        match self {
            #[cfg(windows)]
            PlatformBackend::Windows(backend) => backend.process(),
            #[cfg(target_os = "linux")]
            PlatformBackend::Linux(backend) => backend.process(),
        }
    }
}

impl RawMemory for PlatformBackend {
    fn read_into(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<usize> {
        match self {
            #[cfg(windows)]
            PlatformBackend::Windows(backend) => backend.read_into(address, buffer),
            #[cfg(target_os = "linux")]
            PlatformBackend::Linux(backend) => backend.read_into(address, buffer),
        }
    }

    fn write_from(&self, address: Address, data: &[u8]) -> MemoryResult<usize> {
        match self {
            #[cfg(windows)]
            PlatformBackend::Windows(backend) => backend.write_from(address, data),
            #[cfg(target_os = "linux")]
            PlatformBackend::Linux(backend) => backend.write_from(address, data),
        }
    }

    fn bitness(&self) -> Bitness {
        match self {
            #[cfg(windows)]
            PlatformBackend::Windows(backend) => backend.bitness(),
            #[cfg(target_os = "linux")]
            PlatformBackend::Linux(backend) => backend.bitness(),
        }
    }

    fn platform(&self) -> Platform {
        match self {
            #[cfg(windows)]
            PlatformBackend::Windows(backend) => backend.platform(),
            #[cfg(target_os = "linux")]
            PlatformBackend::Linux(backend) => backend.platform(),
        }
    }
}
