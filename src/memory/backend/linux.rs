//! Linux backend over `process_vm_readv` / `process_vm_writev`

use super::RawMemory;
use crate::core::types::{Address, Bitness, MemoryResult, Platform};
use crate::linux::uio;
use crate::process::{bitness, privileges, ProcessHandle};
use tracing::debug;

/// Transfers bytes to and from a Linux process addressed by pid
#[derive(Debug, Clone)]
pub struct LinuxBackend {
    handle: ProcessHandle,
    bitness: Bitness,
}

impl LinuxBackend {
    /// Binds to `handle` and detects its bitness from the ELF header
    pub fn new(handle: ProcessHandle) -> Self {
        let bitness = bitness::detect_linux(&handle);
        debug!(
            pid = handle.pid(),
            %bitness,
            root = privileges::is_root(),
            "Linux backend ready"
        );
        LinuxBackend { handle, bitness }
    }

    /// Binds to `handle` with a known bitness, skipping detection
    pub fn with_bitness(handle: ProcessHandle, bitness: Bitness) -> Self {
        LinuxBackend { handle, bitness }
    }

    /// The process this backend is bound to
    pub fn process(&self) -> &ProcessHandle {
        &self.handle
    }
}

impl RawMemory for LinuxBackend {
    fn read_into(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<usize> {
        uio::read_process_vm(self.handle.pid(), address.as_usize(), buffer)
    }

    fn write_from(&self, address: Address, data: &[u8]) -> MemoryResult<usize> {
        uio::write_process_vm(self.handle.pid(), address.as_usize(), data)
    }

    fn bitness(&self) -> Bitness {
        self.bitness
    }

    fn platform(&self) -> Platform {
        Platform::Linux
    }
}
