//! Windows backend over `ReadProcessMemory` / `WriteProcessMemory`

use super::RawMemory;
use crate::core::types::{Address, Bitness, MemoryResult, Platform};
use crate::process::{bitness, ProcessHandle};
use crate::windows::kernel32;
use tracing::debug;
use winapi::um::winnt::HANDLE;

/// Transfers bytes to and from a Windows process through its handle
#[derive(Debug, Clone)]
pub struct WindowsBackend {
    handle: ProcessHandle,
    bitness: Bitness,
}

impl WindowsBackend {
    /// Binds to `handle` and asks the OS whether it runs under WoW64
    pub fn new(handle: ProcessHandle) -> Self {
        let bitness = bitness::detect_windows(&handle);
        debug!(pid = handle.pid(), %bitness, "Windows backend ready");
        WindowsBackend { handle, bitness }
    }

    /// Binds to `handle` with a known bitness, skipping detection
    pub fn with_bitness(handle: ProcessHandle, bitness: Bitness) -> Self {
        WindowsBackend { handle, bitness }
    }

    /// The process this backend is bound to
    pub fn process(&self) -> &ProcessHandle {
        &self.handle
    }

    fn raw(&self) -> HANDLE {
        self.handle.raw() as HANDLE
    }
}

impl RawMemory for WindowsBackend {
    fn read_into(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<usize> {
        // SAFETY: the caller keeps the process handle open while the backend lives
        unsafe { kernel32::read_process_memory(self.raw(), address.as_usize(), buffer) }
    }

    fn write_from(&self, address: Address, data: &[u8]) -> MemoryResult<usize> {
        // SAFETY: as above
        unsafe { kernel32::write_process_memory(self.raw(), address.as_usize(), data) }
    }

    fn bitness(&self) -> Bitness {
        self.bitness
    }

    fn platform(&self) -> Platform {
        Platform::Windows
    }
}
