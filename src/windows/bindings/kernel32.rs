//! Kernel32.dll bindings for foreign process memory transfer

use crate::core::types::{MemoryError, MemoryResult};
use winapi::shared::minwindef::{BOOL, FALSE, LPCVOID, LPVOID};
use winapi::um::errhandlingapi::GetLastError;
use winapi::um::memoryapi::{ReadProcessMemory, WriteProcessMemory};
use winapi::um::processthreadsapi::GetCurrentProcess;
use winapi::um::winnt::HANDLE;
use winapi::um::wow64apiset::IsWow64Process;

/// `ERROR_PARTIAL_COPY`: only part of the request crossed a page boundary
pub const ERROR_PARTIAL_COPY: u32 = 299;

/// Pseudo-handle of the calling process
pub fn current_process() -> HANDLE {
    // SAFETY: no preconditions
    unsafe { GetCurrentProcess() }
}

/// Safe wrapper for ReadProcessMemory.
///
/// A partial copy is reported as success with the short byte count.
///
/// # Safety
/// The handle must be a valid process handle with `PROCESS_VM_READ`
pub unsafe fn read_process_memory(
    handle: HANDLE,
    address: usize,
    buffer: &mut [u8],
) -> MemoryResult<usize> {
    if buffer.is_empty() {
        return Ok(0);
    }

    let mut bytes_read = 0;
    let result = ReadProcessMemory(
        handle,
        address as LPCVOID,
        buffer.as_mut_ptr() as LPVOID,
        buffer.len(),
        &mut bytes_read,
    );

    if result == FALSE {
        let code = GetLastError();
        if code == ERROR_PARTIAL_COPY && bytes_read > 0 {
            return Ok(bytes_read);
        }
        Err(MemoryError::read_failed(
            format!("0x{:X}", address),
            format!("ReadProcessMemory failed with error {}", code),
        ))
    } else {
        Ok(bytes_read)
    }
}

/// Safe wrapper for WriteProcessMemory
///
/// # Safety
/// The handle must be a valid process handle with `PROCESS_VM_WRITE` and
/// `PROCESS_VM_OPERATION`
pub unsafe fn write_process_memory(
    handle: HANDLE,
    address: usize,
    data: &[u8],
) -> MemoryResult<usize> {
    if data.is_empty() {
        return Ok(0);
    }

    let mut bytes_written = 0;
    let result = WriteProcessMemory(
        handle,
        address as LPVOID,
        data.as_ptr() as LPCVOID,
        data.len(),
        &mut bytes_written,
    );

    if result == FALSE {
        Err(MemoryError::write_failed(
            format!("0x{:X}", address),
            format!("WriteProcessMemory failed with error {}", GetLastError()),
        ))
    } else {
        Ok(bytes_written)
    }
}

/// Safe wrapper for IsWow64Process
///
/// # Safety
/// The handle must be a valid process handle with query rights
pub unsafe fn is_wow64_process(handle: HANDLE) -> MemoryResult<bool> {
    let mut wow64: BOOL = FALSE;

    if IsWow64Process(handle, &mut wow64) == FALSE {
        Err(MemoryError::OsApi(format!(
            "IsWow64Process failed with error {}",
            GetLastError()
        )))
    } else {
        Ok(wow64 != FALSE)
    }
}
