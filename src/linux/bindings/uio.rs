//! `process_vm_readv` / `process_vm_writev` wrappers
//!
//! Each call moves one local segment to or from one remote segment. The
//! kernel validates the remote range, so a bad address comes back as
//! `EFAULT` rather than a signal in the caller.

use crate::core::types::{MemoryError, MemoryResult, ProcessId};
use libc::{c_void, iovec, pid_t};
use std::io;

/// Copies `buffer.len()` bytes from `address` in process `pid`.
///
/// Returns the number of bytes transferred, which may be short when the
/// range crosses into an unmapped page.
pub fn read_process_vm(pid: ProcessId, address: usize, buffer: &mut [u8]) -> MemoryResult<usize> {
    if buffer.is_empty() {
        return Ok(0);
    }

    let local = iovec {
        iov_base: buffer.as_mut_ptr() as *mut c_void,
        iov_len: buffer.len(),
    };
    let remote = iovec {
        iov_base: address as *mut c_void,
        iov_len: buffer.len(),
    };

    // SAFETY: `local` covers exactly the writable `buffer`; the remote side is
    // checked by the kernel
    let transferred = unsafe { libc::process_vm_readv(pid as pid_t, &local, 1, &remote, 1, 0) };

    if transferred < 0 {
        Err(MemoryError::read_failed(
            format!("0x{:X}", address),
            format!("process_vm_readv failed: {}", io::Error::last_os_error()),
        ))
    } else {
        Ok(transferred as usize)
    }
}

/// Copies `data` to `address` in process `pid`.
pub fn write_process_vm(pid: ProcessId, address: usize, data: &[u8]) -> MemoryResult<usize> {
    if data.is_empty() {
        return Ok(0);
    }

    let local = iovec {
        iov_base: data.as_ptr() as *mut c_void,
        iov_len: data.len(),
    };
    let remote = iovec {
        iov_base: address as *mut c_void,
        iov_len: data.len(),
    };

    // SAFETY: `local` covers exactly `data`, which the kernel only reads
    let transferred = unsafe { libc::process_vm_writev(pid as pid_t, &local, 1, &remote, 1, 0) };

    if transferred < 0 {
        Err(MemoryError::write_failed(
            format!("0x{:X}", address),
            format!("process_vm_writev failed: {}", io::Error::last_os_error()),
        ))
    } else {
        Ok(transferred as usize)
    }
}
