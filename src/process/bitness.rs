//! Target process bitness detection
//!
//! Detection never fails outward: every error degrades to a fallback and is
//! logged at debug level.

use crate::core::types::{Bitness, MemoryError, MemoryResult};
use crate::process::ProcessHandle;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// `\x7FELF`
const ELF_MAGIC: [u8; 4] = [0x7F, b'E', b'L', b'F'];
/// Offset of `EI_CLASS` in the ELF identification header
const ELF_CLASS_OFFSET: usize = 4;
const ELF_CLASS_32: u8 = 1;
const ELF_CLASS_64: u8 = 2;

/// Assumed when the executable header of a Linux target cannot be read
pub const LINUX_FALLBACK: Bitness = Bitness::Bit64;

/// Assumed when the WoW64 query on a Windows target fails
pub const WINDOWS_FALLBACK: Bitness = Bitness::Bit32;

/// Detects the bitness of `handle` using the host platform's policy
pub fn detect(handle: &ProcessHandle) -> Bitness {
    #[cfg(windows)]
    {
        detect_windows(handle)
    }
    #[cfg(not(windows))]
    {
        detect_linux(handle)
    }
}

/// Reads the ELF class byte of the target's main executable.
///
/// Falls back to [`LINUX_FALLBACK`] when nothing can be read.
pub fn detect_linux(handle: &ProcessHandle) -> Bitness {
    match elf_bitness(handle) {
        Ok(bitness) => {
            debug!(pid = handle.pid(), %bitness, "Detected target bitness");
            bitness
        }
        Err(e) => {
            debug!(error = %e, "Assuming {}", LINUX_FALLBACK);
            LINUX_FALLBACK
        }
    }
}

/// Classifies the ELF identification header of the target's main module,
/// or of `/proc/<pid>/exe` when the handle carries no module path
pub fn elf_bitness(handle: &ProcessHandle) -> MemoryResult<Bitness> {
    let path = handle
        .main_module()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(format!("/proc/{}/exe", handle.pid())));

    let mut header = [0u8; ELF_CLASS_OFFSET + 1];
    File::open(&path)
        .and_then(|mut file| file.read_exact(&mut header))
        .map_err(|e| {
            MemoryError::bitness_detection(handle.pid(), format!("{}: {}", path.display(), e))
        })?;

    parse_elf_class(&header).ok_or_else(|| {
        MemoryError::bitness_detection(
            handle.pid(),
            format!("{} is not a 32- or 64-bit ELF image", path.display()),
        )
    })
}

/// Classifies the first bytes of an ELF image, `None` if they are not one
pub fn parse_elf_class(header: &[u8]) -> Option<Bitness> {
    if header.len() <= ELF_CLASS_OFFSET || header[..4] != ELF_MAGIC {
        return None;
    }
    match header[ELF_CLASS_OFFSET] {
        ELF_CLASS_32 => Some(Bitness::Bit32),
        ELF_CLASS_64 => Some(Bitness::Bit64),
        _ => None,
    }
}

/// Asks Windows whether the target runs under WoW64.
///
/// On a 32-bit OS every process is 32-bit. On a 64-bit OS a WoW64 process
/// is 32-bit and anything else is 64-bit.
#[cfg(windows)]
pub fn detect_windows(handle: &ProcessHandle) -> Bitness {
    use crate::windows::bindings::kernel32;

    if !host_os_is_64bit() {
        return Bitness::Bit32;
    }

    // SAFETY: the caller keeps the handle open for the lifetime of `handle`
    match unsafe { kernel32::is_wow64_process(handle.raw() as _) } {
        Ok(is_wow64) => Bitness::from_is_64bit(!is_wow64),
        Err(e) => {
            let error = MemoryError::bitness_detection(handle.pid(), e.to_string());
            debug!(error = %error, "Assuming {}", WINDOWS_FALLBACK);
            WINDOWS_FALLBACK
        }
    }
}

#[cfg(windows)]
fn host_os_is_64bit() -> bool {
    use crate::windows::bindings::kernel32;

    if cfg!(target_pointer_width = "64") {
        return true;
    }
    // a 32-bit host is itself under WoW64 exactly when the OS is 64-bit
    unsafe { kernel32::is_wow64_process(kernel32::current_process()) }.unwrap_or(false)
}
