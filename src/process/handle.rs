//! Borrowed reference to an already-attached target process

use crate::core::types::ProcessId;
use std::fmt;
use std::path::{Path, PathBuf};

/// Opaque OS handle value.
///
/// On Windows this is a `HANDLE` with at least `PROCESS_VM_READ`,
/// `PROCESS_VM_WRITE`, `PROCESS_VM_OPERATION` and
/// `PROCESS_QUERY_LIMITED_INFORMATION` rights. Linux backends address the
/// target by pid and ignore it.
pub type RawHandle = isize;

/// A target process obtained by the caller.
///
/// This crate never opens or closes the underlying OS handle; whoever
/// built the `ProcessHandle` keeps the handle alive for as long as any
/// backend built on it is in use.
#[derive(Clone, PartialEq, Eq)]
pub struct ProcessHandle {
    pid: ProcessId,
    raw: RawHandle,
    main_module: Option<PathBuf>,
}

impl ProcessHandle {
    /// Wraps an externally owned handle
    pub fn new(pid: ProcessId, raw: RawHandle, main_module: Option<PathBuf>) -> Self {
        ProcessHandle {
            pid,
            raw,
            main_module,
        }
    }

    /// Handle to a Linux process, which only needs the pid
    pub fn from_pid(pid: ProcessId) -> Self {
        Self::new(pid, 0, None)
    }

    /// Handle to the calling process.
    ///
    /// Uses the `GetCurrentProcess` pseudo-handle on Windows, which needs
    /// no closing.
    pub fn current() -> Self {
        Self::new(
            std::process::id(),
            current_process_raw(),
            std::env::current_exe().ok(),
        )
    }

    /// Attaches the path of the target's main executable
    pub fn with_main_module(mut self, path: impl Into<PathBuf>) -> Self {
        self.main_module = Some(path.into());
        self
    }

    /// Get the process ID
    pub fn pid(&self) -> ProcessId {
        self.pid
    }

    /// Get the raw OS handle value
    pub fn raw(&self) -> RawHandle {
        self.raw
    }

    /// Path of the target's main executable, when known
    pub fn main_module(&self) -> Option<&Path> {
        self.main_module.as_deref()
    }

    /// Check if the OS handle is non-null
    pub fn has_os_handle(&self) -> bool {
        self.raw != 0
    }
}

#[cfg(windows)]
fn current_process_raw() -> RawHandle {
    // SAFETY: GetCurrentProcess has no preconditions and returns a pseudo-handle
    unsafe { winapi::um::processthreadsapi::GetCurrentProcess() as RawHandle }
}

#[cfg(not(windows))]
fn current_process_raw() -> RawHandle {
    0
}

impl fmt::Debug for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessHandle")
            .field("pid", &self.pid)
            .field("raw", &format!("0x{:X}", self.raw))
            .field("main_module", &self.main_module)
            .finish()
    }
}

impl fmt::Display for ProcessHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProcessHandle(pid={})", self.pid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_handle_new() {
        let handle = ProcessHandle::new(1234, 0x44, Some(PathBuf::from("/usr/bin/app")));
        assert_eq!(handle.pid(), 1234);
        assert_eq!(handle.raw(), 0x44);
        assert!(handle.has_os_handle());
        assert_eq!(handle.main_module(), Some(Path::new("/usr/bin/app")));
    }

    #[test]
    fn test_from_pid() {
        let handle = ProcessHandle::from_pid(77);
        assert_eq!(handle.pid(), 77);
        assert!(!handle.has_os_handle());
        assert!(handle.main_module().is_none());

        let handle = handle.with_main_module("/bin/true");
        assert_eq!(handle.main_module(), Some(Path::new("/bin/true")));
    }

    #[test]
    fn test_current_process() {
        let handle = ProcessHandle::current();
        assert_eq!(handle.pid(), std::process::id());
        assert!(handle.main_module().is_some());
        #[cfg(windows)]
        assert!(handle.has_os_handle());
    }

    #[test]
    fn test_process_handle_display_and_debug() {
        let handle = ProcessHandle::new(5678, 0x1F, None);
        assert_eq!(format!("{}", handle), "ProcessHandle(pid=5678)");

        let debug = format!("{:?}", handle);
        assert!(debug.contains("pid: 5678"));
        assert!(debug.contains("0x1F"));
    }
}
