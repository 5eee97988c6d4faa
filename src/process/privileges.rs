//! Privilege checks for cross-process access

/// Whether the calling process runs as root.
///
/// `process_vm_readv` on a process owned by another user, or one that
/// `ptrace_scope` protects, needs root or `CAP_SYS_PTRACE`.
pub fn is_root() -> bool {
    // SAFETY: getuid has no preconditions and cannot fail
    unsafe { libc::getuid() == 0 }
}
