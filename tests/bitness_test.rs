//! Bitness detection through process handles and backends

use memory_monitor::core::types::{Bitness, Platform};
use memory_monitor::memory::{MemoryIO, PlatformBackend, RawMemory};
use memory_monitor::process::{bitness, detect_bitness, ProcessHandle};
use std::io::Write;

#[test]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn test_current_process_matches_host() {
    let handle = ProcessHandle::current();
    assert_eq!(detect_bitness(&handle), Bitness::host());

    let io = MemoryIO::for_process(handle);
    assert_eq!(io.bitness(), Bitness::host());
    assert_eq!(io.is_64bit(), cfg!(target_pointer_width = "64"));
}

#[test]
#[cfg(target_os = "linux")]
fn test_linux_main_module_decides_bitness() {
    let mut image = tempfile::NamedTempFile::new().unwrap();
    image.write_all(&[0x7F, b'E', b'L', b'F', 1, 1, 1, 0]).unwrap();

    let handle = ProcessHandle::from_pid(std::process::id()).with_main_module(image.path());
    assert_eq!(detect_bitness(&handle), Bitness::Bit32);

    let backend = PlatformBackend::for_process(handle);
    assert_eq!(backend.bitness(), Bitness::Bit32);
    assert_eq!(backend.platform(), Platform::Linux);
}

#[test]
#[cfg(target_os = "linux")]
fn test_linux_unreadable_module_falls_back() {
    let dir = tempfile::TempDir::new().unwrap();
    let handle = ProcessHandle::from_pid(std::process::id())
        .with_main_module(dir.path().join("missing"));
    assert_eq!(detect_bitness(&handle), bitness::LINUX_FALLBACK);

    let mut garbage = tempfile::NamedTempFile::new().unwrap();
    garbage.write_all(b"#!/bin/sh\n").unwrap();
    let handle = ProcessHandle::from_pid(std::process::id()).with_main_module(garbage.path());
    assert_eq!(detect_bitness(&handle), Bitness::Bit64);
}

#[test]
#[cfg(target_os = "linux")]
fn test_linux_proc_exe_is_used_without_module() {
    let handle = ProcessHandle::from_pid(std::process::id());
    assert!(handle.main_module().is_none());
    assert_eq!(detect_bitness(&handle), Bitness::host());
}

#[test]
fn test_parse_elf_class_rejects_short_or_foreign_headers() {
    assert_eq!(bitness::parse_elf_class(&[0x7F, b'E', b'L', b'F']), None);
    assert_eq!(bitness::parse_elf_class(b"MZ\x90\x00\x03"), None);
    assert_eq!(
        bitness::parse_elf_class(&[0x7F, b'E', b'L', b'F', 2]),
        Some(Bitness::Bit64)
    );
}

#[test]
#[cfg(windows)]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn test_windows_invalid_handle_falls_back() {
    let handle = ProcessHandle::new(0, 0, None);
    if cfg!(target_pointer_width = "64") {
        assert_eq!(detect_bitness(&handle), bitness::WINDOWS_FALLBACK);
    }
}
