//! In-process stand-in for a target address space
//!
//! Backs a contiguous range `[base, base + size)` with a local buffer.
//! Transfers that leave the range fail the same way an OS rejection does,
//! so code driven by it sees the real best-effort behaviour.

use super::RawMemory;
use crate::core::types::{Address, Bitness, MemoryError, MemoryResult, Platform};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A simulated target process memory range
#[derive(Debug)]
pub struct SimulatedMemory {
    base: Address,
    bytes: RwLock<Vec<u8>>,
    bitness: Bitness,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl SimulatedMemory {
    /// Zero-filled range of `size` bytes starting at `base`
    pub fn new(base: Address, size: usize) -> Self {
        Self::from_bytes(base, vec![0u8; size])
    }

    /// Range starting at `base` initialised with `bytes`
    pub fn from_bytes(base: Address, bytes: Vec<u8>) -> Self {
        SimulatedMemory {
            base,
            bytes: RwLock::new(bytes),
            bitness: Bitness::host(),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    /// Reports `bitness` as the target's pointer width
    pub fn with_bitness(mut self, bitness: Bitness) -> Self {
        self.bitness = bitness;
        self
    }

    /// First address of the range
    pub fn base(&self) -> Address {
        self.base
    }

    /// Length of the range in bytes
    pub fn size(&self) -> usize {
        self.bytes.read().len()
    }

    /// Copy of the whole range
    pub fn contents(&self) -> Vec<u8> {
        self.bytes.read().clone()
    }

    /// Number of read transfers served, failed ones included
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::Relaxed)
    }

    /// Number of write transfers served, failed ones included
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    fn span(&self, address: Address, len: usize, total: usize) -> Option<std::ops::Range<usize>> {
        let start = address.as_usize().checked_sub(self.base.as_usize())?;
        let end = start.checked_add(len)?;
        (end <= total).then_some(start..end)
    }
}

impl RawMemory for SimulatedMemory {
    fn read_into(&self, address: Address, buffer: &mut [u8]) -> MemoryResult<usize> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        if buffer.is_empty() {
            return Ok(0);
        }

        let bytes = self.bytes.read();
        let span = self
            .span(address, buffer.len(), bytes.len())
            .ok_or_else(|| MemoryError::read_failed(address, "outside simulated range"))?;
        buffer.copy_from_slice(&bytes[span]);
        Ok(buffer.len())
    }

    fn write_from(&self, address: Address, data: &[u8]) -> MemoryResult<usize> {
        self.writes.fetch_add(1, Ordering::Relaxed);
        if data.is_empty() {
            return Ok(0);
        }

        let mut bytes = self.bytes.write();
        let total = bytes.len();
        let span = self
            .span(address, data.len(), total)
            .ok_or_else(|| MemoryError::write_failed(address, "outside simulated range"))?;
        bytes[span].copy_from_slice(data);
        Ok(data.len())
    }

    fn bitness(&self) -> Bitness {
        self.bitness
    }

    fn platform(&self) -> Platform {
        Platform::Simulated
    }
}
