//! Typed memory I/O on top of a raw backend
//!
//! Every operation here is pure transcoding around one raw transfer. Reads
//! are best-effort: a rejected or short transfer leaves the unread part of
//! the buffer zero-filled and the decoded result reflects that. Writes
//! report success as a `bool`. Nothing in this layer returns an error.

use super::backend::{PlatformBackend, RawMemory};
use crate::core::types::{
    decode_slice, encode_slice, Address, Bitness, MemoryType, Platform, TextEncoding,
};
use crate::process::ProcessHandle;
use tracing::trace;

/// Default byte budget for string reads
pub const DEFAULT_MAX_STRING_LENGTH: usize = 512;

/// Typed reader/writer bound to one target process
#[derive(Debug, Clone)]
pub struct MemoryIO<B: RawMemory = PlatformBackend> {
    backend: B,
    max_string_length: usize,
}

impl MemoryIO<PlatformBackend> {
    /// Binds the host platform's backend to `handle`
    pub fn for_process(handle: ProcessHandle) -> Self {
        MemoryIO::new(PlatformBackend::for_process(handle))
    }
}

impl<B: RawMemory> MemoryIO<B> {
    /// Wraps an existing backend
    pub fn new(backend: B) -> Self {
        MemoryIO {
            backend,
            max_string_length: DEFAULT_MAX_STRING_LENGTH,
        }
    }

    /// Sets the byte budget used by [`read_string`](Self::read_string) and
    /// [`read_string_array`](Self::read_string_array)
    pub fn with_max_string_length(mut self, max_length: usize) -> Self {
        self.max_string_length = max_length;
        self
    }

    /// The underlying backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn max_string_length(&self) -> usize {
        self.max_string_length
    }

    pub fn platform(&self) -> Platform {
        self.backend.platform()
    }

    pub fn bitness(&self) -> Bitness {
        self.backend.bitness()
    }

    pub fn is_64bit(&self) -> bool {
        self.backend.bitness().is_64bit()
    }

    // ---- reads ----

    /// Reads into `buffer`, returning how many bytes arrived (0 on failure)
    pub fn read_into(&self, address: Address, buffer: &mut [u8]) -> usize {
        match self.backend.read_into(address, buffer) {
            Ok(read) => {
                if read < buffer.len() {
                    trace!(%address, requested = buffer.len(), read, "Short read");
                }
                read
            }
            Err(e) => {
                trace!(%address, len = buffer.len(), error = %e, "Read absorbed");
                0
            }
        }
    }

    /// Reads `length` bytes; unread bytes stay zero
    pub fn read_bytes(&self, address: Address, length: usize) -> Vec<u8> {
        let mut buffer = vec![0u8; length];
        self.read_into(address, &mut buffer);
        buffer
    }

    /// Reads one `T` from its exact byte representation
    pub fn read<T: MemoryType>(&self, address: Address) -> T {
        T::from_bytes(&self.read_bytes(address, T::SIZE))
    }

    /// Reads `count` consecutive `T` values in a single transfer
    pub fn read_array<T: MemoryType>(&self, address: Address, count: usize) -> Vec<T> {
        let bytes = self.read_bytes(address, T::SIZE.saturating_mul(count));
        decode_slice(&bytes)
    }

    /// Reads a pointer sized for the target's bitness, zero-extended.
    ///
    /// A 64-bit pointer that does not fit the host's `usize` reads as null.
    pub fn read_pointer(&self, address: Address) -> Address {
        let raw = match self.bitness() {
            Bitness::Bit32 => u64::from(self.read::<u32>(address)),
            Bitness::Bit64 => self.read::<u64>(address),
        };
        usize::try_from(raw)
            .map(Address::new)
            .unwrap_or_else(|_| Address::null())
    }

    /// Reads a null-terminated string within the configured byte budget
    pub fn read_string(&self, address: Address, encoding: TextEncoding) -> String {
        self.read_string_bounded(address, encoding, self.max_string_length)
    }

    /// Reads `max_length` bytes, decodes them and cuts at the first null.
    ///
    /// Without a null inside the budget the whole decoded buffer comes back,
    /// possibly ending mid-character for multi-byte encodings.
    pub fn read_string_bounded(
        &self,
        address: Address,
        encoding: TextEncoding,
        max_length: usize,
    ) -> String {
        let mut text = encoding.decode(&self.read_bytes(address, max_length));
        if let Some(end) = text.find('\0') {
            text.truncate(end);
        }
        text
    }

    /// Reads consecutive null-terminated strings within the configured budget
    pub fn read_string_array(&self, address: Address, encoding: TextEncoding) -> Vec<String> {
        self.read_string_array_bounded(address, encoding, self.max_string_length)
    }

    /// Reads `max_length` bytes, decodes them and splits on nulls.
    ///
    /// The first empty segment (two nulls in a row, or a leading null) ends
    /// the array; it and everything after it are dropped.
    pub fn read_string_array_bounded(
        &self,
        address: Address,
        encoding: TextEncoding,
        max_length: usize,
    ) -> Vec<String> {
        let text = encoding.decode(&self.read_bytes(address, max_length));
        text.split('\0')
            .take_while(|segment| !segment.is_empty())
            .map(str::to_owned)
            .collect()
    }

    // ---- writes ----

    /// Writes exactly `data.len()` bytes; `true` only on a full transfer
    pub fn write_bytes(&self, address: Address, data: &[u8]) -> bool {
        if data.is_empty() {
            return true;
        }
        match self.backend.write_from(address, data) {
            Ok(written) if written == data.len() => true,
            Ok(written) => {
                trace!(%address, requested = data.len(), written, "Short write");
                false
            }
            Err(e) => {
                trace!(%address, len = data.len(), error = %e, "Write absorbed");
                false
            }
        }
    }

    /// Writes one `T` in its exact byte representation
    pub fn write<T: MemoryType>(&self, address: Address, value: T) -> bool {
        self.write_bytes(address, &value.to_bytes())
    }

    /// Writes all `values` back to back in a single transfer
    pub fn write_array<T: MemoryType>(&self, address: Address, values: &[T]) -> bool {
        self.write_bytes(address, &encode_slice(values))
    }

    /// Writes `text` followed by one null terminator
    pub fn write_string(&self, address: Address, text: &str, encoding: TextEncoding) -> bool {
        self.write_bytes(address, &encoding.encode_terminated(text))
    }

    /// Writes every string null-terminated, concatenated, in one transfer
    pub fn write_string_array<S: AsRef<str>>(
        &self,
        address: Address,
        texts: &[S],
        encoding: TextEncoding,
    ) -> bool {
        let buffer: Vec<u8> = texts
            .iter()
            .flat_map(|text| encoding.encode_terminated(text.as_ref()))
            .collect();
        self.write_bytes(address, &buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::backend::SimulatedMemory;
    use pretty_assertions::assert_eq;

    const BASE: Address = Address::new(0x10_000);

    fn io(size: usize) -> MemoryIO<SimulatedMemory> {
        MemoryIO::new(SimulatedMemory::new(BASE, size))
    }

    #[test]
    fn test_typed_round_trip() {
        let io = io(64);
        assert!(io.write(BASE, 0xDEAD_BEEFu32));
        assert_eq!(io.read::<u32>(BASE), 0xDEAD_BEEF);

        assert!(io.write(BASE.add(8), -1.25f64));
        assert_eq!(io.read::<f64>(BASE.add(8)), -1.25);
    }

    #[test]
    fn test_array_is_one_transfer() {
        let io = io(64);
        assert!(io.write_array(BASE, &[1u16, 2, 3, 4]));
        assert_eq!(io.backend().write_count(), 1);

        assert_eq!(io.read_array::<u16>(BASE, 4), vec![1, 2, 3, 4]);
        assert_eq!(io.backend().read_count(), 1);
        assert!(io.read_array::<u16>(BASE, 0).is_empty());
    }

    #[test]
    fn test_failed_read_is_zero_filled() {
        let io = io(16);
        assert_eq!(io.read_bytes(Address::new(0x10), 4), vec![0; 4]);
        assert_eq!(io.read::<u64>(Address::new(0x10)), 0);
        assert_eq!(io.read_string(Address::new(0x10), TextEncoding::Utf8), "");
    }

    #[test]
    fn test_failed_write_reports_false() {
        let io = io(4);
        assert!(!io.write(BASE.add(2), 0u32));
        assert!(io.write_bytes(Address::null(), &[]));
    }

    #[test]
    fn test_read_pointer_respects_bitness() {
        let memory = SimulatedMemory::new(BASE, 16).with_bitness(Bitness::Bit32);
        let io = MemoryIO::new(memory);
        assert!(io.write_bytes(BASE, &[0xFF; 8]));
        assert!(io.write(BASE, 0x1234_5678u32));
        assert_eq!(io.read_pointer(BASE), Address::new(0x1234_5678));

        let io = MemoryIO::new(SimulatedMemory::new(BASE, 16).with_bitness(Bitness::Bit64));
        assert!(io.write(BASE, 0x4000u64));
        assert_eq!(io.read_pointer(BASE), Address::new(0x4000));
    }

    #[test]
    fn test_read_string_stops_at_null() {
        let io = io(32);
        assert!(io.write_bytes(BASE, b"hello\0world\0"));
        assert_eq!(io.read_string_bounded(BASE, TextEncoding::Utf8, 12), "hello");
    }

    #[test]
    fn test_read_string_without_null_is_unterminated() {
        let io = io(8);
        assert!(io.write_bytes(BASE, b"abcdefgh"));
        assert_eq!(io.read_string_bounded(BASE, TextEncoding::Utf8, 8), "abcdefgh");
        assert_eq!(io.read_string_bounded(BASE, TextEncoding::Utf8, 3), "abc");
    }

    #[test]
    fn test_read_wide_string() {
        let io = io(32);
        assert!(io.write_string(BASE, "wide", TextEncoding::Utf16Le));
        assert_eq!(io.read_string_bounded(BASE, TextEncoding::Utf16Le, 32), "wide");
    }

    #[test]
    fn test_read_string_array_stops_at_empty_segment() {
        let io = io(32);
        assert!(io.write_bytes(BASE, b"one\0two\0\0three\0"));
        assert_eq!(
            io.read_string_array_bounded(BASE, TextEncoding::Utf8, 16),
            vec!["one".to_string(), "two".to_string()]
        );
    }

    #[test]
    fn test_read_string_array_without_terminator() {
        let io = io(7);
        assert!(io.write_bytes(BASE, b"ab\0cdef"));
        assert_eq!(
            io.read_string_array_bounded(BASE, TextEncoding::Utf8, 7),
            vec!["ab".to_string(), "cdef".to_string()]
        );

        let zeroed = MemoryIO::new(SimulatedMemory::new(BASE, 8));
        assert!(zeroed
            .read_string_array_bounded(BASE, TextEncoding::Utf8, 8)
            .is_empty());
    }

    #[test]
    fn test_write_string_array_layout() {
        let io = io(DEFAULT_MAX_STRING_LENGTH);
        assert!(io.write_string_array(BASE, &["ab", "c"], TextEncoding::Utf8));
        assert_eq!(io.read_bytes(BASE, 6), b"ab\0c\0\0".to_vec());
        assert_eq!(io.backend().write_count(), 1);

        assert_eq!(
            io.read_string_array(BASE, TextEncoding::Utf8),
            vec!["ab".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn test_max_string_length_setting() {
        let io = io(1024).with_max_string_length(4);
        assert_eq!(io.max_string_length(), 4);
        assert!(io.write_bytes(BASE, b"abcdefgh\0"));
        assert_eq!(io.read_string(BASE, TextEncoding::Ascii), "abcd");
    }
}
