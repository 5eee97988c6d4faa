//! Fixed-size value types that can be transcoded to and from target memory
//!
//! Every implementation has an exact, padding-free byte layout in native
//! byte order. Callers are responsible for picking types whose layout
//! matches the target process's architecture (e.g. `u32` rather than
//! `usize` when inspecting a 32-bit target from a 64-bit host).

use super::Address;

/// A plain-data value with a fixed byte representation.
///
/// `from_bytes` is always handed exactly `SIZE` bytes.
pub trait MemoryType: Copy + Send + Sync + 'static {
    /// Number of bytes the value occupies in target memory
    const SIZE: usize;

    /// Decodes a value from exactly `SIZE` bytes
    fn from_bytes(bytes: &[u8]) -> Self;

    /// Encodes the value into exactly `SIZE` bytes
    fn write_bytes(&self, out: &mut [u8]);

    /// Encodes the value into a fresh buffer
    fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![0u8; Self::SIZE];
        self.write_bytes(&mut out);
        out
    }
}

macro_rules! impl_memory_type_for_primitive {
    ($($ty:ty),* $(,)?) => {
        $(
            impl MemoryType for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                fn from_bytes(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$ty>()];
                    raw.copy_from_slice(&bytes[..Self::SIZE]);
                    <$ty>::from_ne_bytes(raw)
                }

                fn write_bytes(&self, out: &mut [u8]) {
                    out[..Self::SIZE].copy_from_slice(&self.to_ne_bytes());
                }
            }
        )*
    };
}

impl_memory_type_for_primitive!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64,
);

impl MemoryType for bool {
    const SIZE: usize = 1;

    fn from_bytes(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }

    fn write_bytes(&self, out: &mut [u8]) {
        out[0] = u8::from(*self);
    }
}

impl MemoryType for Address {
    const SIZE: usize = std::mem::size_of::<usize>();

    fn from_bytes(bytes: &[u8]) -> Self {
        Address::new(usize::from_bytes(bytes))
    }

    fn write_bytes(&self, out: &mut [u8]) {
        self.as_usize().write_bytes(out);
    }
}

impl<T: MemoryType + Default, const N: usize> MemoryType for [T; N] {
    const SIZE: usize = T::SIZE * N;

    fn from_bytes(bytes: &[u8]) -> Self {
        let mut values = [T::default(); N];
        for (value, chunk) in values.iter_mut().zip(bytes.chunks_exact(T::SIZE)) {
            *value = T::from_bytes(chunk);
        }
        values
    }

    fn write_bytes(&self, out: &mut [u8]) {
        for (value, chunk) in self.iter().zip(out.chunks_exact_mut(T::SIZE)) {
            value.write_bytes(chunk);
        }
    }
}

/// Decodes a contiguous buffer into as many whole `T` values as it holds
pub fn decode_slice<T: MemoryType>(bytes: &[u8]) -> Vec<T> {
    if T::SIZE == 0 {
        return Vec::new();
    }
    bytes.chunks_exact(T::SIZE).map(T::from_bytes).collect()
}

/// Encodes a slice of values back to back with no padding
pub fn encode_slice<T: MemoryType>(values: &[T]) -> Vec<u8> {
    let mut out = vec![0u8; T::SIZE * values.len()];
    if T::SIZE > 0 {
        for (value, chunk) in values.iter().zip(out.chunks_exact_mut(T::SIZE)) {
            value.write_bytes(chunk);
        }
    }
    out
}
