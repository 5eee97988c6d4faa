//! What a monitor watches: a raw region, one typed value, or a typed array
//!
//! A shape fixes the snapshot length at construction and turns freshly
//! read bytes into the event type subscribers receive.

use super::event::{ArrayChange, MemoryChange};
use crate::core::types::{Address, MemoryError, MemoryResult, MemoryType};
use std::fmt;
use std::marker::PhantomData;

/// Element layout of a monitored location.
///
/// The location is `element_count` elements of `element_size` bytes each.
/// Every element is read and compared on its own.
pub trait ElementShape: Send + Sync + 'static {
    /// Event emitted when an element changes
    type Event: Clone + Send + Sync + 'static;

    fn element_size(&self) -> usize;

    fn element_count(&self) -> usize {
        1
    }

    /// Total snapshot length in bytes
    fn byte_len(&self) -> usize {
        self.element_size() * self.element_count()
    }

    /// Builds the event for element `index` at `base` now holding `bytes`
    fn change(&self, base: Address, index: usize, bytes: &[u8]) -> Self::Event;
}

/// A raw region of bytes reported as `Vec<u8>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    len: usize,
}

impl Region {
    pub fn new(len: usize) -> MemoryResult<Self> {
        if len == 0 {
            return Err(MemoryError::invalid_argument(
                "region_size",
                "the region size must be a positive value",
            ));
        }
        Ok(Region { len })
    }

    pub fn len(&self) -> usize {
        self.len
    }
}

impl ElementShape for Region {
    type Event = MemoryChange<Vec<u8>>;

    fn element_size(&self) -> usize {
        self.len
    }

    fn change(&self, base: Address, _index: usize, bytes: &[u8]) -> Self::Event {
        MemoryChange {
            address: base,
            value: bytes.to_vec(),
        }
    }
}

/// A single `T`
pub struct Value<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T: MemoryType> Value<T> {
    pub fn new() -> MemoryResult<Self> {
        if T::SIZE == 0 {
            return Err(MemoryError::invalid_argument(
                "T",
                "the monitored type must occupy at least one byte",
            ));
        }
        Ok(Value {
            _marker: PhantomData,
        })
    }
}

impl<T: MemoryType> ElementShape for Value<T> {
    type Event = MemoryChange<T>;

    fn element_size(&self) -> usize {
        T::SIZE
    }

    fn change(&self, base: Address, _index: usize, bytes: &[u8]) -> Self::Event {
        MemoryChange {
            address: base,
            value: T::from_bytes(bytes),
        }
    }
}

impl<T> fmt::Debug for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value<{}>", std::any::type_name::<T>())
    }
}

/// A fixed-length array of `T`, compared and reported per index
pub struct Array<T> {
    len: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T: MemoryType> Array<T> {
    pub fn new(len: usize) -> MemoryResult<Self> {
        if len == 0 {
            return Err(MemoryError::invalid_argument(
                "array_length",
                "the array length must be a positive value",
            ));
        }
        if T::SIZE == 0 {
            return Err(MemoryError::invalid_argument(
                "T",
                "the element type must occupy at least one byte",
            ));
        }
        Ok(Array {
            len,
            _marker: PhantomData,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }
}

impl<T: MemoryType> ElementShape for Array<T> {
    type Event = ArrayChange<T>;

    fn element_size(&self) -> usize {
        T::SIZE
    }

    fn element_count(&self) -> usize {
        self.len
    }

    fn change(&self, base: Address, index: usize, bytes: &[u8]) -> Self::Event {
        ArrayChange {
            address: base,
            index,
            value: T::from_bytes(bytes),
        }
    }
}

impl<T> fmt::Debug for Array<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Array<{}; {}>", std::any::type_name::<T>(), self.len)
    }
}
