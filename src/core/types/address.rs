//! Target-process address wrapper with hex parsing

use super::error::{MemoryError, MemoryResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An address inside the target process.
///
/// Zero is the "no target" sentinel: monitors skip or stop on it and
/// never issue a transfer against it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Address(pub usize);

impl Address {
    /// Creates a new address from a usize value
    pub const fn new(value: usize) -> Self {
        Address(value)
    }

    /// Creates the null address (0x0)
    pub const fn null() -> Self {
        Address(0)
    }

    /// Checks if the address is the null sentinel
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Adds a signed byte offset, wrapping on overflow like pointer arithmetic
    /// in the target would
    pub const fn offset(&self, offset: isize) -> Self {
        Address(self.0.wrapping_add_signed(offset))
    }

    /// Adds an unsigned byte count, wrapping on overflow
    pub const fn add(&self, bytes: usize) -> Self {
        Address(self.0.wrapping_add(bytes))
    }

    /// Address of element `index` in an array of `element_size`-byte items
    /// starting here
    pub const fn element(&self, index: usize, element_size: usize) -> Self {
        self.add(index.wrapping_mul(element_size))
    }

    /// Returns the raw usize value
    pub const fn as_usize(&self) -> usize {
        self.0
    }

    /// Returns the raw value widened to u64
    pub const fn as_u64(&self) -> u64 {
        self.0 as u64
    }
}

/// Parses the `0x`-prefixed hex form produced by `Display`
impl FromStr for Address {
    type Err = MemoryError;

    fn from_str(s: &str) -> MemoryResult<Self> {
        let s = s.trim();

        s.strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .and_then(|hex| usize::from_str_radix(hex, 16).ok())
            .map(Address::new)
            .ok_or_else(|| MemoryError::InvalidAddress(s.to_string()))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl fmt::UpperHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

impl From<usize> for Address {
    fn from(value: usize) -> Self {
        Address::new(value)
    }
}

impl From<Address> for usize {
    fn from(address: Address) -> Self {
        address.0
    }
}
