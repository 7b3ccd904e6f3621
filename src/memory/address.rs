// Mon Feb 2 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address {
    value: u32,
}

impl Address {
    pub fn new(value: u32) -> Self {
        Self { value }
    }

    pub fn zero() -> Self {
        Self { value: 0 }
    }

    pub fn as_u32(&self) -> u32 {
        self.value
    }

    pub fn is_null(&self) -> bool {
        self.value == 0
    }

    pub fn is_aligned(&self, alignment: u32) -> bool {
        self.value % alignment == 0
    }

    pub fn align_down(&self, alignment: u32) -> Self {
        Self { value: self.value & !(alignment - 1) }
    }

    pub fn align_up(&self, alignment: u32) -> Self {
        Self { value: (self.value + alignment - 1) & !(alignment - 1) }
    }

    pub fn offset(&self, offset: i32) -> Self {
        Self { value: self.value.wrapping_add_signed(offset) }
    }

    pub fn distance(&self, other: Self) -> i64 {
        self.value as i64 - other.value as i64
    }

    pub fn is_within_range(&self, start: Self, end: Self) -> bool {
        self.value >= start.value && self.value < end.value
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.value)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.value, f)
    }
}

impl fmt::UpperHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.value, f)
    }
}

impl Add<u32> for Address {
    type Output = Self;
    fn add(self, rhs: u32) -> Self::Output {
        Self { value: self.value + rhs }
    }
}

impl Sub<u32> for Address {
    type Output = Self;
    fn sub(self, rhs: u32) -> Self::Output {
        Self { value: self.value - rhs }
    }
}

impl Sub<Address> for Address {
    type Output = i64;
    fn sub(self, rhs: Address) -> Self::Output {
        self.value as i64 - rhs.value as i64
    }
}

impl From<u32> for Address {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<Address> for u32 {
    fn from(addr: Address) -> Self {
        addr.value
    }
}
