// Mon Feb 2 2026 - Alex

use crate::memory::Address;
use std::fmt;

/// Half-open virtual address range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressRange {
    start: Address,
    end: Address,
}

impl AddressRange {
    pub fn new(start: Address, end: Address) -> Self {
        assert!(end.as_u32() >= start.as_u32(), "end must be >= start");
        Self { start, end }
    }

    pub fn from_start_size(start: Address, size: u32) -> Self {
        Self::new(start, start + size)
    }

    pub fn start(&self) -> Address {
        self.start
    }

    pub fn end(&self) -> Address {
        self.end
    }

    pub fn size(&self) -> u32 {
        self.end.as_u32() - self.start.as_u32()
    }

    pub fn contains(&self, addr: Address) -> bool {
        addr.is_within_range(self.start, self.end)
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        self.start.as_u32() < other.end.as_u32() && self.end.as_u32() > other.start.as_u32()
    }

    pub fn intersects(&self, other: &Self) -> Option<Self> {
        let start = Address::new(self.start.as_u32().max(other.start.as_u32()));
        let end = Address::new(self.end.as_u32().min(other.end.as_u32()));
        if start.as_u32() < end.as_u32() {
            Some(Self::new(start, end))
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start.as_u32() >= self.end.as_u32()
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
