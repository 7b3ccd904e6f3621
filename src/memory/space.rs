// Mon Feb 2 2026 - Alex

use crate::memory::{Address, AddressRange, MemoryError};

/// An immutable ROM image mapped at a fixed base address.
///
/// All byte access in the engine goes through this type so that bounds
/// checking and endianness live in exactly one place. Reads are little-endian.
pub struct AddressSpace {
    bytes: Vec<u8>,
    base: Address,
}

impl AddressSpace {
    pub fn new(bytes: Vec<u8>, base: Address) -> Self {
        Self { bytes, base }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn base(&self) -> Address {
        self.base
    }

    /// The mapped virtual range `[base, base + len)`.
    pub fn range(&self) -> AddressRange {
        AddressRange::from_start_size(self.base, self.bytes.len() as u32)
    }

    pub fn to_virtual(&self, file_offset: u32) -> Address {
        self.base + file_offset
    }

    pub fn to_file_offset(&self, addr: Address) -> Result<u32, MemoryError> {
        if !self.range().contains(addr) {
            return Err(MemoryError::NotMapped(addr));
        }
        Ok(addr.as_u32() - self.base.as_u32())
    }

    pub fn read_u16(&self, file_offset: u32) -> Result<u16, MemoryError> {
        let bytes = self.read_exact(file_offset, 2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32(&self, file_offset: u32) -> Result<u32, MemoryError> {
        let bytes = self.read_exact(file_offset, 4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_u16_at(&self, addr: Address) -> Result<u16, MemoryError> {
        self.read_u16(self.to_file_offset(addr)?)
    }

    pub fn read_u32_at(&self, addr: Address) -> Result<u32, MemoryError> {
        self.read_u32(self.to_file_offset(addr)?)
    }

    fn read_exact(&self, file_offset: u32, len: u32) -> Result<&[u8], MemoryError> {
        let start = file_offset as usize;
        let end = start.checked_add(len as usize).filter(|&e| e <= self.bytes.len());
        match end {
            Some(end) => Ok(&self.bytes[start..end]),
            None => Err(MemoryError::OutOfBounds { offset: file_offset, len }),
        }
    }
}
