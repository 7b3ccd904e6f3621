// Mon Feb 2 2026 - Alex

use crate::memory::Address;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryError {
    #[error("read of {len} bytes at file offset 0x{offset:x} runs past the end of the image")]
    OutOfBounds { offset: u32, len: u32 },
    #[error("virtual address {0} is not mapped")]
    NotMapped(Address),
}
