// Tue Feb 3 2026 - Alex

use crate::memory::Address;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("code unit at file offset 0x{0:x} runs past the end of the image")]
    OutOfBounds(u32),
    #[error("long branch half at {0} has no partner unit in range")]
    Incomplete(Address),
    #[error("instruction at {0} is not a pc-relative load")]
    NotPcRelativeLoad(Address),
    #[error("literal pool word at {pool} for the load at {load} is unreadable")]
    PoolUnavailable { load: Address, pool: Address },
}
