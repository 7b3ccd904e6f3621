// Tue Feb 3 2026 - Alex

use crate::decode::error::DecodeError;
use crate::decode::instruction::{Instruction, Kind};
use crate::memory::{Address, AddressSpace};
use serde::Serialize;

/// A pc-relative load resolved to the pool word it reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedLiteral {
    pub instruction_address: Address,
    pub pool_address: Address,
    pub value: u32,
}

/// The pool slot a pc-relative load addresses. The pc value the processor
/// uses here is `(address + 4) & !2`, word-aligned two behind the naive
/// pipeline offset.
pub fn pool_address(insn: &Instruction) -> Result<Address, DecodeError> {
    match insn.kind() {
        Kind::LdrPc { imm, .. } => {
            let pc = (insn.address().as_u32() + 4) & !2;
            Ok(Address::new(pc + imm as u32 * 4))
        }
        _ => Err(DecodeError::NotPcRelativeLoad(insn.address())),
    }
}

/// Fetches the 32-bit word a pc-relative load reads. Short scan windows
/// routinely stop before their pool, so an unreadable pool is an expected,
/// reportable outcome.
pub fn resolve_literal(
    space: &AddressSpace,
    insn: &Instruction,
) -> Result<ResolvedLiteral, DecodeError> {
    let pool = pool_address(insn)?;
    let value = space.read_u32_at(pool).map_err(|_| DecodeError::PoolUnavailable {
        load: insn.address(),
        pool,
    })?;
    Ok(ResolvedLiteral {
        instruction_address: insn.address(),
        pool_address: pool,
        value,
    })
}
