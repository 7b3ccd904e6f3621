// Wed Feb 4 2026 - Alex

use crate::decode::Instruction;
use crate::memory::{Address, AddressRange};

/// A routine inferred around a seed address. Both boundaries are heuristic
/// guesses; either scan can come up empty, and a partial result is still a
/// valid one — callers decide whether it is useful.
#[derive(Debug, Clone)]
pub struct Function {
    start_address: Option<Address>,
    end_address: Option<Address>,
    instructions: Vec<Instruction>,
}

impl Function {
    pub fn new(
        start_address: Option<Address>,
        end_address: Option<Address>,
        instructions: Vec<Instruction>,
    ) -> Self {
        Self { start_address, end_address, instructions }
    }

    pub fn start_address(&self) -> Option<Address> {
        self.start_address
    }

    pub fn end_address(&self) -> Option<Address> {
        self.end_address
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn is_complete(&self) -> bool {
        self.start_address.is_some() && self.end_address.is_some()
    }

    /// The body as a half-open range, through the end of the terminator.
    /// Only available when both boundary scans succeeded.
    pub fn body_range(&self) -> Option<AddressRange> {
        let start = self.start_address?;
        let end = self.end_address?;
        let terminator_len = self
            .instructions
            .last()
            .filter(|insn| insn.address() == end)
            .map(|insn| insn.byte_len())
            .unwrap_or(2);
        Some(AddressRange::new(start, end + terminator_len))
    }

    pub fn contains(&self, addr: Address) -> bool {
        self.body_range().map(|range| range.contains(addr)).unwrap_or(false)
    }
}
