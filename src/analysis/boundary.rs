// Wed Feb 4 2026 - Alex

use crate::analysis::function::Function;
use crate::decode::{decode, DecodeError};
use crate::memory::{Address, AddressRange, AddressSpace};
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryError {
    #[error("no push writing lr within {lookback} bytes behind the seed")]
    NoEntryFound { lookback: u32 },
    #[error("no return sequence within {lookahead} bytes past the seed")]
    NoExitFound { lookahead: u32 },
}

/// Infers routine boundaries around a seed address with the prologue and
/// epilogue heuristics. An exhausted scan reports a named failure instead of
/// falling back to the seed, so callers can tell a real boundary from a
/// guess that never landed.
pub struct BoundaryScanner<'a> {
    space: &'a AddressSpace,
    max_lookback: u32,
    max_lookahead: u32,
}

impl<'a> BoundaryScanner<'a> {
    pub fn new(space: &'a AddressSpace) -> Self {
        Self {
            space,
            max_lookback: 0x400,
            max_lookahead: 0x1000,
        }
    }

    pub fn with_max_lookback(mut self, bytes: u32) -> Self {
        self.max_lookback = bytes;
        self
    }

    pub fn with_max_lookahead(mut self, bytes: u32) -> Self {
        self.max_lookahead = bytes;
        self
    }

    pub fn max_lookback(&self) -> u32 {
        self.max_lookback
    }

    pub fn max_lookahead(&self) -> u32 {
        self.max_lookahead
    }

    /// Steps backward one unit at a time until a push-with-lr shape turns up.
    pub fn find_entry(&self, seed: Address) -> Result<Address, BoundaryError> {
        let mut distance: u32 = 0;
        while distance <= self.max_lookback {
            let cursor = seed.offset(-(distance as i32));
            let offset = match self.space.to_file_offset(cursor) {
                Ok(offset) => offset,
                // fell off the front of the image
                Err(_) => break,
            };
            if let Ok(insn) = decode(self.space, offset) {
                if insn.is_push_with_lr() {
                    return Ok(cursor);
                }
            }
            distance += 2;
        }
        Err(BoundaryError::NoEntryFound { lookback: self.max_lookback })
    }

    /// Walks forward instruction by instruction until a pop-with-pc or
    /// `bx lr` turns up. Branch-with-link pairs are consumed whole so the
    /// cursor never lands on the low half.
    pub fn find_exit(&self, seed: Address) -> Result<Address, BoundaryError> {
        let mut cursor = seed;
        while (cursor - seed) as u32 <= self.max_lookahead {
            let offset = match self.space.to_file_offset(cursor) {
                Ok(offset) => offset,
                Err(_) => break,
            };
            match decode(self.space, offset) {
                Ok(insn) => {
                    if insn.is_return() {
                        return Ok(cursor);
                    }
                    cursor = insn.next_address();
                }
                // a lone branch-link half is not a terminator; step past it
                Err(DecodeError::Incomplete(_)) => cursor = cursor + 2,
                Err(_) => break,
            }
        }
        Err(BoundaryError::NoExitFound { lookahead: self.max_lookahead })
    }

    /// The inferred body of the routine starting at `start`, through the end
    /// of its terminator.
    pub fn body_range(&self, start: Address) -> Result<AddressRange, BoundaryError> {
        let exit = self.find_exit(start)?;
        let terminator_len = self
            .space
            .to_file_offset(exit)
            .ok()
            .and_then(|offset| decode(self.space, offset).ok())
            .map(|insn| insn.byte_len())
            .unwrap_or(2);
        Ok(AddressRange::new(start, exit + terminator_len))
    }

    /// Runs both independent boundary scans and collects the body. A scan
    /// that comes up empty leaves its side of the result unset.
    pub fn scan(&self, seed: Address) -> Function {
        let start = self.find_entry(seed).ok();
        let end = self.find_exit(seed).ok();
        log::debug!(
            "boundary scan at {}: start={:?} end={:?}",
            seed,
            start.map(|a| a.to_string()),
            end.map(|a| a.to_string()),
        );

        let begin = start.unwrap_or(seed);
        let mut instructions = Vec::new();
        let mut cursor = begin;
        loop {
            let in_bounds = match end {
                Some(end) => cursor <= end,
                None => (cursor - begin) as u32 <= self.max_lookahead,
            };
            if !in_bounds {
                break;
            }
            let offset = match self.space.to_file_offset(cursor) {
                Ok(offset) => offset,
                Err(_) => break,
            };
            match decode(self.space, offset) {
                Ok(insn) => {
                    cursor = insn.next_address();
                    instructions.push(insn);
                }
                Err(DecodeError::Incomplete(_)) => cursor = cursor + 2,
                Err(_) => break,
            }
        }
        Function::new(start, end, instructions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::Kind;

    fn space_with_units(units: &[u16], base: u32) -> AddressSpace {
        let mut bytes = Vec::with_capacity(units.len() * 2);
        for unit in units {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        AddressSpace::new(bytes, Address::new(base))
    }

    const BASE: u32 = 0x0800_0000;

    // push {r4,lr}; mov r0, #5; bl +4; mov r1, #0; pop {r4,pc}
    fn routine() -> Vec<u16> {
        vec![
            0x46c0, // filler ahead of the routine
            0xb510, // 0x08000002
            0x2005, // 0x08000004
            0xf000, 0xf800, // 0x08000006 bl
            0x2100, // 0x0800000a
            0xbd10, // 0x0800000c
            0x46c0,
        ]
    }

    #[test]
    fn test_finds_both_boundaries_from_a_body_seed() {
        let space = space_with_units(&routine(), BASE);
        let scanner = BoundaryScanner::new(&space);
        let function = scanner.scan(Address::new(BASE + 0xa));
        assert_eq!(function.start_address(), Some(Address::new(BASE + 0x2)));
        assert_eq!(function.end_address(), Some(Address::new(BASE + 0xc)));
        assert!(function.is_complete());

        let range = function.body_range().unwrap();
        assert_eq!(range.start().as_u32(), BASE + 0x2);
        assert_eq!(range.end().as_u32(), BASE + 0xe);
    }

    #[test]
    fn test_forward_scan_steps_over_branch_link_pairs() {
        let space = space_with_units(&routine(), BASE);
        let scanner = BoundaryScanner::new(&space);
        let function = scanner.scan(Address::new(BASE + 0x6));
        assert_eq!(function.end_address(), Some(Address::new(BASE + 0xc)));

        let calls: Vec<_> = function
            .instructions()
            .iter()
            .filter(|insn| insn.is_call())
            .collect();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].address(), Address::new(BASE + 0x6));
        // the low half never shows up as its own instruction
        assert!(function
            .instructions()
            .iter()
            .all(|insn| insn.address() != Address::new(BASE + 0x8)));
    }

    #[test]
    fn test_missing_entry_is_an_error_not_the_seed() {
        let space = space_with_units(&[0x46c0; 0x40], BASE);
        let scanner = BoundaryScanner::new(&space).with_max_lookback(0x20);
        let seed = Address::new(BASE + 0x30);
        assert_eq!(
            scanner.find_entry(seed),
            Err(BoundaryError::NoEntryFound { lookback: 0x20 })
        );
        let function = scanner.scan(seed);
        assert_eq!(function.start_address(), None);
    }

    #[test]
    fn test_missing_exit_is_an_error() {
        let space = space_with_units(&[0x46c0; 0x40], BASE);
        let scanner = BoundaryScanner::new(&space).with_max_lookahead(0x20);
        assert_eq!(
            scanner.find_exit(Address::new(BASE)),
            Err(BoundaryError::NoExitFound { lookahead: 0x20 })
        );
    }

    #[test]
    fn test_bx_lr_terminates() {
        let space = space_with_units(&[0xb500, 0x2001, 0x4770], BASE);
        let scanner = BoundaryScanner::new(&space);
        assert_eq!(scanner.find_exit(Address::new(BASE)), Ok(Address::new(BASE + 4)));

        let function = scanner.scan(Address::new(BASE + 2));
        assert!(matches!(
            function.instructions().last().unwrap().kind(),
            Kind::HiRegOp { .. }
        ));
    }

    #[test]
    fn test_scan_below_image_start_stops_cleanly() {
        let space = space_with_units(&[0x46c0, 0x46c0], BASE);
        let scanner = BoundaryScanner::new(&space).with_max_lookback(0x1000);
        assert_eq!(
            scanner.find_entry(Address::new(BASE + 2)),
            Err(BoundaryError::NoEntryFound { lookback: 0x1000 })
        );
    }
}
