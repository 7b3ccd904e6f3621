// Tue Feb 3 2026 - Alex

pub mod decoder;
pub mod error;
pub mod instruction;
pub mod literal;
pub mod registers;

pub use decoder::decode;
pub use error::DecodeError;
pub use instruction::{AluOp, HiOp, ImmOp, Instruction, Kind, RawUnits, ShiftOp, SignedOp};
pub use literal::{pool_address, resolve_literal, ResolvedLiteral};
pub use registers::{Condition, RegisterList};
