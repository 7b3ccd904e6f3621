// Fri Feb 6 2026 - Alex
//
// agbscan: locates routines and globals in 32-bit ARM/THUMB ROM images by
// decoding instruction shapes, resolving literal pools and branch targets,
// and ranking cross-reference evidence. The image loader and any report
// formatting live with the caller; this crate is the analysis core.

pub mod analysis;
pub mod decode;
pub mod memory;
pub mod query;
pub mod xref;

pub use analysis::{BoundaryError, BoundaryScanner, Function};
pub use decode::{decode, resolve_literal, DecodeError, Instruction, Kind, ResolvedLiteral};
pub use memory::{Address, AddressRange, AddressSpace, MemoryError};
pub use query::{AddressBook, Candidate, Predicate, Query, QueryEngine, Term};
pub use xref::{CrossRefIndex, IndexBuilder};
