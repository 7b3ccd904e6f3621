// Wed Feb 4 2026 - Alex

pub mod boundary;
pub mod function;

pub use boundary::{BoundaryError, BoundaryScanner};
pub use function::Function;
