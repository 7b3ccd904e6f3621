// Mon Feb 2 2026 - Alex

pub mod address;
pub mod error;
pub mod range;
pub mod space;

pub use address::Address;
pub use error::MemoryError;
pub use range::AddressRange;
pub use space::AddressSpace;
