// Thu Feb 5 2026 - Alex

pub mod builder;
pub mod index;

pub use builder::IndexBuilder;
pub use index::CrossRefIndex;
