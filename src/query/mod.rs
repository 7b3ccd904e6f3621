// Fri Feb 6 2026 - Alex

pub mod address_book;
pub mod candidate;
pub mod engine;
pub mod predicate;

pub use address_book::AddressBook;
pub use candidate::Candidate;
pub use engine::QueryEngine;
pub use predicate::{Bonus, Combine, Predicate, Query, Term};
