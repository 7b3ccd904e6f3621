// Fri Feb 6 2026 - Alex

use crate::memory::Address;
use serde::{Deserialize, Serialize};

/// One scored answer to a query. Candidates are query-time values only;
/// nothing persists them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub address: Address,
    pub score: u32,
    pub evidence: Vec<String>,
    pub label: Option<String>,
}

impl Candidate {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            score: 0,
            evidence: Vec::new(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    pub fn add_evidence(&mut self, name: &str, points: u32) {
        self.evidence.push(name.to_string());
        self.score += points;
    }

    pub fn satisfies(&self, name: &str) -> bool {
        self.evidence.iter().any(|entry| entry == name)
    }
}
