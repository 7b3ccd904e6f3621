// Fri Feb 6 2026 - Alex

use crate::memory::Address;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Caller-supplied labels for known addresses, handed into query and report
/// calls as plain data. The engine never keeps one of these as shared state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressBook {
    entries: IndexMap<u32, String>,
}

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, addr: Address, label: &str) {
        self.entries.insert(addr.as_u32(), label.to_string());
    }

    pub fn label(&self, addr: Address) -> Option<&str> {
        self.entries.get(&addr.as_u32()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Address, &str)> {
        self.entries
            .iter()
            .map(|(addr, label)| (Address::new(*addr), label.as_str()))
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
