// Thu Feb 5 2026 - Alex

use crate::memory::Address;
use indexmap::IndexMap;
use serde::Serialize;

/// Corpus-wide cross-reference tables: which instructions load a given pool
/// value, and which instructions branch or call to a given target.
///
/// Both tables keep their reference lists in ascending address order, and
/// key insertion order follows the first referencing site, so a rebuild
/// over the same bytes reproduces the index exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrossRefIndex {
    literal_refs: IndexMap<u32, Vec<Address>>,
    branch_refs: IndexMap<u32, Vec<Address>>,
}

impl CrossRefIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instructions that load `value` from a literal pool.
    pub fn literal_refs(&self, value: u32) -> &[Address] {
        self.literal_refs.get(&value).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Branch and call sites whose resolved target is `target`.
    pub fn branch_refs(&self, target: u32) -> &[Address] {
        self.branch_refs.get(&target).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sites that reference `value` either way, merged in address order.
    pub fn refs(&self, value: u32) -> Vec<Address> {
        let mut sites: Vec<Address> = self
            .literal_refs(value)
            .iter()
            .chain(self.branch_refs(value).iter())
            .copied()
            .collect();
        sites.sort_unstable();
        sites.dedup();
        sites
    }

    pub fn literal_values(&self) -> impl Iterator<Item = u32> + '_ {
        self.literal_refs.keys().copied()
    }

    pub fn branch_targets(&self) -> impl Iterator<Item = u32> + '_ {
        self.branch_refs.keys().copied()
    }

    pub fn literal_ref_count(&self) -> usize {
        self.literal_refs.values().map(Vec::len).sum()
    }

    pub fn branch_ref_count(&self) -> usize {
        self.branch_refs.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.literal_refs.is_empty() && self.branch_refs.is_empty()
    }

    pub fn record_literal(&mut self, value: u32, site: Address) {
        self.literal_refs.entry(value).or_default().push(site);
    }

    pub fn record_branch(&mut self, target: u32, site: Address) {
        self.branch_refs.entry(target).or_default().push(site);
    }

    /// Appends another index's references after this one's. Chunked builds
    /// must merge in ascending chunk-start order for the address-order
    /// invariant to hold.
    pub fn merge(&mut self, other: CrossRefIndex) {
        for (value, sites) in other.literal_refs {
            self.literal_refs.entry(value).or_default().extend(sites);
        }
        for (target, sites) in other.branch_refs {
            self.branch_refs.entry(target).or_default().extend(sites);
        }
    }
}
