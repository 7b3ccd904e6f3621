// Fri Feb 6 2026 - Alex

use crate::analysis::BoundaryScanner;
use crate::memory::{Address, AddressRange, AddressSpace};
use crate::query::address_book::AddressBook;
use crate::query::candidate::Candidate;
use crate::query::predicate::{Combine, Predicate, Query, Term};
use crate::xref::CrossRefIndex;
use std::collections::BTreeSet;

/// Evaluates predicate compositions against a built index.
///
/// Candidate discovery starts from the index: every site referencing a value
/// named by the query seeds a candidate at its inferred routine entry (or at
/// the site itself when the entry scan comes up empty — that is reference
/// data sitting outside any routine, still worth surfacing). Results are
/// ordered by descending score, ties by ascending address, so a query is
/// reproducible no matter how the evaluation interleaved.
pub struct QueryEngine<'a> {
    index: &'a CrossRefIndex,
    scanner: BoundaryScanner<'a>,
}

impl<'a> QueryEngine<'a> {
    pub fn new(space: &'a AddressSpace, index: &'a CrossRefIndex) -> Self {
        Self {
            index,
            scanner: BoundaryScanner::new(space),
        }
    }

    /// Replaces the default boundary scanner, e.g. to widen the entry
    /// lookback for large routines.
    pub fn with_scanner(mut self, scanner: BoundaryScanner<'a>) -> Self {
        self.scanner = scanner;
        self
    }

    pub fn run(&self, query: &Query) -> Vec<Candidate> {
        self.run_labeled(query, &AddressBook::new())
    }

    pub fn run_labeled(&self, query: &Query, book: &AddressBook) -> Vec<Candidate> {
        let mut candidates = Vec::new();
        for anchor in self.discover_anchors(query) {
            let body = self.body_for(anchor);
            let mut candidate = Candidate::new(anchor);
            if let Some(label) = book.label(anchor) {
                candidate.label = Some(label.to_string());
            }

            let mut satisfied = 0usize;
            for term in query.terms() {
                if self.eval_term(term, body, &mut candidate) {
                    satisfied += 1;
                }
            }
            let keep = match query.combine() {
                Combine::All => satisfied == query.terms().len() && !query.terms().is_empty(),
                Combine::Any => satisfied > 0,
            };
            if keep {
                candidates.push(candidate);
            }
        }

        candidates.sort_by(|a, b| {
            b.score.cmp(&a.score).then_with(|| a.address.cmp(&b.address))
        });
        log::debug!("query produced {} candidate(s)", candidates.len());
        candidates
    }

    fn discover_anchors(&self, query: &Query) -> BTreeSet<Address> {
        let mut anchors = BTreeSet::new();
        for term in query.terms() {
            let sites: Vec<Address> = match term.predicate() {
                Predicate::LoadsLiteral { value } => self.index.literal_refs(value).to_vec(),
                Predicate::CallsTarget { target } => self.index.branch_refs(target).to_vec(),
                Predicate::RefNear { value, .. } => self.index.refs(value),
            };
            for site in sites {
                let anchor = match self.scanner.find_entry(site) {
                    Ok(entry) => entry,
                    Err(err) => {
                        log::debug!("site {} has no routine entry ({}); anchoring in place", site, err);
                        site
                    }
                };
                anchors.insert(anchor);
            }
        }
        anchors
    }

    fn body_for(&self, anchor: Address) -> AddressRange {
        self.scanner.body_range(anchor).unwrap_or_else(|_| {
            AddressRange::from_start_size(anchor, self.scanner.max_lookahead())
        })
    }

    fn eval_term(&self, term: &Term, body: AddressRange, candidate: &mut Candidate) -> bool {
        match term.predicate() {
            Predicate::LoadsLiteral { value } => {
                self.eval_contained(term, body, self.index.literal_refs(value), candidate)
            }
            Predicate::CallsTarget { target } => {
                self.eval_contained(term, body, self.index.branch_refs(target), candidate)
            }
            Predicate::RefNear { value, other, radius } => {
                let near: Vec<Address> = self
                    .index
                    .refs(value)
                    .into_iter()
                    .filter(|site| body.contains(*site))
                    .collect();
                let far = self.index.refs(other);
                let best = near
                    .iter()
                    .flat_map(|a| far.iter().map(move |b| (*a - *b).unsigned_abs()))
                    .min();
                match best {
                    Some(distance) if distance <= radius as u64 => {
                        candidate.add_evidence(term.predicate().name(), term.points());
                        if let Some(bonus) = term.bonus() {
                            if distance <= bonus.within as u64 {
                                candidate.add_evidence(&bonus.name, bonus.points);
                            }
                        }
                        true
                    }
                    _ => false,
                }
            }
        }
    }

    fn eval_contained(
        &self,
        term: &Term,
        body: AddressRange,
        sites: &[Address],
        candidate: &mut Candidate,
    ) -> bool {
        let hit = sites.iter().find(|site| body.contains(**site));
        match hit {
            Some(site) => {
                candidate.add_evidence(term.predicate().name(), term.points());
                if let Some(bonus) = term.bonus() {
                    if (*site - body.start()) as u64 <= bonus.within as u64 {
                        candidate.add_evidence(&bonus.name, bonus.points);
                    }
                }
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xref::IndexBuilder;

    const BASE: u32 = 0x0800_0000;
    const LITERAL: u32 = 0x0300_1340;
    const HELPER: u32 = BASE + 0x30;

    // routine A at +0x00 loads LITERAL and calls the helper at +0x30;
    // routine B at +0x18 only loads LITERAL; both pools inline
    fn corpus() -> AddressSpace {
        let units: Vec<u16> = vec![
            0xb510, // 0x00  A: push {r4,lr}
            0x4803, // 0x02  ldr r0, [pc] -> 0x10
            0xf000, 0xf814, // 0x04  bl 0x08000030
            0xbd10, // 0x08  pop {r4,pc}
            0x46c0, 0x46c0, 0x46c0, // 0x0a..0x0e
            0x1340, 0x0300, // 0x10  pool: LITERAL
            0x46c0, 0x46c0, // 0x14..0x16
            0xb510, // 0x18  B: push {r4,lr}
            0x4901, // 0x1a  ldr r1, [pc] -> 0x20
            0xbd10, // 0x1c  pop {r4,pc}
            0x46c0, // 0x1e
            0x1340, 0x0300, // 0x20  pool: LITERAL
            0x46c0, 0x46c0, 0x46c0, 0x46c0, 0x46c0, 0x46c0, // 0x24..0x2e
            0xb500, // 0x30  helper: push {lr}
            0xbd00, // 0x32  pop {pc}
        ];
        let mut bytes = Vec::with_capacity(units.len() * 2);
        for unit in &units {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        AddressSpace::new(bytes, Address::new(BASE))
    }

    fn build_index(space: &AddressSpace) -> CrossRefIndex {
        IndexBuilder::new(space).build(space.range())
    }

    #[test]
    fn test_all_composition_requires_every_term() {
        let space = corpus();
        let index = build_index(&space);
        let engine = QueryEngine::new(&space, &index);

        let query = Query::all()
            .require(Predicate::LoadsLiteral { value: LITERAL })
            .require(Predicate::CallsTarget { target: HELPER });
        let candidates = engine.run(&query);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].address, Address::new(BASE));
        assert_eq!(candidates[0].score, 2);
        assert!(candidates[0].satisfies("loads-literal"));
        assert!(candidates[0].satisfies("calls-target"));
    }

    #[test]
    fn test_any_composition_scores_partial_matches() {
        let space = corpus();
        let index = build_index(&space);
        let engine = QueryEngine::new(&space, &index);

        let query = Query::any()
            .require(Predicate::LoadsLiteral { value: LITERAL })
            .require(Predicate::CallsTarget { target: HELPER });
        let candidates = engine.run(&query);
        assert_eq!(candidates.len(), 2);
        // the double match outranks the single one
        assert_eq!(candidates[0].address, Address::new(BASE));
        assert_eq!(candidates[0].score, 2);
        assert_eq!(candidates[1].address, Address::new(BASE + 0x18));
        assert_eq!(candidates[1].score, 1);
    }

    #[test]
    fn test_equal_scores_order_by_ascending_address() {
        let space = corpus();
        let index = build_index(&space);
        let engine = QueryEngine::new(&space, &index);

        let forward = Query::any().require(Predicate::LoadsLiteral { value: LITERAL });
        // a second query with an extra never-matching term evaluated first
        let shuffled = Query::any()
            .require(Predicate::CallsTarget { target: 0xdead_beef })
            .require(Predicate::LoadsLiteral { value: LITERAL });

        for query in [forward, shuffled] {
            let candidates = engine.run(&query);
            assert_eq!(candidates.len(), 2);
            assert_eq!(candidates[0].address, Address::new(BASE));
            assert_eq!(candidates[1].address, Address::new(BASE + 0x18));
            assert_eq!(candidates[0].score, candidates[1].score);
        }
    }

    #[test]
    fn test_ref_near_discriminates_by_radius() {
        let space = corpus();
        let index = build_index(&space);
        let engine = QueryEngine::new(&space, &index);

        let query = Query::any().term(
            Term::new(Predicate::RefNear { value: LITERAL, other: HELPER, radius: 16 })
                .with_bonus("tight-pair", 2, 4),
        );
        let candidates = engine.run(&query);
        // only routine A's load sits within 16 bytes of the helper call
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].address, Address::new(BASE));
        assert!(candidates[0].satisfies("tight-pair"));
        assert_eq!(candidates[0].score, 3);
    }

    #[test]
    fn test_no_match_is_an_empty_result() {
        let space = corpus();
        let index = build_index(&space);
        let engine = QueryEngine::new(&space, &index);

        let query = Query::all().require(Predicate::LoadsLiteral { value: 0x1234_5678 });
        assert!(engine.run(&query).is_empty());
    }

    #[test]
    fn test_labels_come_from_the_injected_book() {
        let space = corpus();
        let index = build_index(&space);
        let engine = QueryEngine::new(&space, &index);

        let mut book = AddressBook::new();
        book.insert(Address::new(BASE), "UpdatePlayer");

        let query = Query::any().require(Predicate::LoadsLiteral { value: LITERAL });
        let candidates = engine.run_labeled(&query, &book);
        assert_eq!(candidates[0].label.as_deref(), Some("UpdatePlayer"));
        assert_eq!(candidates[1].label, None);
    }
}
