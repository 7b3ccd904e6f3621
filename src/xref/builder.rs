// Thu Feb 5 2026 - Alex

use crate::decode::{decode, resolve_literal, Kind};
use crate::memory::{AddressRange, AddressSpace};
use crate::xref::index::CrossRefIndex;
use rayon::prelude::*;

/// Builds a [`CrossRefIndex`] over a caller-chosen scan range.
///
/// The range is split into word-aligned chunks that decode independently;
/// partial indexes are merged in ascending chunk-start order, so the result
/// is identical for any chunking of the same range. Every halfword address
/// is decoded on its own (a lone branch-link half reports incomplete and is
/// skipped), which is what makes the chunk boundaries invisible.
pub struct IndexBuilder<'a> {
    space: &'a AddressSpace,
    chunk_size: u32,
    use_parallel: bool,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(space: &'a AddressSpace) -> Self {
        Self {
            space,
            chunk_size: 0x4000,
            use_parallel: true,
        }
    }

    pub fn with_chunk_size(mut self, bytes: u32) -> Self {
        // chunks stay word-aligned relative to the range start
        self.chunk_size = bytes.max(4) & !3;
        self
    }

    pub fn use_parallel(mut self, parallel: bool) -> Self {
        self.use_parallel = parallel;
        self
    }

    pub fn build(&self, range: AddressRange) -> CrossRefIndex {
        let chunks = self.split(range);
        log::debug!(
            "xref build over {} in {} chunk(s) of up to 0x{:x} bytes",
            range,
            chunks.len(),
            self.chunk_size
        );

        let partials: Vec<CrossRefIndex> = if self.use_parallel {
            chunks.par_iter().map(|chunk| self.build_chunk(*chunk)).collect()
        } else {
            chunks.iter().map(|chunk| self.build_chunk(*chunk)).collect()
        };

        // collect() preserves chunk order, so this merge runs low to high
        let mut index = CrossRefIndex::new();
        for partial in partials {
            index.merge(partial);
        }
        log::debug!(
            "xref build done: {} literal refs, {} branch refs",
            index.literal_ref_count(),
            index.branch_ref_count()
        );
        index
    }

    fn split(&self, range: AddressRange) -> Vec<AddressRange> {
        let mut chunks = Vec::new();
        let mut cursor = range.start();
        while cursor < range.end() {
            let remaining = range.end().as_u32() - cursor.as_u32();
            let len = remaining.min(self.chunk_size);
            chunks.push(AddressRange::from_start_size(cursor, len));
            cursor = cursor + len;
        }
        chunks
    }

    fn build_chunk(&self, chunk: AddressRange) -> CrossRefIndex {
        let mut index = CrossRefIndex::new();
        let mut cursor = chunk.start();
        while chunk.contains(cursor) {
            if let Ok(offset) = self.space.to_file_offset(cursor) {
                // reads run through the whole image, not the chunk, so a
                // pair or pool straddling the boundary still resolves
                if let Ok(insn) = decode(self.space, offset) {
                    match insn.kind() {
                        Kind::LdrPc { .. } => {
                            if let Ok(literal) = resolve_literal(self.space, &insn) {
                                index.record_literal(literal.value, cursor);
                            }
                        }
                        Kind::BranchCond { target, .. }
                        | Kind::Branch { target }
                        | Kind::BranchLink { target } => {
                            index.record_branch(target.as_u32(), cursor);
                        }
                        _ => {}
                    }
                }
            }
            cursor = cursor + 2;
        }
        index
    }
}
