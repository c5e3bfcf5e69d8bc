//! Splitter tree construction (C5) for the super-scalar sample-sort classifier.
//!
//! Grounded on `bingmann-sample_sortBTCT.hpp`'s `ClassifyTreeCalcSimple::build` (which
//! delegates to a `TreeBuilderLevelOrder`) and `bingmann-sample_sortBSC.cpp`'s splitter
//! selection. The source builds the splitter array by recursing in *preorder* over the
//! sorted sample array and then remapping indices into a level-order-stored array via a
//! `TreeCalculations::pre_to_levelorder` bit trick; that remap table was not part of the
//! retrieved source, so this builds the level-order array directly with one recursive
//! pass (same `tree[i]` children-at-`2i`/`2i+1` layout the classifier and the loser tree
//! both use) — functionally equivalent, without the extra indirection.
//!
//! Splitters are drawn from the full `M`-sized sorted oversample rather than a
//! pre-trimmed `v`-sized array: the splitter at level-order rank `i` (`0`-indexed, out of
//! `v = numsplitters` total) is `samples[⌊M·(i+1)/(v+1)⌋]`, the equidistant spread over
//! the oversample the sample-sort literature calls for.

use crate::core::{key_block_terminates, pack_key};

/// A binary splitter tree over `numsplitters = 2^treebits - 1` pivots, stored in
/// level-order (`tree[1]` is the root; node `i`'s children are `2i` and `2i+1`).
pub(crate) struct SplitterTree {
    pub treebits: u32,
    pub numsplitters: usize,
    /// `tree[1..=numsplitters]`; index 0 unused.
    pub tree: Vec<u64>,
    /// `lcp[1..=numsplitters]`: common-prefix length (in bytes, from `depth`) between
    /// the two adjacent samples that produced this splitter, with the top bit set if
    /// the splitter string's packed key block reaches the string's end (meaning an
    /// equal-bucket recursion can stop instead of continuing past it).
    pub lcp: Vec<usize>,
}

const TERMINATOR_BIT: usize = 1 << (usize::BITS - 1);

impl SplitterTree {
    /// `sorted_samples` must already be sorted ascending and hold at least
    /// `2^treebits - 1` elements (the oversample `M`, typically a small multiple of the
    /// splitter count `v`). `depth` is the number of leading bytes already common to
    /// everything being classified (skipped when packing keys).
    pub(crate) fn build(sorted_samples: &[&[u8]], treebits: u32, depth: usize) -> Self {
        let numsplitters = (1usize << treebits) - 1;
        debug_assert!(
            sorted_samples.len() >= numsplitters,
            "oversample of {} elements is too small to draw {numsplitters} splitters from",
            sorted_samples.len(),
        );

        let mut tree = vec![0u64; numsplitters + 1];
        let mut lcp = vec![0usize; numsplitters + 1];
        if numsplitters > 0 {
            Self::build_range(sorted_samples, depth, 0, numsplitters, numsplitters, 1, &mut tree, &mut lcp);
        }
        SplitterTree { treebits, numsplitters, tree, lcp }
    }

    /// Maps a 0-indexed splitter rank in `[0, numsplitters)` to the index in the full
    /// `M`-sized oversample the equidistant-spread formula picks for it:
    /// `⌊M·(rank+1)/(numsplitters+1)⌋`.
    fn sample_index(rank: usize, oversample_len: usize, numsplitters: usize) -> usize {
        (oversample_len * (rank + 1)) / (numsplitters + 1)
    }

    /// Recursively fills `tree[node]`/`lcp[node]` for the splitter-rank range `[lo, hi)`
    /// (out of `numsplitters` total ranks), picking the midpoint rank as this node's
    /// splitter and recursing left/right.
    fn build_range(
        samples: &[&[u8]],
        depth: usize,
        lo: usize,
        hi: usize,
        numsplitters: usize,
        node: usize,
        tree: &mut [u64],
        lcp: &mut [usize],
    ) {
        let mid = lo + (hi - lo) / 2;
        let idx = Self::sample_index(mid, samples.len(), numsplitters);
        tree[node] = pack_key(samples[idx], depth);

        let prefix = if idx > 0 {
            crate::core::common_prefix_len(samples[idx - 1], samples[idx])
        } else {
            0
        };
        let mut entry = prefix;
        if key_block_terminates(samples[idx], depth) {
            entry |= TERMINATOR_BIT;
        }
        lcp[node] = entry;

        if lo < mid {
            Self::build_range(samples, depth, lo, mid, numsplitters, 2 * node, tree, lcp);
        }
        if mid + 1 < hi {
            Self::build_range(samples, depth, mid + 1, hi, numsplitters, 2 * node + 1, tree, lcp);
        }
    }

    /// The splitter lcp/terminator pair for 0-indexed splitter `i`, stripped of the
    /// terminator bit.
    pub(crate) fn splitter_lcp(&self, i: usize) -> usize {
        self.lcp[i + 1] & !TERMINATOR_BIT
    }

    /// `true` if splitter `i`'s key block reached the end of its source string.
    pub(crate) fn splitter_terminates(&self, i: usize) -> bool {
        self.lcp[i + 1] & TERMINATOR_BIT != 0
    }
}
