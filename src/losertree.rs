//! K-way LCP-aware loser tree (C3): the online merge engine shared by the sequential
//! mergesort and the parallel merge driver.
//!
//! Grounded on `eberle-mergesort-lcp-losertree.h` (`LcpStringLoserTree<K>` usage) and
//! `eberle-parallel-lcp-merge-standard-splitting.h` (the embedded loser tree driving
//! `mergeToOutput`). The loser-tree implementation itself was filtered out of the
//! retrieved source, so the tournament's bookkeeping below is derived directly from the
//! textual description of a K-way LCP-aware loser tree: each internal node parks the
//! losing run along with the LCP between that run and whichever value currently wins
//! its subtree. A pop only ever touches the nodes on the winning leaf's root path, so a
//! replay costs `O(log K)` comparisons plus the one real byte-range scan needed to learn
//! the new leaf value's relationship to the just-consumed winner.
//!
//! `K` must be a power of two so the classic "node i has children 2i, 2i+1, leaves start
//! at K" array indexing applies without a separate shape table.

use crate::core::{common_prefix_len, LcpRun};

#[derive(Clone, Copy)]
struct Entry<'a> {
    leaf: usize,
    value: &'a [u8],
    /// LCP between `value` and whichever string currently represents the *winning*
    /// side of the node this entry is parked at (see module docs). Meaningless when
    /// `exhausted`.
    lcp: usize,
    exhausted: bool,
}

impl<'a> Entry<'a> {
    fn exhausted_marker(leaf: usize) -> Self {
        Entry { leaf, value: &[], lcp: 0, exhausted: true }
    }
}

/// Merges `K` pre-sorted, LCP-annotated runs into a single LCP-annotated stream.
///
/// `K` must be a power of two (4, 16, 32 and 64 are the sizes the sequential mergesort
/// instantiates; 2 through 64 are used by the parallel merge driver).
pub(crate) struct LoserTree<'a, const K: usize> {
    runs: [LcpRun<'a>; K],
    cursors: [usize; K],
    /// Indices `1..K` are used (standard "node i, children 2i/2i+1, leaves at K+j"
    /// layout); index 0 is unused padding.
    tree: [Entry<'a>; K],
    winner: Entry<'a>,
    remaining: usize,
}

impl<'a, const K: usize> LoserTree<'a, K> {
    /// Builds the tournament over `runs`. Each run must already be sorted with a valid
    /// LCP array (`runs[i].lcp[k] == common_prefix_len(runs[i].strings[k-1..k])`).
    pub(crate) fn new(runs: [LcpRun<'a>; K]) -> Self {
        debug_assert!(K.is_power_of_two() && K >= 2, "LoserTree requires a power-of-two K >= 2");

        let remaining = runs.iter().map(|r| r.len()).sum();
        let mut tree_init = LoserTree {
            runs,
            cursors: [0; K],
            tree: [Entry::exhausted_marker(0); K],
            winner: Entry::exhausted_marker(0),
            remaining,
        };
        let root = tree_init.build(1);
        tree_init.winner = root;
        tree_init
    }

    /// Number of elements not yet written out.
    pub(crate) fn remaining(&self) -> usize {
        self.remaining
    }

    /// How far `leaf`'s cursor has advanced into its input run. Used by the parallel
    /// merge driver to recover the unconsumed suffix of each input when a job
    /// voluntarily interrupts itself to share work (see [`crate::parallel::merge`]).
    pub(crate) fn cursor(&self, leaf: usize) -> usize {
        self.cursors[leaf]
    }

    fn head(&self, leaf: usize) -> Entry<'a> {
        let run = &self.runs[leaf];
        let pos = self.cursors[leaf];
        if pos < run.len() {
            Entry { leaf, value: run.strings[pos], lcp: 0, exhausted: false }
        } else {
            Entry::exhausted_marker(leaf)
        }
    }

    /// Recursively computes the true minimum of the subtree rooted at `node`, parking
    /// the loser of each comparison along the way. `node` ranges over `1..K`; its
    /// children are `2*node`/`2*node+1`, which are themselves internal nodes if `< K`
    /// and otherwise leaves (`child - K`).
    fn build(&mut self, node: usize) -> Entry<'a> {
        let left = if 2 * node < K { self.build(2 * node) } else { self.head(2 * node - K) };
        let right = if 2 * node + 1 < K { self.build(2 * node + 1) } else { self.head(2 * node + 1 - K) };

        let (winner, loser) = match (left.exhausted, right.exhausted) {
            (true, true) => (left, right),
            (true, false) => (right, left),
            (false, true) => (left, right),
            (false, false) => {
                let lcp = common_prefix_len(left.value, right.value);
                if left.value <= right.value {
                    (Entry { lcp, ..left }, Entry { lcp, ..right })
                } else {
                    (Entry { lcp, ..right }, Entry { lcp, ..left })
                }
            }
        };
        self.tree[node] = loser;
        winner
    }

    /// Plays the three-case LCP comparison between the incoming `candidate` and the
    /// entry currently parked at `*node`, parks the loser back at `*node`, and returns
    /// the winner (carrying the correct LCP-to-previous-global-winner forward).
    fn step(node: &mut Entry<'a>, candidate: Entry<'a>) -> Entry<'a> {
        let stored = *node;
        match (candidate.exhausted, stored.exhausted) {
            (true, true) => candidate,
            (true, false) => {
                *node = candidate;
                stored
            }
            (false, true) => candidate,
            (false, false) => {
                if candidate.lcp > stored.lcp {
                    *node = stored;
                    candidate
                } else if candidate.lcp < stored.lcp {
                    *node = candidate;
                    stored
                } else {
                    let m = candidate.lcp;
                    let extend = common_prefix_len(&candidate.value[m..], &stored.value[m..]);
                    let full = m + extend;
                    if candidate.value <= stored.value {
                        let winner = Entry { lcp: full, ..candidate };
                        *node = Entry { lcp: full, ..stored };
                        winner
                    } else {
                        let winner = Entry { lcp: full, ..stored };
                        *node = Entry { lcp: full, ..candidate };
                        winner
                    }
                }
            }
        }
    }

    /// Replays the tournament after `leaf`'s cursor has advanced, updating `self.winner`.
    fn replay_from(&mut self, leaf: usize) {
        let reference = self.winner.value;
        let mut candidate = self.head(leaf);
        if !candidate.exhausted {
            candidate.lcp = common_prefix_len(candidate.value, reference);
        }

        let mut pos = leaf + K;
        while pos > 1 {
            pos /= 2;
            candidate = Self::step(&mut self.tree[pos], candidate);
        }
        self.winner = candidate;
    }

    /// Writes up to `out_strings.len()` merged elements (and matching LCPs) starting
    /// from the tree's current state. `out_lcp[0]` (if any element is written) is set
    /// to `0`: the LCP of the first element of a merge run is not meaningful relative
    /// to anything outside that run.
    ///
    /// Panics in debug builds if more elements are requested than `remaining()`.
    pub(crate) fn write_elements_to_stream(&mut self, out_strings: &mut [&'a [u8]], out_lcp: &mut [usize]) {
        debug_assert_eq!(out_strings.len(), out_lcp.len());
        debug_assert!(out_strings.len() <= self.remaining);

        for i in 0..out_strings.len() {
            debug_assert!(!self.winner.exhausted, "write_elements_to_stream: tree exhausted early");
            out_strings[i] = self.winner.value;
            out_lcp[i] = if i == 0 { 0 } else { self.winner.lcp };

            let leaf = self.winner.leaf;
            self.cursors[leaf] += 1;
            self.remaining -= 1;
            self.replay_from(leaf);
        }
    }
}
