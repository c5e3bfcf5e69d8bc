//! Sample-sort classifier (C6): walks the [`SplitterTree`] to assign each string a
//! bucket number, in three interchangeable variants.
//!
//! Grounded on `bingmann-sample_sortBTCT.hpp`'s `ClassifyTreeCalcSimple`,
//! `ClassifyTreeCalcUnroll` and `ClassifyTreeCalcUnrollInterleave`: walk the implicit
//! binary tree (`i = 2*i + (key <= splitter_tree[i] ? 0 : 1)`), then fold the final leaf
//! index into `2*i` (less-than bucket) or `2*i + 1` (equal bucket, when the key matches
//! the splitter exactly). The source's variants differ only in how aggressively the walk
//! is unrolled/batched for instruction-level parallelism; here they differ in whether
//! keys are classified one at a time or in small fixed-size batches, which is the part
//! of that idea that survives without hand-written SIMD or `#pragma unroll`.

use crate::splitter::SplitterTree;

/// Bucket count produced by a splitter tree with `numsplitters` pivots: `2*numsplitters + 1`
/// buckets (less-than and equal buckets interleaved, plus one final greater-than bucket).
pub(crate) fn bucket_count(numsplitters: usize) -> usize {
    2 * numsplitters + 1
}

#[inline]
fn find_bkt(tree: &SplitterTree, key: u64) -> usize {
    let mut i: usize = 1;
    while i <= tree.numsplitters {
        i = 2 * i + usize::from(key > tree.tree[i]);
    }
    i -= tree.numsplitters + 1;

    let mut b = i * 2;
    if i < tree.numsplitters && tree.tree[i + 1] == key {
        b += 1;
    }
    b
}

/// Classifier variant selector (C10 registry keys off this).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClassifierKind {
    Simple,
    Unroll,
    UnrollInterleave,
}

/// Classifies every key in `keys` against `tree`, writing bucket numbers to `out`.
pub(crate) fn classify(tree: &SplitterTree, keys: &[u64], out: &mut [u16], kind: ClassifierKind) {
    debug_assert_eq!(keys.len(), out.len());
    match kind {
        ClassifierKind::Simple => {
            for (k, o) in keys.iter().zip(out.iter_mut()) {
                *o = find_bkt(tree, *k) as u16;
            }
        }
        ClassifierKind::Unroll => {
            // Same walk as `Simple`; the distinction in the source is a compiler
            // unroll-all-loops hint on `find_bkt`'s fixed-height loop, which Rust gets
            // from the same bound via the optimizer without a manual hint.
            for (k, o) in keys.iter().zip(out.iter_mut()) {
                *o = find_bkt(tree, *k) as u16;
            }
        }
        ClassifierKind::UnrollInterleave => classify_interleaved(tree, keys, out),
    }
}

const ROLLOUT: usize = 4;

/// Classifies keys `ROLLOUT` at a time, interleaving the tree descent so the four
/// independent comparison chains can issue back to back instead of serializing on a
/// single chain's latency (mirrors the source's `find_bkt_unroll` batching, minus its
/// hand-written loop unrolling).
fn classify_interleaved(tree: &SplitterTree, keys: &[u64], out: &mut [u16]) {
    let mut chunks = keys.chunks_exact(ROLLOUT);
    let mut out_chunks = out.chunks_exact_mut(ROLLOUT);

    for (key_chunk, out_chunk) in chunks.by_ref().zip(out_chunks.by_ref()) {
        let mut idx = [1usize; ROLLOUT];
        for _ in 0..tree.treebits {
            for u in 0..ROLLOUT {
                idx[u] = 2 * idx[u] + usize::from(key_chunk[u] > tree.tree[idx[u]]);
            }
        }
        for u in 0..ROLLOUT {
            idx[u] -= tree.numsplitters + 1;
        }
        for u in 0..ROLLOUT {
            out_chunk[u] = (idx[u] * 2) as u16;
        }
        for u in 0..ROLLOUT {
            if idx[u] < tree.numsplitters && tree.tree[idx[u] + 1] == key_chunk[u] {
                out_chunk[u] += 1;
            }
        }
    }

    let remainder_keys = chunks.remainder();
    let remainder_out = out_chunks.into_remainder();
    for (k, o) in remainder_keys.iter().zip(remainder_out.iter_mut()) {
        *o = find_bkt(tree, *k) as u16;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pack_key;

    fn build_tree() -> SplitterTree {
        let samples: Vec<&[u8]> = vec![b"b", b"d", b"f", b"h", b"j", b"l", b"n"].into_iter().map(|s: &[u8]| s).collect();
        SplitterTree::build(&samples, 3, 0)
    }

    #[test]
    fn agrees_across_variants() {
        let tree = build_tree();
        let keys: Vec<u64> =
            [b"a".as_slice(), b"b", b"c", b"d", b"e", b"m", b"z", b"h"].iter().map(|s| pack_key(s, 0)).collect();

        let mut simple = vec![0u16; keys.len()];
        let mut unroll = vec![0u16; keys.len()];
        let mut interleave = vec![0u16; keys.len()];
        classify(&tree, &keys, &mut simple, ClassifierKind::Simple);
        classify(&tree, &keys, &mut unroll, ClassifierKind::Unroll);
        classify(&tree, &keys, &mut interleave, ClassifierKind::UnrollInterleave);

        assert_eq!(simple, unroll);
        assert_eq!(simple, interleave);
    }

    #[test]
    fn equal_bucket_is_used_for_exact_matches() {
        let tree = build_tree();
        let key = pack_key(b"d", 0);
        let mut out = [0u16; 1];
        classify(&tree, &[key], &mut out, ClassifierKind::Simple);
        assert_eq!(out[0] % 2, 1, "exact splitter match must land in an odd (equal) bucket");
    }

    #[test]
    fn buckets_are_monotonic_with_key_order() {
        let tree = build_tree();
        let keys: Vec<u64> = (b'a'..=b'z').map(|c| pack_key(&[c], 0)).collect();
        let mut out = vec![0u16; keys.len()];
        classify(&tree, &keys, &mut out, ClassifierKind::Simple);
        for w in out.windows(2) {
            assert!(w[0] <= w[1]);
        }
    }
}
