//! Super-Scalar String Sample Sort (C8 entry point tying together C5/C6/C7).
//!
//! Grounded on `bingmann-sample_sortBSC.cpp`'s `sample_sortBSC`: oversample for
//! splitters, classify, count, prefix-sum, permute in place, then recurse per bucket
//! with the less-than/equal-bucket depth-advancement policy. The source has no LCP
//! output (plain sample sort); per this crate's unified contract every sort produces an
//! LCP array, so a bucket-boundary LCP ("seam") is filled in after each non-empty bucket
//! is placed, alongside whatever LCPs the bucket's own recursion computed internally.

use rand::Rng;

use crate::classify::{bucket_count, classify, ClassifierKind};
use crate::core::{common_prefix_len, pack_key};
use crate::inssort::lcp_insertion_sort;
use crate::permute::permute_by_bucket;
use crate::splitter::SplitterTree;

/// Minimum oversampling ratio for splitter candidates (`oversample_factor * numsplitters`
/// samples are drawn before sorting and picking splitters from them).
const OVERSAMPLE_FACTOR: usize = 2;

/// Recursively sorts `strings` (filling `lcp`) using super-scalar sample sort.
///
/// `depth` is the number of leading bytes already known to be shared by every string in
/// this call. Falls through to [`lcp_insertion_sort`] below `smallsort_threshold` or
/// when there isn't enough input to usefully oversample `numsplitters` pivots.
pub(crate) fn samplesort<'a>(
    strings: &mut [&'a [u8]],
    lcp: &mut [usize],
    depth: usize,
    treebits: u32,
    smallsort_threshold: usize,
    classifier: ClassifierKind,
) {
    let n = strings.len();
    let numsplitters = (1usize << treebits) - 1;
    let samplesize = OVERSAMPLE_FACTOR * numsplitters;

    if n < smallsort_threshold || n <= samplesize || numsplitters == 0 {
        lcp_insertion_sort(strings, lcp, depth);
        return;
    }

    // Step 1: oversample and pick splitters.
    let mut rng = rand::rng();
    let mut samples: Vec<&'a [u8]> = (0..samplesize).map(|_| strings[rng.random_range(0..n)]).collect();
    samples.sort_unstable();
    let tree = SplitterTree::build(&samples, treebits, depth);

    // Step 2: classify and count.
    let bktnum = bucket_count(numsplitters);
    let keys: Vec<u64> = strings.iter().map(|s| pack_key(s, depth)).collect();
    let mut bktcache = vec![0u16; n];
    classify(&tree, &keys, &mut bktcache, classifier);

    let mut bktsize = vec![0usize; bktnum];
    for &b in bktcache.iter() {
        bktsize[b as usize] += 1;
    }

    // Step 3: prefix sum.
    let mut bktindex = vec![0usize; bktnum];
    let mut acc = 0;
    for (idx, slot) in bktindex.iter_mut().enumerate() {
        acc += bktsize[idx];
        *slot = acc;
    }
    debug_assert_eq!(bktindex[bktnum - 1], n);

    // Step 4: permute in place.
    permute_by_bucket(strings, &mut bktcache, &bktsize, &mut bktindex);

    // Step 5: fill bucket-boundary LCPs and recurse into each bucket.
    let mut bsum = 0;
    for i in 0..bktnum {
        let size = bktsize[i];
        if size == 0 {
            continue;
        }
        if bsum > 0 {
            lcp[bsum] = common_prefix_len(strings[bsum - 1], strings[bsum]);
        }

        if size > 1 {
            if i == bktnum - 1 {
                // Final (strictly-greater-than) bucket: same depth, no splitter involved.
                samplesort(
                    &mut strings[bsum..bsum + size],
                    &mut lcp[bsum..bsum + size],
                    depth,
                    treebits,
                    smallsort_threshold,
                    classifier,
                );
            } else if i % 2 == 0 {
                // Less-than bucket.
                let splitter_idx = i / 2;
                let next_depth = depth + tree.splitter_lcp(splitter_idx);
                samplesort(
                    &mut strings[bsum..bsum + size],
                    &mut lcp[bsum..bsum + size],
                    next_depth,
                    treebits,
                    smallsort_threshold,
                    classifier,
                );
            } else {
                // Equal bucket: skip recursion entirely if the splitter's key block
                // already reached the end of its source string.
                let splitter_idx = i / 2;
                if !tree.splitter_terminates(splitter_idx) {
                    samplesort(
                        &mut strings[bsum..bsum + size],
                        &mut lcp[bsum..bsum + size],
                        depth + 8,
                        treebits,
                        smallsort_threshold,
                        classifier,
                    );
                }
            }
        }

        bsum += size;
    }
    debug_assert_eq!(bsum, n);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sort_and_check(bufs: &[Vec<u8>], treebits: u32, threshold: usize, classifier: ClassifierKind) {
        let mut input: Vec<&[u8]> = bufs.iter().map(|v| v.as_slice()).collect();
        let n = input.len();
        let mut lcp = vec![0usize; n];
        let mut expected = input.clone();
        expected.sort();

        samplesort(&mut input, &mut lcp, 0, treebits, threshold, classifier);
        assert_eq!(input, expected);
        for i in 1..n {
            assert_eq!(lcp[i], common_prefix_len(input[i - 1], input[i]), "i={i}");
        }
    }

    fn random_bufs(n: usize, max_len: usize, alphabet: std::ops::RangeInclusive<u8>, rng: &mut impl rand::Rng) -> Vec<Vec<u8>> {
        (0..n)
            .map(|_| {
                let len = rng.random_range(0..=max_len);
                (0..len).map(|_| rng.random_range(alphabet.clone())).collect()
            })
            .collect()
    }

    #[test]
    fn below_threshold_falls_back() {
        sort_and_check(&[b"b".to_vec(), b"a".to_vec(), b"c".to_vec()], 4, 100, ClassifierKind::Simple);
    }

    #[test]
    fn forces_real_recursion_with_tiny_treebits_and_threshold() {
        use rand::Rng;
        let mut rng = rand::rng();
        for _ in 0..20 {
            let n = rng.random_range(50..400);
            let bufs = random_bufs(n, 6, b'a'..=b'd', &mut rng);
            sort_and_check(&bufs, 2, 8, ClassifierKind::Simple);
        }
    }

    #[test]
    fn all_classifier_variants_agree() {
        use rand::Rng;
        let mut rng = rand::rng();
        let bufs = random_bufs(300, 8, b'a'..=b'f', &mut rng);
        for kind in [ClassifierKind::Simple, ClassifierKind::Unroll, ClassifierKind::UnrollInterleave] {
            sort_and_check(&bufs, 3, 16, kind);
        }
    }

    #[test]
    fn heavily_shared_prefixes_and_equal_strings() {
        let mut bufs: Vec<Vec<u8>> = (0..200).map(|i| format!("shared_prefix_value_{:05}", i).into_bytes()).collect();
        bufs.extend((0..50).map(|_| b"dup".to_vec()));
        sort_and_check(&bufs, 3, 16, ClassifierKind::Simple);
    }

    #[test]
    fn empty_and_singleton() {
        sort_and_check(&[], 4, 8, ClassifierKind::Simple);
        sort_and_check(&[b"x".to_vec()], 4, 8, ClassifierKind::Simple);
    }
}
