//! Sequential K-way LCP mergesort (C4): recursively splits into `K` parts, sorts each,
//! and merges them with a [`LoserTree`].
//!
//! Grounded on `eberle-mergesort-lcp-losertree.h`'s `eberle_mergesort_losertree_lcp_kway`
//! and its `4way`/`16way`/`32way`/`64way` public wrappers: recurse down to runs of at
//! most `2*K` elements, finish those with [`lcp_insertion_sort`], then merge siblings
//! bottom-up with a loser tree sized `K`.

use crate::core::LcpRun;
use crate::inssort::lcp_insertion_sort;
use crate::losertree::LoserTree;

/// Splits `length` into `K` parts whose sizes differ by at most one, matching the
/// source's `calculateRanges`: the first `length % K` parts get one extra element.
fn calculate_ranges<const K: usize>(length: usize) -> [(usize, usize); K] {
    let base = length / K;
    let extra = length % K;
    let mut ranges = [(0usize, 0usize); K];
    let mut offset = 0;
    for (i, slot) in ranges.iter_mut().enumerate() {
        let size = base + if i < extra { 1 } else { 0 };
        *slot = (offset, size);
        offset += size;
    }
    ranges
}

/// Sorts `strings` in place, filling `lcp` with the LCP of consecutive sorted elements
/// (`lcp[0]` is left at whatever the caller initialized it to).
///
/// `K` must be a power of two; `2, 4, 16, 32, 64` are exercised by [`crate::registry`].
pub(crate) fn mergesort_kway<'a, const K: usize>(strings: &mut [&'a [u8]], lcp: &mut [usize]) {
    let n = strings.len();
    if n <= 2 * K {
        lcp_insertion_sort(strings, lcp, 0);
        return;
    }

    let ranges = calculate_ranges::<K>(n);
    for &(offset, size) in ranges.iter() {
        mergesort_kway::<K>(&mut strings[offset..offset + size], &mut lcp[offset..offset + size]);
    }

    // The loser tree reads each sorted part while `write_elements_to_stream` writes the
    // merged result back into the same buffers, so the sorted runs are copied out to a
    // scratch buffer first.
    let scratch_strings: Vec<&'a [u8]> = strings.to_vec();
    let scratch_lcp: Vec<usize> = lcp.to_vec();
    let runs: [LcpRun<'a>; K] = std::array::from_fn(|i| {
        let (offset, size) = ranges[i];
        LcpRun { strings: &scratch_strings[offset..offset + size], lcp: &scratch_lcp[offset..offset + size] }
    });

    let mut tree = LoserTree::<K>::new(runs);
    tree.write_elements_to_stream(strings, lcp);
}

pub fn mergesort_losertree_4way(strings: &mut [&[u8]], lcp: &mut [usize]) {
    mergesort_kway::<4>(strings, lcp);
}

pub fn mergesort_losertree_16way(strings: &mut [&[u8]], lcp: &mut [usize]) {
    mergesort_kway::<16>(strings, lcp);
}

pub fn mergesort_losertree_32way(strings: &mut [&[u8]], lcp: &mut [usize]) {
    mergesort_kway::<32>(strings, lcp);
}

pub fn mergesort_losertree_64way(strings: &mut [&[u8]], lcp: &mut [usize]) {
    mergesort_kway::<64>(strings, lcp);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::common_prefix_len;

    fn sort_and_check<const K: usize>(bufs: &[Vec<u8>]) {
        let mut input: Vec<&[u8]> = bufs.iter().map(|v| v.as_slice()).collect();
        let n = input.len();
        let mut lcp = vec![0usize; n];
        let mut expected = input.clone();
        expected.sort();

        mergesort_kway::<K>(&mut input, &mut lcp);
        assert_eq!(input, expected, "K={K}");
        for i in 1..n {
            assert_eq!(lcp[i], common_prefix_len(input[i - 1], input[i]), "K={K} i={i}");
        }
    }

    fn random_bufs(n: usize, max_len: usize, rng: &mut impl rand::Rng) -> Vec<Vec<u8>> {
        (0..n)
            .map(|_| {
                let len = rng.random_range(0..=max_len);
                (0..len).map(|_| rng.random_range(b'a'..=b'e')).collect()
            })
            .collect()
    }

    #[test]
    fn small_inputs_fall_through_to_inssort() {
        sort_and_check::<4>(&[b"c".to_vec(), b"a".to_vec(), b"b".to_vec()]);
    }

    #[test]
    fn four_way_recursion() {
        use rand::Rng;
        let mut rng = rand::rng();
        for _ in 0..30 {
            let n = rng.random_range(0..200);
            let bufs = random_bufs(n, 10, &mut rng);
            sort_and_check::<4>(&bufs);
        }
    }

    #[test]
    fn sixteen_way_recursion() {
        use rand::Rng;
        let mut rng = rand::rng();
        for _ in 0..15 {
            let n = rng.random_range(0..500);
            let bufs = random_bufs(n, 12, &mut rng);
            sort_and_check::<16>(&bufs);
        }
    }

    #[test]
    fn empty_and_singleton() {
        sort_and_check::<4>(&[]);
        sort_and_check::<4>(&[b"x".to_vec()]);
    }

    #[test]
    fn heavily_shared_prefixes() {
        let bufs: Vec<Vec<u8>> = (0..64).map(|i: u32| format!("prefix_shared_{:04}", 63 - i).into_bytes()).collect();
        sort_and_check::<16>(&bufs);
    }
}
