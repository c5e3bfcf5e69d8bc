//! Cyclic-leader in-place bucket permutation (C7).
//!
//! Grounded on `bingmann-sample_sortBSC.cpp`'s step 4 ("premute in-place"): walk the
//! array once; at every position not yet settled, follow the cycle of swaps dictated by
//! the (mutating) prefix-sum `bktindex` until the cycle closes, then jump to the next
//! unsettled position. Every string is moved exactly once.

/// Permutes `strings`/`bktcache` in place so that all strings in bucket `b` occupy
/// `bktindex[b-1]..bktindex[b]` (with `bktindex[-1] == 0`), given `bktsize` (bucket
/// counts) and `bktindex` (inclusive-end prefix sums, i.e. `bktindex[b]` is one past the
/// last slot of bucket `b` -- consumed/decremented as the permutation proceeds).
pub(crate) fn permute_by_bucket<'a>(strings: &mut [&'a [u8]], bktcache: &mut [u16], bktsize: &[usize], bktindex: &mut [usize]) {
    let n = strings.len();
    if n == 0 {
        return;
    }

    let last_bkt_size = bktsize.iter().rev().find(|&&s| s > 0).copied().unwrap_or(0);
    let mut i = 0;
    while i < n - last_bkt_size {
        let mut carried_str = strings[i];
        let mut carried_bkt = bktcache[i];

        loop {
            bktindex[carried_bkt as usize] -= 1;
            let j = bktindex[carried_bkt as usize];
            if j <= i {
                break;
            }
            std::mem::swap(&mut carried_str, &mut strings[j]);
            std::mem::swap(&mut carried_bkt, &mut bktcache[j]);
        }

        strings[i] = carried_str;
        bktcache[i] = carried_bkt;
        i += bktsize[carried_bkt as usize];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefix_sum(bktsize: &[usize]) -> Vec<usize> {
        let mut acc = 0;
        bktsize
            .iter()
            .map(|&s| {
                acc += s;
                acc
            })
            .collect()
    }

    fn run(strings: &[&'static [u8]], buckets: &[u16], nbkt: usize) -> (Vec<&'static [u8]>, Vec<u16>) {
        let mut strings = strings.to_vec();
        let mut bktcache = buckets.to_vec();
        let mut bktsize = vec![0usize; nbkt];
        for &b in &bktcache {
            bktsize[b as usize] += 1;
        }
        let mut bktindex = prefix_sum(&bktsize);
        permute_by_bucket(&mut strings, &mut bktcache, &bktsize, &mut bktindex);
        (strings, bktcache)
    }

    #[test]
    fn groups_by_bucket_preserving_bucket_membership() {
        let strings: Vec<&[u8]> = vec![b"a", b"c", b"b", b"e", b"d"];
        let buckets = [0u16, 2, 1, 2, 0];
        let (out_strings, out_buckets) = run(&strings, &buckets, 3);

        assert_eq!(out_buckets, vec![0, 0, 1, 2, 2]);
        let bucket0: std::collections::HashSet<_> = out_strings[0..2].iter().collect();
        assert_eq!(bucket0, std::collections::HashSet::from([&b"a"[..], &b"e"[..]]));
        assert_eq!(out_strings[2], b"b".as_slice());
        let bucket2: std::collections::HashSet<_> = out_strings[3..5].iter().collect();
        assert_eq!(bucket2, std::collections::HashSet::from([&b"c"[..], &b"d"[..]]));
    }

    #[test]
    fn single_bucket_is_identity() {
        let strings: Vec<&[u8]> = vec![b"x", b"y", b"z"];
        let buckets = [0u16, 0, 0];
        let (out_strings, _) = run(&strings, &buckets, 1);
        assert_eq!(out_strings, strings);
    }

    #[test]
    fn empty_input() {
        let strings: Vec<&[u8]> = vec![];
        let buckets: [u16; 0] = [];
        let (out_strings, _) = run(&strings, &buckets, 1);
        assert!(out_strings.is_empty());
    }

    #[test]
    fn every_bucket_nonempty_random() {
        use rand::Rng;
        let mut rng = rand::rng();
        let words: Vec<&[u8]> = vec![b"ant", b"bee", b"cat", b"dog", b"eel", b"fox", b"gnu", b"hen"];
        for _ in 0..50 {
            let n = words.len();
            let buckets: Vec<u16> = (0..n).map(|_| rng.random_range(0..4)).collect();
            let (out_strings, out_buckets) = run(&words, &buckets, 4);
            assert!(out_buckets.windows(2).all(|w| w[0] <= w[1]));
            let mut expect_sorted_orig = words.clone();
            expect_sorted_orig.sort();
            let mut got_sorted = out_strings.clone();
            got_sorted.sort();
            assert_eq!(expect_sorted_orig, got_sorted);
        }
    }
}
