//! Declarative algorithm registry (C10): every sorting variant this crate implements,
//! named and described, in one static table.
//!
//! Grounded on the teacher's split between several named `pub fn` entry points over one
//! generic core (`cps_quicksort`/`aqs_radix` in `algo.rs`); here the table itself replaces
//! hand-written dispatch code, closer to the `inventory`/static-registration style used
//! for declarative plugin tables elsewhere in the retrieval pack — but as a plain `const`
//! slice, since the set of variants is closed and known at compile time and no dynamic
//! registration is needed.

use crate::classify::ClassifierKind;
use crate::config::SortConfig;
use crate::mergesort;
use crate::samplesort;

/// One registered sorting variant: a stable name, a human-readable description, and the
/// entry point itself.
pub struct Algorithm {
    pub name: &'static str,
    pub description: &'static str,
    pub run: fn(&mut [&[u8]], &mut [usize]),
}

fn samplesort_variant(strings: &mut [&[u8]], lcp: &mut [usize], kind: ClassifierKind) {
    let cfg = SortConfig::default();
    samplesort::samplesort(strings, lcp, 0, cfg.treebits, cfg.smallsort_threshold, kind);
}

fn samplesort_simple(strings: &mut [&[u8]], lcp: &mut [usize]) {
    samplesort_variant(strings, lcp, ClassifierKind::Simple);
}

fn samplesort_unroll(strings: &mut [&[u8]], lcp: &mut [usize]) {
    samplesort_variant(strings, lcp, ClassifierKind::Unroll);
}

fn samplesort_unroll_interleave(strings: &mut [&[u8]], lcp: &mut [usize]) {
    samplesort_variant(strings, lcp, ClassifierKind::UnrollInterleave);
}

fn parallel_merge_variant<const K: usize>(strings: &mut [&[u8]], lcp: &mut [usize]) {
    let cfg = SortConfig::default().with_workers(K);
    crate::parallel_sort_with_lcp(strings, lcp, &cfg);
}

fn parallel_merge_2way(strings: &mut [&[u8]], lcp: &mut [usize]) {
    parallel_merge_variant::<2>(strings, lcp);
}
fn parallel_merge_4way(strings: &mut [&[u8]], lcp: &mut [usize]) {
    parallel_merge_variant::<4>(strings, lcp);
}
fn parallel_merge_8way(strings: &mut [&[u8]], lcp: &mut [usize]) {
    parallel_merge_variant::<8>(strings, lcp);
}
fn parallel_merge_16way(strings: &mut [&[u8]], lcp: &mut [usize]) {
    parallel_merge_variant::<16>(strings, lcp);
}
fn parallel_merge_32way(strings: &mut [&[u8]], lcp: &mut [usize]) {
    parallel_merge_variant::<32>(strings, lcp);
}
fn parallel_merge_64way(strings: &mut [&[u8]], lcp: &mut [usize]) {
    parallel_merge_variant::<64>(strings, lcp);
}

/// Every algorithm variant this crate implements, keyed by a stable name.
pub static ALGORITHMS: &[Algorithm] = &[
    Algorithm { name: "mergesort-4way", description: "Sequential 4-way LCP loser-tree mergesort", run: mergesort::mergesort_losertree_4way },
    Algorithm { name: "mergesort-16way", description: "Sequential 16-way LCP loser-tree mergesort", run: mergesort::mergesort_losertree_16way },
    Algorithm { name: "mergesort-32way", description: "Sequential 32-way LCP loser-tree mergesort", run: mergesort::mergesort_losertree_32way },
    Algorithm { name: "mergesort-64way", description: "Sequential 64-way LCP loser-tree mergesort", run: mergesort::mergesort_losertree_64way },
    Algorithm { name: "samplesort-simple", description: "Super-scalar sample sort, simple classifier", run: samplesort_simple },
    Algorithm { name: "samplesort-unroll", description: "Super-scalar sample sort, unrolled classifier", run: samplesort_unroll },
    Algorithm {
        name: "samplesort-unroll-interleave",
        description: "Super-scalar sample sort, interleaved-rollout classifier",
        run: samplesort_unroll_interleave,
    },
    Algorithm { name: "parallel-merge-2way", description: "Parallel LCP-merge driver, 2 initial runs", run: parallel_merge_2way },
    Algorithm { name: "parallel-merge-4way", description: "Parallel LCP-merge driver, 4 initial runs", run: parallel_merge_4way },
    Algorithm { name: "parallel-merge-8way", description: "Parallel LCP-merge driver, 8 initial runs", run: parallel_merge_8way },
    Algorithm { name: "parallel-merge-16way", description: "Parallel LCP-merge driver, 16 initial runs", run: parallel_merge_16way },
    Algorithm { name: "parallel-merge-32way", description: "Parallel LCP-merge driver, 32 initial runs", run: parallel_merge_32way },
    Algorithm { name: "parallel-merge-64way", description: "Parallel LCP-merge driver, 64 initial runs", run: parallel_merge_64way },
];

/// Looks up a registered algorithm by name.
pub fn find(name: &str) -> Option<&'static Algorithm> {
    ALGORITHMS.iter().find(|a| a.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::common_prefix_len;

    #[test]
    fn names_are_unique() {
        let mut names: Vec<&str> = ALGORITHMS.iter().map(|a| a.name).collect();
        names.sort_unstable();
        let mut deduped = names.clone();
        deduped.dedup();
        assert_eq!(names, deduped, "duplicate algorithm name in ALGORITHMS");
    }

    #[test]
    fn find_locates_registered_entries() {
        assert!(find("mergesort-4way").is_some());
        assert!(find("does-not-exist").is_none());
    }

    #[test]
    fn every_variant_sorts_correctly() {
        let bufs: Vec<Vec<u8>> = (0..500)
            .map(|i| format!("entry_{:04}_{}", i % 37, i).into_bytes())
            .collect();

        for algo in ALGORITHMS {
            let mut input: Vec<&[u8]> = bufs.iter().map(|v| v.as_slice()).collect();
            let mut lcp = vec![0usize; input.len()];
            (algo.run)(&mut input, &mut lcp);

            let mut expected = input.clone();
            expected.sort();
            assert_eq!(input, expected, "algorithm {} produced wrong order", algo.name);
            for i in 1..input.len() {
                assert_eq!(lcp[i], common_prefix_len(input[i - 1], input[i]), "algorithm {} lcp[{}]", algo.name, i);
            }
        }
    }
}
