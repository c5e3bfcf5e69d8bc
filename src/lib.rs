//! # lcpsort
//!
//! `lcpsort` sorts arrays of variable-length byte strings and, as a side-product of the
//! sort, produces the **Longest Common Prefix (LCP) array** of the sorted output: for
//! `j ∈ [1,n)`, `lcp[j]` is the number of leading bytes `strings[j-1]` and `strings[j]`
//! have in common. Exploiting already-known prefix relationships during the sort is what
//! makes this worth a dedicated crate over `slice::sort`: total comparison work scales
//! with the data's *distinguishing* character volume rather than its full length.
//!
//! ## Algorithms
//!
//! - A **K-way LCP loser-tree mergesort** (`K ∈ {4, 16, 32, 64}`), which recursively
//!   divides the input and merges the sorted parts with an online tournament tree that
//!   carries LCP information across merge steps instead of re-scanning shared prefixes.
//! - **Super-scalar string sample sort (S⁵)**, which builds a small splitter tree from an
//!   oversample, classifies every string into a bucket against it, and recurses per
//!   bucket at a depth advanced past whatever prefix that bucket's classification already
//!   resolved.
//! - A **parallel LCP-merge driver** built on a `crossbeam-deque` work-stealing job queue:
//!   merge jobs voluntarily split themselves at sampled splitters when an idle worker is
//!   detected, so work redistributes without a central scheduler.
//!
//! All three are exposed through one small entry-point surface; [`registry::ALGORITHMS`]
//! lists every concrete variant by name for benchmarking or explicit selection.
//!
//! ## Usage
//!
//! ```
//! use lcpsort::sort_with_lcp;
//!
//! let mut data: Vec<&[u8]> = vec![b"banana", b"ban", b"banan", b"bandana"];
//! let mut lcp = vec![0usize; data.len()];
//! sort_with_lcp(&mut data, &mut lcp).unwrap();
//!
//! assert_eq!(data, vec![b"ban".as_slice(), b"banan", b"banana", b"bandana"]);
//! assert_eq!(lcp[1..], [3, 5, 4]);
//! ```
//!
//! Tune the cutover to sample sort, the parallel worker count, or the splitter-tree size
//! via [`SortConfig`] and [`sort_with_lcp_config`].

mod classify;
pub mod config;
mod core;
mod error;
mod inssort;
mod losertree;
mod mergesort;
mod parallel;
mod permute;
pub mod registry;
mod samplesort;
mod splitter;

use crate::classify::ClassifierKind;
use crate::core::CacheRun;

pub use config::SortConfig;
pub use error::LcpSortError;

pub mod prelude {
    pub use crate::config::SortConfig;
    pub use crate::error::LcpSortError;
    pub use crate::{sort, sort_with_config, sort_with_lcp, sort_with_lcp_config};
}

/// Sorts `strings` in place. Discards the LCP array; see [`sort_with_lcp`] to keep it.
pub fn sort(strings: &mut [&[u8]]) {
    let mut lcp = vec![0usize; strings.len()];
    sort_with_lcp(strings, &mut lcp).expect("sort: default configuration never fails validation");
}

/// Sorts `strings` in place and fills `lcp` with the LCP array of the sorted output.
///
/// `lcp[0]` is left untouched; `lcp[j]` for `j ∈ [1,n)` is the common-prefix length
/// between `strings[j-1]` and `strings[j]` after sorting.
pub fn sort_with_lcp(strings: &mut [&[u8]], lcp: &mut [usize]) -> Result<(), LcpSortError> {
    sort_with_lcp_config(strings, lcp, &SortConfig::default())
}

/// Like [`sort`], but with an explicit [`SortConfig`].
pub fn sort_with_config(strings: &mut [&[u8]], config: &SortConfig) -> Result<(), LcpSortError> {
    let mut lcp = vec![0usize; strings.len()];
    sort_with_lcp_config(strings, &mut lcp, config)
}

/// Like [`sort_with_lcp`], but with an explicit [`SortConfig`].
///
/// Chooses sample sort for single-worker configurations or inputs below
/// `config.smallsort_threshold`, and the parallel LCP-merge driver (over
/// `config.workers` sample-sorted chunks) otherwise.
pub fn sort_with_lcp_config(strings: &mut [&[u8]], lcp: &mut [usize], config: &SortConfig) -> Result<(), LcpSortError> {
    if lcp.len() != strings.len() {
        return Err(LcpSortError::InvalidArgument(format!(
            "lcp array length {} does not match strings length {}",
            lcp.len(),
            strings.len()
        )));
    }

    let n = strings.len();
    if n == 0 {
        return Ok(());
    }

    log::debug!("sort_with_lcp_config: n={n} workers={} treebits={}", config.workers, config.treebits);

    if config.workers <= 1 || n < config.smallsort_threshold {
        samplesort::samplesort(strings, lcp, 0, config.treebits, config.smallsort_threshold, ClassifierKind::UnrollInterleave);
    } else {
        parallel_sort_with_lcp(strings, lcp, config);
    }
    Ok(())
}

/// Splits `strings` into `config.workers` contiguous chunks, sample-sorts each
/// sequentially, then merges the sorted chunks with the parallel LCP-merge driver.
///
/// Shared between [`sort_with_lcp_config`] and [`registry`]'s `parallel-merge-*`
/// variants, which fix the worker count to exercise a specific initial fan-out.
pub(crate) fn parallel_sort_with_lcp(strings: &mut [&[u8]], lcp: &mut [usize], config: &SortConfig) {
    let n = strings.len();
    let chunk_count = config.workers.max(1).min(n.max(1));

    let base = n / chunk_count;
    let extra = n % chunk_count;
    let mut ranges = Vec::with_capacity(chunk_count);
    let mut offset = 0;
    for i in 0..chunk_count {
        let size = base + usize::from(i < extra);
        ranges.push((offset, size));
        offset += size;
    }

    for &(off, size) in &ranges {
        log::trace!("parallel_sort_with_lcp: sequential chunk at {off}..{}", off + size);
        samplesort::samplesort(&mut strings[off..off + size], &mut lcp[off..off + size], 0, config.treebits, config.smallsort_threshold, ClassifierKind::UnrollInterleave);
    }

    let scratch_strings: Vec<&[u8]> = strings.to_vec();
    let scratch_lcp: Vec<usize> = lcp.to_vec();
    let scratch_cache = core::build_cache(&scratch_strings, &scratch_lcp);

    let runs: Vec<CacheRun> = ranges
        .iter()
        .map(|&(off, size)| CacheRun {
            strings: &scratch_strings[off..off + size],
            lcp: &scratch_lcp[off..off + size],
            cache: &scratch_cache[off..off + size],
        })
        .collect();

    parallel::parallel_lcp_merge(runs, strings, lcp, config.workers, config);
}
