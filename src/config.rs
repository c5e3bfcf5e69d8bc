//! Runtime tuning knobs.
//!
//! None of these values are semantically load-bearing (see the source material's open
//! questions on `MERGE_BULK_SIZE`/`SHARE_WORK_THRESHOLD`/`g_samplesort_smallsort`) — they
//! only affect performance, never correctness.

/// Tuning knobs for sequential and parallel sorting.
///
/// ```
/// use lcpsort::SortConfig;
///
/// let cfg = SortConfig::default().with_workers(4).with_treebits(11);
/// assert_eq!(cfg.workers, 4);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SortConfig {
    /// Number of worker threads used by the parallel driver.
    pub workers: usize,
    /// Below this many strings, sample sort falls through to insertion sort.
    pub smallsort_threshold: usize,
    /// Number of strings a parallel merge job writes per work-sharing chunk.
    pub merge_bulk_size: usize,
    /// A merge job only self-splits once its residual length exceeds this.
    pub share_work_threshold: usize,
    /// log2 of the number of splitters built per sample-sort recursion (2..=16).
    pub treebits: u32,
}

impl SortConfig {
    /// Number of splitters `2^treebits - 1` implied by the current `treebits`.
    pub(crate) fn num_splitters(&self) -> usize {
        (1usize << self.treebits) - 1
    }

    /// Builder-style setter for [`workers`](Self::workers).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Builder-style setter for [`smallsort_threshold`](Self::smallsort_threshold).
    pub fn with_smallsort_threshold(mut self, threshold: usize) -> Self {
        self.smallsort_threshold = threshold.max(1);
        self
    }

    /// Builder-style setter for [`merge_bulk_size`](Self::merge_bulk_size).
    pub fn with_merge_bulk_size(mut self, size: usize) -> Self {
        self.merge_bulk_size = size.max(1);
        self
    }

    /// Builder-style setter for [`share_work_threshold`](Self::share_work_threshold).
    pub fn with_share_work_threshold(mut self, threshold: usize) -> Self {
        self.share_work_threshold = threshold;
        self
    }

    /// Builder-style setter for [`treebits`](Self::treebits); clamped to `2..=16`.
    pub fn with_treebits(mut self, bits: u32) -> Self {
        self.treebits = bits.clamp(2, 16);
        self
    }
}

impl Default for SortConfig {
    fn default() -> Self {
        SortConfig {
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            smallsort_threshold: 1024,
            merge_bulk_size: 1024,
            share_work_threshold: 64,
            treebits: 10,
        }
    }
}
