//! Parallel LCP-merge driver (C9): splits merge work across a job queue, recursively
//! subdividing at sampled splitters whenever an idle worker is detected.
//!
//! Grounded on `eberle-parallel-lcp-merge-standard-splitting.h`: `MergeJobStandardSplitting<K>`
//! runs a chunked merge loop that voluntarily yields back to `createJobsWithStandardSplitting`,
//! `InitialStandardSplitJob` seeds the run, and `enqueueJob` dispatches by input count into
//! one of a closed set of `K` instantiations. The Rust rewrite realizes "`Box<dyn Job>` with
//! virtual `run`" as a plain enum (the set of job shapes is closed and known at compile time,
//! so no trait object is needed), and disjoint output ranges are obtained via `split_at_mut`
//! instead of raw pointer + length bookkeeping.

use crossbeam_deque::Worker;

use crate::core::{CacheRun, LcpRun};
use crate::losertree::LoserTree;
use crate::mergesort::mergesort_kway;
use crate::parallel::queue::JobQueue;

/// `K` used to sort the sampled splitter strings via the sequential LCP mergesort (C4),
/// per the standard-splitting step that draws `K·S` samples and sorts them wholesale
/// rather than one insertion sort per stream.
const SPLITTER_SORT_K: usize = 4;

/// Sample strings drawn per residual input stream when deciding where to split next,
/// matching the source's `numSplittersPerStream`.
const SPLITTERS_PER_STREAM: usize = 20;

/// Largest number of simultaneous input streams a single merge job will accept. Above
/// this, `enqueue_job` would need a `Merge128` (or larger) variant; the source's own
/// `enqueueJob` aborts past 64 for the same reason.
const MAX_MERGE_WIDTH: usize = 64;

fn empty_cache_run<'a>() -> CacheRun<'a> {
    CacheRun { strings: &[], lcp: &[], cache: &[] }
}

fn pad_streams<'a, const K: usize>(streams: Vec<CacheRun<'a>>) -> [CacheRun<'a>; K] {
    debug_assert!(streams.len() <= K);
    let mut arr = [empty_cache_run(); K];
    for (slot, run) in arr.iter_mut().zip(streams) {
        *slot = run;
    }
    arr
}

/// A unit of work on the parallel merge job queue. A plain, closed enum rather than
/// `Box<dyn Job>`: every shape a job can take is known at compile time.
pub(crate) enum Job<'a> {
    InitialSplit(InitialSplitJob<'a>),
    Merge2(MergeJob<'a, 2>),
    Merge4(MergeJob<'a, 4>),
    Merge8(MergeJob<'a, 8>),
    Merge16(MergeJob<'a, 16>),
    Merge32(MergeJob<'a, 32>),
    Merge64(MergeJob<'a, 64>),
}

impl<'a> Job<'a> {
    pub(crate) fn run(self, queue: &JobQueue<'a>, local: &Worker<Job<'a>>) {
        match self {
            Job::InitialSplit(job) => job.run(queue, local),
            Job::Merge2(job) => job.run(queue, local),
            Job::Merge4(job) => job.run(queue, local),
            Job::Merge8(job) => job.run(queue, local),
            Job::Merge16(job) => job.run(queue, local),
            Job::Merge32(job) => job.run(queue, local),
            Job::Merge64(job) => job.run(queue, local),
        }
    }
}

/// The job enqueued once, up front: seeds `length_of_longest_job` with the full output
/// length (so the very first merge job doesn't immediately self-split) and performs the
/// initial splitting pass over every input stream.
pub(crate) struct InitialSplitJob<'a> {
    pub streams: Vec<CacheRun<'a>>,
    pub out_strings: &'a mut [&'a [u8]],
    pub out_lcp: &'a mut [usize],
}

impl<'a> InitialSplitJob<'a> {
    fn run(self, queue: &JobQueue<'a>, local: &Worker<Job<'a>>) {
        let length = self.out_strings.len();
        queue.shared.update_longest(length);
        create_jobs_with_standard_splitting(queue, local, self.streams, self.out_strings, self.out_lcp);
        queue.mark_done();
    }
}

/// A `K`-way merge over `inputs`, writing into the disjoint `out_strings`/`out_lcp`
/// sub-ranges of the overall output.
pub(crate) struct MergeJob<'a, const K: usize> {
    pub inputs: [CacheRun<'a>; K],
    pub out_strings: &'a mut [&'a [u8]],
    pub out_lcp: &'a mut [usize],
}

impl<'a, const K: usize> MergeJob<'a, K> {
    fn run(self, queue: &JobQueue<'a>, local: &Worker<Job<'a>>) {
        let MergeJob { inputs, out_strings, out_lcp } = self;

        let lcp_runs: [LcpRun<'a>; K] = std::array::from_fn(|i| inputs[i].as_lcp_run());
        let mut tree = LoserTree::<K>::new(lcp_runs);
        let total = out_strings.len();
        debug_assert_eq!(total, tree.remaining());

        log::trace!("merge job: K={K} total={total}");

        let bulk = queue.shared.merge_bulk_size;
        let mut written = 0;
        let mut interrupted = false;

        while total - written > 0 {
            let residual = total - written;
            queue.shared.update_longest(residual);

            if queue.has_idle() && residual > queue.shared.share_work_threshold && queue.shared.is_longest(residual) {
                interrupted = true;
                break;
            }

            let chunk = residual.min(bulk);
            tree.write_elements_to_stream(&mut out_strings[written..written + chunk], &mut out_lcp[written..written + chunk]);
            written += chunk;
        }

        if interrupted {
            log::debug!("merge job: K={K} yielding with residual={}", total - written);
            let remaining_streams: Vec<CacheRun<'a>> = (0..K)
                .map(|i| {
                    let cursor = tree.cursor(i);
                    inputs[i].sub(cursor, inputs[i].len() - cursor)
                })
                .filter(|run| !run.is_empty())
                .collect();
            create_jobs_with_standard_splitting(queue, local, remaining_streams, &mut out_strings[written..], &mut out_lcp[written..]);
        }

        queue.mark_done();
    }
}

/// Dispatches `streams` (at most [`MAX_MERGE_WIDTH`] of them) to a `Merge<K>` job sized
/// to the next power of two at or above `streams.len()`, and pushes it to `local`.
///
/// Panics if `streams.len()` exceeds [`MAX_MERGE_WIDTH`]: `Job` has no error channel to
/// propagate a failure through, and silently dropping the excess streams would leave
/// their strings never written to the output, corrupting the permutation. A failure here
/// is fatal to the whole sort, matching every other job-queue job's contract.
fn enqueue_job<'a>(queue: &JobQueue<'a>, local: &Worker<Job<'a>>, streams: Vec<CacheRun<'a>>, out_strings: &'a mut [&'a [u8]], out_lcp: &'a mut [usize]) {
    let n = streams.len();
    if n == 0 {
        return;
    }
    assert!(
        n <= MAX_MERGE_WIDTH,
        "merge split produced {n} non-empty streams, exceeding the maximum of {MAX_MERGE_WIDTH}"
    );

    let job = match n {
        1..=2 => Job::Merge2(MergeJob { inputs: pad_streams::<2>(streams), out_strings, out_lcp }),
        3..=4 => Job::Merge4(MergeJob { inputs: pad_streams::<4>(streams), out_strings, out_lcp }),
        5..=8 => Job::Merge8(MergeJob { inputs: pad_streams::<8>(streams), out_strings, out_lcp }),
        9..=16 => Job::Merge16(MergeJob { inputs: pad_streams::<16>(streams), out_strings, out_lcp }),
        17..=32 => Job::Merge32(MergeJob { inputs: pad_streams::<32>(streams), out_strings, out_lcp }),
        _ => Job::Merge64(MergeJob { inputs: pad_streams::<64>(streams), out_strings, out_lcp }),
    };

    queue.account_new_jobs(1);
    queue.enqueue_local(local, job);
}

/// Splits the residual work across `streams` at `SPLITTERS_PER_STREAM` evenly-spaced
/// sample strings per non-empty stream, and enqueues one sub-job per splitter plus a
/// final tail job for whatever remains beyond the largest splitter.
///
/// Grounded on `createJobsWithStandardSplitting`: streams contribute no sample at all
/// when empty (the source pads with a NUL sentinel and skips it later; the Rust
/// rewrite just omits empty streams from sampling, which is equivalent without the
/// sentinel dance).
fn create_jobs_with_standard_splitting<'a>(
    queue: &JobQueue<'a>,
    local: &Worker<Job<'a>>,
    mut streams: Vec<CacheRun<'a>>,
    mut out_strings: &'a mut [&'a [u8]],
    mut out_lcp: &'a mut [usize],
) {
    streams.retain(|s| !s.is_empty());

    if streams.is_empty() {
        debug_assert!(out_strings.is_empty());
        return;
    }
    if streams.len() == 1 {
        // A single residual stream needs no further merging, just a straight copy.
        let run = streams[0];
        out_strings.copy_from_slice(run.strings);
        out_lcp.copy_from_slice(run.lcp);
        return;
    }

    let mut splitters: Vec<&'a [u8]> = Vec::with_capacity(SPLITTERS_PER_STREAM * streams.len());
    for stream in &streams {
        let step = (stream.len() / (SPLITTERS_PER_STREAM + 1)).max(1);
        for s in 1..=SPLITTERS_PER_STREAM {
            let idx = (s * step).min(stream.len() - 1);
            splitters.push(stream.strings[idx]);
        }
    }

    // Sort the K·S samples using the sequential LCP mergesort (C4), as specified, rather
    // than re-deriving a separate sort for this one call site.
    let mut dummy_lcp = vec![0usize; splitters.len()];
    mergesort_kway::<SPLITTER_SORT_K>(&mut splitters, &mut dummy_lcp);

    for &splitter in &splitters {
        let mut job_streams: Vec<CacheRun<'a>> = Vec::with_capacity(streams.len());
        let mut job_len = 0usize;
        for stream in streams.iter_mut() {
            let idx = stream.strings.partition_point(|s| *s <= splitter);
            if idx > 0 {
                job_streams.push(stream.sub(0, idx));
                job_len += idx;
            }
            *stream = stream.sub(idx, stream.len() - idx);
        }
        if job_len == 0 {
            continue;
        }

        let (this_strings, rest_strings) = out_strings.split_at_mut(job_len);
        let (this_lcp, rest_lcp) = out_lcp.split_at_mut(job_len);
        out_strings = rest_strings;
        out_lcp = rest_lcp;
        enqueue_job(queue, local, job_streams, this_strings, this_lcp);
    }

    let tail: Vec<CacheRun<'a>> = streams.into_iter().filter(|s| !s.is_empty()).collect();
    if !tail.is_empty() {
        enqueue_job(queue, local, tail, out_strings, out_lcp);
    } else {
        debug_assert!(out_strings.is_empty());
    }
}

/// Entry point for the parallel driver: merges `inputs` (cache-augmented sorted runs)
/// into `out_strings`/`out_lcp`, distributing the work over `workers` threads.
pub(crate) fn parallel_lcp_merge<'a>(inputs: Vec<CacheRun<'a>>, out_strings: &'a mut [&'a [u8]], out_lcp: &'a mut [usize], workers: usize, config: &crate::config::SortConfig) {
    let queue = JobQueue::new(config);
    let initial = Job::InitialSplit(InitialSplitJob { streams: inputs, out_strings, out_lcp });
    queue.run(initial, workers);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SortConfig;
    use crossbeam_deque::Worker;

    #[test]
    #[should_panic(expected = "exceeding the maximum")]
    fn enqueue_job_panics_past_max_merge_width() {
        let config = SortConfig::default();
        let queue = JobQueue::new(&config);
        let worker = Worker::new_fifo();
        let streams = vec![empty_cache_run(); MAX_MERGE_WIDTH + 1];
        let mut out_strings: Vec<&[u8]> = vec![];
        let mut out_lcp: Vec<usize> = vec![];
        enqueue_job(&queue, &worker, streams, &mut out_strings, &mut out_lcp);
    }

    #[test]
    fn enqueue_job_accepts_exactly_max_merge_width() {
        let config = SortConfig::default();
        let queue = JobQueue::new(&config);
        let worker = Worker::new_fifo();
        let streams = vec![empty_cache_run(); MAX_MERGE_WIDTH];
        let mut out_strings: Vec<&[u8]> = vec![];
        let mut out_lcp: Vec<usize> = vec![];
        enqueue_job(&queue, &worker, streams, &mut out_strings, &mut out_lcp);
        assert!(worker.pop().is_some());
    }
}
