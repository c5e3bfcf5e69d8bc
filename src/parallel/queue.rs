//! Work-stealing job queue (C8): the concurrency substrate the parallel merge driver
//! runs its jobs on.
//!
//! Grounded on the source's hand-rolled `jobqueue::JobQueue` (global injector + per-thread
//! local queues + peer stealing), realized here with `crossbeam_deque::{Injector, Worker,
//! Stealer}` — the idiomatic Rust analogue, matching the work-stealing layout used
//! elsewhere in the retrieval pack rather than reimplementing a lock-free deque by hand.

use std::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_deque::{Injector, Steal, Stealer, Worker};

use crate::config::SortConfig;
use crate::parallel::merge::Job;

/// Tuning knobs and work-sharing hints shared by every job, the Rust realization of the
/// source's `g_lengthOfLongestJob`/`g_outputBase` globals, scoped to one `sort` call
/// instead of process-wide statics.
pub(crate) struct SharedState {
    pub merge_bulk_size: usize,
    pub share_work_threshold: usize,
    length_of_longest_job: AtomicUsize,
}

impl SharedState {
    pub(crate) fn new(config: &SortConfig) -> Self {
        SharedState {
            merge_bulk_size: config.merge_bulk_size,
            share_work_threshold: config.share_work_threshold,
            length_of_longest_job: AtomicUsize::new(0),
        }
    }

    /// Refreshes the global longest-residual hint against this job's current residual
    /// length: raises it if this job now exceeds it, or — if this job *was* the holder
    /// of the maximum — lowers it to track this job's shrinking residual. Relaxed and
    /// best-effort: a race between two jobs here can only make the hint briefly stale,
    /// never wrong in a way that breaks correctness (see module docs).
    pub(crate) fn update_longest(&self, residual: usize) {
        let prev = self.length_of_longest_job.load(Ordering::Relaxed);
        if residual >= prev {
            self.length_of_longest_job.store(residual, Ordering::Relaxed);
        }
    }

    /// `true` if `residual` is (at least tied for) the longest known job, the source's
    /// tie-break that stops every job from splitting on the same idle signal at once.
    pub(crate) fn is_longest(&self, residual: usize) -> bool {
        residual >= self.length_of_longest_job.load(Ordering::Relaxed)
    }
}

/// The shared job queue: one global [`Injector`] plus, for the lifetime of a single
/// [`run`](JobQueue::run) call, one [`Worker`]/[`Stealer`] pair per thread.
///
/// `has_idle` is an advisory counter (`Ordering::Relaxed`), never a synchronization
/// primitive — exactly the source's documented semantics for its idle flag.
pub(crate) struct JobQueue<'a> {
    injector: Injector<Job<'a>>,
    idle: AtomicUsize,
    pending: AtomicUsize,
    pub shared: SharedState,
}

impl<'a> JobQueue<'a> {
    pub(crate) fn new(config: &SortConfig) -> Self {
        JobQueue { injector: Injector::new(), idle: AtomicUsize::new(0), pending: AtomicUsize::new(0), shared: SharedState::new(config) }
    }

    /// `true` if at least one worker currently has nothing to do. A hint, not a fact:
    /// the reader may act on a value that's already stale by the time it's used.
    pub(crate) fn has_idle(&self) -> bool {
        self.idle.load(Ordering::Relaxed) > 0
    }

    /// Seeds the queue with the initial job and runs `workers` threads until the queue
    /// (injector, every local deque, and every in-flight job) has drained.
    pub(crate) fn run(&self, initial: Job<'a>, workers: usize) {
        self.pending.store(1, Ordering::Release);
        self.injector.push(initial);

        let locals: Vec<Worker<Job<'a>>> = (0..workers.max(1)).map(|_| Worker::new_fifo()).collect();
        let stealers: Vec<Stealer<Job<'a>>> = locals.iter().map(Worker::stealer).collect();

        std::thread::scope(|scope| {
            for local in locals {
                let stealers = &stealers;
                scope.spawn(move || self.worker_loop(local, stealers));
            }
        });
    }

    /// Adds `n` new in-flight jobs to the completion count. Must be called before those
    /// jobs are made visible to other workers, so the count never spuriously hits zero.
    pub(crate) fn account_new_jobs(&self, n: usize) {
        if n > 0 {
            self.pending.fetch_add(n, Ordering::AcqRel);
        }
    }

    /// Records that a job (possibly after spawning replacements via
    /// [`account_new_jobs`](Self::account_new_jobs)) has finished running.
    pub(crate) fn mark_done(&self) {
        self.pending.fetch_sub(1, Ordering::AcqRel);
    }

    /// Pushes a job onto the calling worker's own local deque, where it's cheapest to
    /// pick back up and available for peers to steal.
    pub(crate) fn enqueue_local(&self, local: &Worker<Job<'a>>, job: Job<'a>) {
        local.push(job);
    }

    fn worker_loop(&self, local: Worker<Job<'a>>, stealers: &[Stealer<Job<'a>>]) {
        loop {
            if self.pending.load(Ordering::Acquire) == 0 {
                return;
            }

            match self.find_job(&local, stealers) {
                Some(job) => job.run(self, &local),
                None => {
                    self.idle.fetch_add(1, Ordering::Relaxed);
                    std::thread::yield_now();
                    self.idle.fetch_sub(1, Ordering::Relaxed);
                }
            }
        }
    }

    fn find_job(&self, local: &Worker<Job<'a>>, stealers: &[Stealer<Job<'a>>]) -> Option<Job<'a>> {
        if let Some(job) = local.pop() {
            return Some(job);
        }
        loop {
            match self.injector.steal_batch_and_pop(local) {
                Steal::Success(job) => return Some(job),
                Steal::Retry => continue,
                Steal::Empty => break,
            }
        }
        for stealer in stealers {
            loop {
                match stealer.steal() {
                    Steal::Success(job) => return Some(job),
                    Steal::Retry => continue,
                    Steal::Empty => break,
                }
            }
        }
        None
    }
}
