//! Parallel LCP-merge driver: work-stealing job queue (C8) plus the standard-splitting
//! merge jobs it runs (C9).

mod merge;
mod queue;

pub(crate) use merge::parallel_lcp_merge;
