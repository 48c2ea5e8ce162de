//! Fixed-size fork/join worker pool.
//!
//! The three parallel phases spec.md §5 describes (32→64 widening, interval-
//! tree construction, offset reset) all share the same shape: partition
//! `[0, n)` into `num_threads` disjoint, 16-aligned stripes and run a
//! closure over each stripe, with at most one synchronization barrier in
//! between. `WorkerPool` is the `rayon::ThreadPool`-backed primitive that
//! shape is built on, in the same spirit as this codebase's own
//! `threadpool::TPool` (rayon-backed, RAII-joined on drop) — but without
//! `TPool`'s bounded async job queue, which this crate has no use for: every
//! fork/join call here blocks until its stripes finish, there is no
//! fire-and-forget submission.

use crate::consts::NUM_THREADS_MAX;

/// A fixed-size pool of workers used for the bulk-parallel phases of ESA
/// construction. Construction validates and freezes `num_threads` for the
/// lifetime of the pool; `MatchFinder` owns one per handle.
pub struct WorkerPool {
    pool: rayon::ThreadPool,
    num_threads: usize,
}

impl WorkerPool {
    /// `num_threads == 0` selects the pool's default parallelism (the number
    /// of logical cores, same as this codebase's own `util::count_cores`),
    /// capped at [`NUM_THREADS_MAX`].
    pub fn new(num_threads: usize) -> WorkerPool {
        let num_threads = resolve_thread_count(num_threads);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()
            .expect("failed to build worker pool");
        WorkerPool { pool, num_threads }
    }

    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    /// Runs `f` on one of this pool's own worker threads, blocking the
    /// caller until it returns. `rayon::scope` calls made from inside `f`
    /// are scheduled across this pool rather than the global rayon pool.
    pub fn install<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R + Send,
        R: Send,
    {
        self.pool.install(f)
    }

    /// Disjoint `[start, start+len)` stripes covering `[0, n)`, one per
    /// worker. All but the last stripe have the same 16-aligned length;
    /// the last absorbs the remainder. Mirrors the stripe arithmetic in
    /// `esa_matchfinder_build_interval_tree_omp` et al.
    pub fn stripes(&self, n: usize) -> Vec<(usize, usize)> {
        stripe_ranges(n, self.num_threads)
    }
}

fn resolve_thread_count(requested: usize) -> usize {
    let n = if requested == 0 {
        std::thread::available_parallelism()
            .map(|v| v.get())
            .unwrap_or(1)
    } else {
        requested
    };
    n.min(NUM_THREADS_MAX).max(1)
}

/// Mirrors `omp_block_stride = (n / num_threads) & (-16)`: all non-last
/// stripes share this 16-aligned stride, and the last stripe absorbs
/// whatever remains (so stripes always sum to exactly `n`, even when `n`
/// isn't itself a multiple of the stride).
pub fn stripe_ranges(n: usize, num_threads: usize) -> Vec<(usize, usize)> {
    if num_threads <= 1 {
        return vec![(0, n)];
    }

    let stride = (n / num_threads) & !15usize;
    let mut ranges = Vec::with_capacity(num_threads);
    let mut start = 0usize;
    for t in 0..num_threads {
        let len = if t + 1 == num_threads { n - start } else { stride };
        ranges.push((start, len));
        start += len;
    }
    ranges
}
