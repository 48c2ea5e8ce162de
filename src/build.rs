//! Interval-tree construction (C3).
//!
//! Builds the packed `sa_parent_link` array from a widened suffix array and
//! its PLCP array via a single right-to-left pass with an explicit stack —
//! ported from `esa_matchfinder_build_interval_tree` /
//! `esa_matchfinder_build_interval_tree_omp` / `esa_matchfinder_find_breakpoint`.
//! The parallel driver here realizes the "one barrier" shape from two
//! sequential `rayon::scope` calls rather than a `std::sync::Barrier`: a
//! scope only returns once every task spawned inside it has finished, which
//! is exactly the synchronization the original's `#pragma omp barrier`
//! provides, without the separate primitive.

use crate::node::Node;
use crate::pool::WorkerPool;
use crate::racy::{RacyConstPtr, RacyPtr};

const MAX_STACK_DEPTH: usize = 2 * crate::consts::MAX_MATCH_LENGTH as usize;

/// Builds the interval tree over `sa_parent_link[start..start+size)`,
/// consuming the suffix-array values stored there and replacing
/// `plcp_leaf_link[pos]` (for every position touched) with the tree node
/// index representing `pos`'s own leaf. Returns `interval_tree_start`: the
/// lowest index this call actually wrote a finished node into, so a caller
/// can later reset exactly `[interval_tree_start, start+size)`.
pub fn build_interval_tree(
    sa_parent_link: &mut [u64],
    plcp_leaf_link: &mut [u32],
    min_match_length: u64,
    max_match_length: u64,
    start: usize,
    size: usize,
) -> usize {
    if size == 0 {
        return start;
    }

    let mut stack = [Node(0); MAX_STACK_DEPTH];
    let mut sp: usize = 0;
    let mut top_interval = Node(0);
    let mut next_interval_index = (start + size - 1) as u64;

    let min_match_length = min_match_length - 1;
    let max_match_length = max_match_length - min_match_length;

    for i in (start..start + size).rev() {
        let next_pos = sa_parent_link[i] as usize;

        let mut next_lcp = plcp_leaf_link[next_pos] as i64 - min_match_length as i64;
        next_lcp = next_lcp.max(0).min(max_match_length as i64);
        let next_lcp = next_lcp as u64;

        let next_interval = Node::new(next_lcp, next_interval_index);
        let mut top_interval_lcp = top_interval.lcp_excess() as u64;

        stack[sp + 1] = next_interval;
        if next_lcp > top_interval_lcp {
            top_interval = next_interval;
            next_interval_index -= 1;
            sp += 1;
        }

        plcp_leaf_link[next_pos] = top_interval.index();

        while next_lcp < top_interval_lcp {
            let closed_interval = top_interval;

            sp -= 1;
            top_interval = stack[sp];
            top_interval_lcp = top_interval.lcp_excess() as u64;

            stack[sp + 1] = next_interval;
            if next_lcp > top_interval_lcp {
                top_interval = next_interval;
                next_interval_index -= 1;
                sp += 1;
            }
            top_interval_lcp = top_interval.lcp_excess() as u64;

            let closed_index = closed_interval.index() as usize;
            sa_parent_link[closed_index] = closed_interval.close_onto(top_interval.index()).into();
        }
    }

    (next_interval_index + 1) as usize
}

/// Finds the highest `i` in `[start, start+size)` at which the tree reaches
/// depth 0 (`PLCP[SA[i]] < min_match_length`) — a point where a subtree
/// built over `[i, start+size)` would be fully self-contained, independent
/// of anything to its left. `None` if no such `i` exists in this slab.
pub fn find_breakpoint(
    sa_parent_link: &[u64],
    plcp_leaf_link: &[u32],
    min_match_length: u32,
    start: usize,
    size: usize,
) -> Option<usize> {
    for i in (start..start + size).rev() {
        let next_pos = sa_parent_link[i] as usize;
        if plcp_leaf_link[next_pos] < min_match_length {
            return Some(i);
        }
    }
    None
}

/// Builds the whole-block interval tree, splitting work across `pool` when
/// there's enough of it. Returns one `(interval_tree_start, interval_tree_end)`
/// range per worker (both 0 for a worker that ended up with no work),
/// mirroring `ESA_MF_THREAD_STATE`. Writes the root sentinel at index 0
/// unconditionally, including for `n == 0`.
pub fn build_interval_tree_parallel(
    sa_parent_link: &mut [u64],
    plcp_leaf_link: &mut [u32],
    min_match_length: u64,
    max_match_length: u64,
    n: usize,
    pool: &WorkerPool,
) -> Vec<(usize, usize)> {
    let num_threads = pool.num_threads();
    let mut ranges = vec![(0usize, 0usize); num_threads.max(1)];

    if num_threads <= 1 || n < 65536 {
        let tree_start = build_interval_tree(
            sa_parent_link,
            plcp_leaf_link,
            min_match_length,
            max_match_length,
            0,
            n,
        );
        ranges[0] = (tree_start, n);
    } else {
        let stripes = pool.stripes(n);
        let mut breakpoints: Vec<i64> = vec![-1; num_threads];

        {
            let sa_ptr = RacyConstPtr(sa_parent_link.as_ptr());
            let plcp_ptr = RacyConstPtr(plcp_leaf_link.as_ptr());
            let bp_ptr = RacyPtr(breakpoints.as_mut_ptr());
            pool.install(|| {
                rayon::scope(|scope| {
                    for (t, &(start, size)) in stripes.iter().enumerate() {
                        let is_last = t + 1 == num_threads;
                        scope.spawn(move |_| {
                            // SAFETY: every worker only reads sa/plcp and
                            // writes bp_ptr.add(t), a distinct slot per t.
                            let found = if is_last {
                                Some(n)
                            } else {
                                let sa = unsafe { std::slice::from_raw_parts(sa_ptr.0, n) };
                                let plcp = unsafe { std::slice::from_raw_parts(plcp_ptr.0, n) };
                                find_breakpoint(sa, plcp, min_match_length as u32, start, size)
                            };
                            unsafe {
                                *bp_ptr.0.add(t) = found.map(|v| v as i64).unwrap_or(-1);
                            }
                        });
                    }
                });
            });
        }

        {
            let sa_ptr = RacyPtr(sa_parent_link.as_mut_ptr());
            let plcp_ptr = RacyPtr(plcp_leaf_link.as_mut_ptr());
            let ranges_ptr = RacyPtr(ranges.as_mut_ptr());
            let breakpoints = &breakpoints;
            pool.install(|| {
                rayon::scope(|scope| {
                    for t in 0..num_threads {
                        let end = breakpoints[t];
                        if end < 0 {
                            continue;
                        }
                        let end = end as usize;
                        let mut tree_scan_start = 0usize;
                        for prev in (0..t).rev() {
                            if breakpoints[prev] >= 0 {
                                tree_scan_start = breakpoints[prev] as usize;
                                break;
                            }
                        }
                        if tree_scan_start >= end {
                            continue;
                        }
                        scope.spawn(move |_| {
                            // SAFETY: [tree_scan_start, end) for this thread
                            // never overlaps another thread's range — both
                            // endpoints come from the disjoint breakpoint
                            // sequence computed above.
                            let sa =
                                unsafe { std::slice::from_raw_parts_mut(sa_ptr.0, n) };
                            let plcp =
                                unsafe { std::slice::from_raw_parts_mut(plcp_ptr.0, n) };
                            let tree_start = build_interval_tree(
                                sa,
                                plcp,
                                min_match_length,
                                max_match_length,
                                tree_scan_start,
                                end - tree_scan_start,
                            );
                            unsafe {
                                *ranges_ptr.0.add(t) = (tree_start, end);
                            }
                        });
                    }
                });
            });
        }
    }

    if !sa_parent_link.is_empty() {
        sa_parent_link[0] = Node::ROOT.into();
    }
    ranges
}
