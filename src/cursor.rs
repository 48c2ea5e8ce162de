//! Position cursor (C4): current position, plus `rewind`/`fast_forward`/
//! `reset_offsets`. Ported from `esa_matchfinder_set_position`,
//! `esa_matchfinder_fast_forward`, `esa_matchfinder_reset_interval_tree[_omp]`
//! and the body of `esa_matchfinder_rewind`.
//!
//! The rotating prefetch ring the original keeps alongside `position` is a
//! performance hint the spec explicitly makes optional; this port omits it
//! (see `SPEC_FULL.md` §2) rather than carry dead state across every call.

use crate::node::Node;
use crate::pool::WorkerPool;
use crate::racy::RacyPtr;

/// `u64::MAX` doubles as "never parsed" and, truncated to `i32`, as the `-1`
/// `esa_matchfinder_get_position` returns in that state.
const UNSET_POSITION: u64 = u64::MAX;

#[derive(Debug)]
pub struct Cursor {
    position: u64,
}

impl Cursor {
    pub fn new() -> Cursor {
        Cursor {
            position: UNSET_POSITION,
        }
    }

    /// Called once after a successful `parse`; matches `set_position(0)` at
    /// the end of `esa_matchfinder_parse`.
    pub fn reset_after_parse(&mut self) {
        self.position = 0;
    }

    pub fn get(&self) -> i32 {
        self.position as i32
    }

    pub fn position_u64(&self) -> u64 {
        self.position
    }

    /// Advances by `count`, matching `esa_matchfinder_advance`'s position
    /// update (the offset-stamping side effect lives in `enumerate::advance`).
    pub fn bump(&mut self, count: u64) -> (u64, u64) {
        let current = self.position;
        self.position += count;
        (current, self.position)
    }

    pub fn step(&mut self) -> u64 {
        let p = self.position;
        self.position += 1;
        p
    }

    /// Moves the cursor to `q`, replaying or discarding offset stamps as
    /// needed. `tree_ranges` are the per-worker `(interval_tree_start,
    /// interval_tree_end)` ranges recorded by `build::build_interval_tree_parallel`.
    pub fn rewind(
        &mut self,
        q: u64,
        sa_parent_link: &mut [u64],
        plcp_leaf_link: &[u32],
        tree_ranges: &[(usize, usize)],
        pool: &WorkerPool,
    ) {
        if self.position == q {
            return;
        }

        if self.position != 0 {
            for &(lo, hi) in tree_ranges {
                if lo < hi {
                    reset_offsets(sa_parent_link, lo, hi, pool);
                }
            }
        }

        if q > 0 {
            fast_forward(sa_parent_link, plcp_leaf_link, q);
        }

        self.position = q;
    }
}

impl Default for Cursor {
    fn default() -> Cursor {
        Cursor::new()
    }
}

/// Replays the offset writes that positions `0..target_position` would have
/// made, without producing match output, by visiting them in descending
/// order and stopping each chain the first time it hits an already-stamped
/// node. Descending order is what guarantees the first stamp any node
/// receives this way is the latest position on its leaf-to-root path —
/// exactly what a forward walk would have recorded.
pub fn fast_forward(sa_parent_link: &mut [u64], plcp_leaf_link: &[u32], target_position: u64) {
    for position in (0..target_position).rev() {
        let mut reference = plcp_leaf_link[position as usize] as usize;
        loop {
            let interval = Node(sa_parent_link[reference]);
            if interval.is_stamped() {
                break;
            }
            sa_parent_link[reference] = interval.stamped_with(position).into();
            reference = interval.parent() as usize;
        }
    }
}

/// Zeroes the `offset` field of every node in `sa_parent_link[lo..hi)`,
/// parallelized across `pool` when the range is large enough to be worth it.
pub fn reset_offsets(sa_parent_link: &mut [u64], lo: usize, hi: usize, pool: &WorkerPool) {
    if lo >= hi {
        return;
    }
    let target = &mut sa_parent_link[lo..hi];
    let n = target.len();
    let num_threads = pool.num_threads();

    if num_threads <= 1 || n < 65536 {
        for node in target.iter_mut() {
            *node = Node(*node).with_offset_cleared().into();
        }
        return;
    }

    let stripes = pool.stripes(n);
    let ptr = RacyPtr(target.as_mut_ptr());
    pool.install(|| {
        rayon::scope(|scope| {
            for &(start, size) in &stripes {
                scope.spawn(move |_| {
                    // SAFETY: stripes partition [0, n) disjointly; each
                    // worker only touches its own [start, start+size).
                    let slice = unsafe { std::slice::from_raw_parts_mut(ptr.0.add(start), size) };
                    for node in slice.iter_mut() {
                        *node = Node(*node).with_offset_cleared().into();
                    }
                });
            }
        });
    });
}
