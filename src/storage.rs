//! Aligned scratch storage backing a parsed block.
//!
//! A single 64-byte-aligned allocation is reinterpreted in two layouts over
//! its lifetime:
//!
//! - During `parse`, the first `2 * padded_words` `i32` slots hold the
//!   suffix array (and whatever scratch space the SA builder used), and the
//!   following `padded_words` `u32` slots hold the PLCP array.
//! - After [`widen_sa_in_place`](Storage::widen_sa_in_place) runs, the same
//!   first region is read back as `padded_words` `u64` slots (the packed
//!   `sa_parent_link` array), and the `u32` region has been rewritten in
//!   place, index by index, from PLCP values into leaf-node indices (the
//!   `plcp_leaf_link` array) by the interval-tree builder.
//!
//! `padded_words` rounds `max_block_size` up to a multiple of
//! [`STORAGE_PADDING`] and is never less than `STORAGE_PADDING`, so the root
//! sentinel slot and the guard margins the prefetching code relies on are
//! always backed by real memory, even for a degenerate `max_block_size == 0`
//! match-finder.

use std::alloc::{self, Layout};
use std::ptr::NonNull;
use std::slice;

use crate::consts::STORAGE_PADDING;

#[inline]
fn align_up(value: usize, align: usize) -> usize {
    (value + align - 1) / align * align
}

pub struct Storage {
    ptr: NonNull<u8>,
    layout: Layout,
    /// Capacity of the SA/parent and leaf regions, in words (`i64`/`u32`
    /// elements), rounded up from the caller's `max_block_size`.
    padded_words: usize,
}

// SAFETY: `Storage` owns its allocation exclusively; no aliasing occurs
// across threads except through the disjoint, index-range-partitioned
// slices handed out by its accessors, which is the caller's responsibility
// to keep non-overlapping (as the parallel builders in this crate do).
unsafe impl Send for Storage {}
unsafe impl Sync for Storage {}

impl Storage {
    pub fn new(max_block_size: usize) -> Storage {
        let padded_words = align_up(max_block_size, STORAGE_PADDING).max(STORAGE_PADDING);
        let total_i32_slots = 2 * STORAGE_PADDING + 3 * padded_words;
        let byte_len = total_i32_slots * core::mem::size_of::<i32>();
        let layout = Layout::from_size_align(byte_len, 64).expect("storage layout overflow");

        // SAFETY: byte_len is nonzero (padded_words >= STORAGE_PADDING > 0).
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        let ptr = NonNull::new(raw).unwrap_or_else(|| alloc::handle_alloc_error(layout));

        Storage {
            ptr,
            layout,
            padded_words,
        }
    }

    pub fn padded_words(&self) -> usize {
        self.padded_words
    }

    #[inline]
    fn base(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    #[inline]
    fn sa_byte_offset(&self) -> usize {
        STORAGE_PADDING * core::mem::size_of::<i32>()
    }

    #[inline]
    fn leaf_byte_offset(&self) -> usize {
        (STORAGE_PADDING + 2 * self.padded_words) * core::mem::size_of::<i32>()
    }

    /// The SA/parent region viewed as `i32`, `2 * padded_words` elements
    /// wide — large enough for an external SA builder that needs scratch
    /// space beyond the live `[0, n)` suffix array values.
    pub fn sa_region_i32_mut(&mut self) -> &mut [i32] {
        let len = 2 * self.padded_words;
        unsafe { slice::from_raw_parts_mut(self.base().add(self.sa_byte_offset()).cast(), len) }
    }

    /// The SA/parent region viewed as `u64` (valid only after
    /// [`widen_sa_in_place`](Storage::widen_sa_in_place) has run for the
    /// current parse).
    pub fn sa_region_u64_mut(&mut self) -> &mut [u64] {
        let len = self.padded_words;
        unsafe { slice::from_raw_parts_mut(self.base().add(self.sa_byte_offset()).cast(), len) }
    }

    pub fn sa_region_u64(&self) -> &[u64] {
        let len = self.padded_words;
        unsafe { slice::from_raw_parts(self.base().add(self.sa_byte_offset()).cast(), len) }
    }

    pub fn leaf_region_u32_mut(&mut self) -> &mut [u32] {
        let len = self.padded_words;
        unsafe { slice::from_raw_parts_mut(self.base().add(self.leaf_byte_offset()).cast(), len) }
    }

    pub fn leaf_region_u32(&self) -> &[u32] {
        let len = self.padded_words;
        unsafe { slice::from_raw_parts(self.base().add(self.leaf_byte_offset()).cast(), len) }
    }

    /// Borrow both regions simultaneously. Safe because the two byte ranges
    /// within the single allocation never overlap.
    pub fn split_parent_and_leaf_mut(&mut self) -> (&mut [u64], &mut [u32]) {
        let sa_len = self.padded_words;
        let leaf_len = self.padded_words;
        let sa_ptr = unsafe { self.base().add(self.sa_byte_offset()).cast::<u64>() };
        let leaf_ptr = unsafe { self.base().add(self.leaf_byte_offset()).cast::<u32>() };
        unsafe {
            (
                slice::from_raw_parts_mut(sa_ptr, sa_len),
                slice::from_raw_parts_mut(leaf_ptr, leaf_len),
            )
        }
    }

    /// Widens the first `n` `i32` values of the SA region into `u64` values
    /// occupying the same byte range, in place. See [`crate::sa::widen_in_place`].
    pub fn widen_sa_in_place(&mut self, n: usize, num_threads: usize) {
        let base = unsafe { self.base().add(self.sa_byte_offset()) };
        let s_ptr = base.cast::<u32>();
        let d_ptr = base.cast::<u64>();
        // SAFETY: s_ptr/d_ptr alias the same `2 * padded_words` i32-wide
        // region; `n <= padded_words` is upheld by `Storage`'s caller
        // (`MatchFinder::parse`, which validates `block_size <= max_block_size`).
        unsafe { crate::sa::widen_in_place(s_ptr, d_ptr, n, num_threads) };
    }

    /// Zeroes the front guard pad and the `STORAGE_PADDING` slots
    /// immediately after the live leaf-link entries, so prefetch-ahead reads
    /// past `block_size` observe zeros instead of stale data from a prior
    /// parse.
    pub fn zero_guards(&mut self, block_size: usize) {
        unsafe {
            std::ptr::write_bytes(self.base(), 0, self.sa_byte_offset());

            let tail_start = self.leaf_byte_offset() + block_size * core::mem::size_of::<u32>();
            let tail_len = STORAGE_PADDING * core::mem::size_of::<u32>();
            debug_assert!(tail_start + tail_len <= self.layout.size());
            std::ptr::write_bytes(self.base().add(tail_start), 0, tail_len);
        }
    }
}

impl Drop for Storage {
    fn drop(&mut self) {
        unsafe { alloc::dealloc(self.base(), self.layout) };
    }
}
