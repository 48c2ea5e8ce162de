//! Suffix array / PLCP construction, and 32→64 bit widening in place.
//!
//! `esa_matchfinder.h` declares the SA and PLCP builders as external
//! collaborators ("any linear-time implementation suffices; the core does
//! not depend on internals"). [`SuffixArrayBuilder`] is that seam;
//! [`DefaultBuilder`] is a correct, dependency-free reference implementation
//! (prefix-doubling SA construction, Kasai's algorithm for PLCP) suitable for
//! testing and for callers who don't supply a faster linear-time builder of
//! their own (e.g. SA-IS, DivSufSort).
//!
//! [`widen_in_place`] is not part of that seam — it is this crate's own
//! logic, ported directly from
//! `esa_matchfinder_convert_inplace_32u_to_64u_omp` /
//! `esa_matchfinder_convert_{left_to_right,right_to_left}_32u_to_64u`.

use crate::error::{Error, Result};

/// Builds the suffix array and permuted LCP array for a block. Both outputs
/// are indexed in `i32` range, per spec: `build_SA(block) -> SA[0..n)` and
/// `build_PLCP(block, SA) -> PLCP[0..n)`.
pub trait SuffixArrayBuilder {
    /// `SA[i]` is the starting position of the `i`-th lexicographically
    /// smallest suffix of `block`.
    fn build_sa(&self, block: &[u8]) -> Result<Vec<i32>>;

    /// `PLCP[p]` is the longest common prefix length between `T[p..]` and
    /// the lexicographically preceding suffix in `sa`.
    fn build_plcp(&self, block: &[u8], sa: &[i32]) -> Result<Vec<i32>>;
}

/// Prefix-doubling suffix array construction (`O(n log^2 n)`) plus Kasai's
/// algorithm for the PLCP array. Fully safe, deterministic, and
/// dependency-free — the reference default when no faster external builder
/// is supplied.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultBuilder;

impl SuffixArrayBuilder for DefaultBuilder {
    fn build_sa(&self, block: &[u8]) -> Result<Vec<i32>> {
        Ok(build_sa_prefix_doubling(block))
    }

    fn build_plcp(&self, block: &[u8], sa: &[i32]) -> Result<Vec<i32>> {
        if sa.len() != block.len() {
            return Err(Error::Internal);
        }
        Ok(build_plcp_kasai(block, sa))
    }
}

fn build_sa_prefix_doubling(block: &[u8]) -> Vec<i32> {
    let n = block.len();
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![0];
    }

    let mut sa: Vec<i32> = (0..n as i32).collect();
    let mut rank: Vec<i32> = block.iter().map(|&b| b as i32).collect();
    let mut tmp = vec![0i32; n];

    let mut k: usize = 1;
    loop {
        let key = |i: usize| -> (i32, i32) {
            let second = if i + k < n { rank[i + k] } else { -1 };
            (rank[i], second)
        };

        sa.sort_unstable_by_key(|&i| key(i as usize));

        tmp[sa[0] as usize] = 0;
        for i in 1..n {
            let prev = sa[i - 1] as usize;
            let cur = sa[i] as usize;
            tmp[cur] = tmp[prev] + i32::from(key(prev) < key(cur));
        }
        rank.copy_from_slice(&tmp);

        if rank[sa[n - 1] as usize] as usize == n - 1 {
            break;
        }
        k <<= 1;
        if k > n {
            break;
        }
    }

    sa
}

fn build_plcp_kasai(block: &[u8], sa: &[i32]) -> Vec<i32> {
    let n = block.len();
    let mut rank = vec![0i32; n];
    for (i, &s) in sa.iter().enumerate() {
        rank[s as usize] = i as i32;
    }

    let mut plcp = vec![0i32; n];
    let mut h: usize = 0;
    for i in 0..n {
        let r = rank[i] as usize;
        if r > 0 {
            let j = sa[r - 1] as usize;
            while i + h < n && j + h < n && block[i + h] == block[j + h] {
                h += 1;
            }
            plcp[i] = h as i32;
            h = h.saturating_sub(1);
        } else {
            h = 0;
        }
    }
    plcp
}

// ─────────────────────────────────────────────────────────────────────────
// 32→64 bit widening in place
// ─────────────────────────────────────────────────────────────────────────

use crate::racy::RacyPtr;

#[inline]
unsafe fn convert_left_to_right(s: *const u32, d: *mut u64, start: isize, size: isize) {
    for off in 0..size {
        let i = start + off;
        let v = *s.offset(i) as u64;
        *d.offset(i) = v;
    }
}

#[inline]
unsafe fn convert_right_to_left(s: *const u32, d: *mut u64, start: isize, size: isize) {
    let mut i = start + size - 1;
    while i >= start {
        let v = *s.offset(i) as u64;
        *d.offset(i) = v;
        i -= 1;
    }
}

/// Widens the first `n` `u32` values at `s` into `u64` values at `d`, where
/// `s` and `d` are the same base address reinterpreted at two widths (i.e.
/// `d.offset(i)` and `s.offset(i)` occupy different, non-corresponding byte
/// ranges of one shared buffer).
///
/// Two passes avoid aliasing hazards: while the unconverted prefix is at
/// least 64 KiB, its upper half is converted left-to-right in parallel —
/// each write lands beyond the byte footprint of the still-unconverted
/// prefix, in space the allocation reserves for exactly this purpose. Once
/// the unconverted prefix drops below 64 KiB, a single right-to-left pass
/// finishes it; that direction never overwrites a word before it has been
/// read, because writes always advance to a higher byte offset than the
/// read that feeds them.
///
/// # Safety
/// `s` and `d` must both be valid for `2*n` `u32` widths (i.e. `n` `u64`
/// widths) of reads/writes at the given base address, and must alias the
/// same underlying storage (as produced by [`crate::storage::Storage`]).
pub unsafe fn widen_in_place(s: *mut u32, d: *mut u64, n: usize, num_threads: usize) {
    let mut remaining = n as isize;

    while remaining >= 65536 {
        let block_size = remaining >> 1;
        remaining -= block_size;

        if num_threads > 1 {
            let stride = ((block_size as usize) / num_threads) & !15usize;
            let stride = stride.max(1) as isize;
            let s_ptr = RacyPtr(s as *mut u32);
            let d_ptr = RacyPtr(d);

            let base = remaining;
            rayon::scope(|scope| {
                let mut start = 0isize;
                while start < block_size {
                    let this_start = start;
                    let this_size = (block_size - start).min(stride);
                    scope.spawn(move |_| unsafe {
                        convert_left_to_right(
                            s_ptr.0 as *const u32,
                            d_ptr.0,
                            base + this_start,
                            this_size,
                        );
                    });
                    start += this_size;
                }
            });
        } else {
            convert_left_to_right(s as *const u32, d, remaining, block_size);
        }
    }

    convert_right_to_left(s as *const u32, d, 0, remaining);
}
