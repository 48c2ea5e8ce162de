//! Compile-time configuration constants.
//!
//! Migrated from `esa_matchfinder.h` / `esa_matchfinder.c`. Unlike the LZ4
//! reference this crate ports from, the ESA match-finder has no environment
//! variables or CLI switches to tune at runtime — every knob here is either
//! a hard compile-time bound or a `MatchFinder::create` constructor argument
//! validated once and frozen for the lifetime of the handle.

/// Bit-width of the packed `lcp_excess` field. Corresponds to
/// `ESA_MATCHFINDER_MATCH_BITS`.
pub const MATCH_BITS: u32 = 6;

/// Largest block this crate can index. Corresponds to
/// `ESA_MATCHFINDER_MAX_BLOCK_SIZE = 1 << ((64 - MATCH_BITS) / 2)`.
pub const MAX_BLOCK_SIZE: i64 = 1i64 << ((64 - MATCH_BITS as i64) / 2);

/// Smallest match length this crate will ever report. Corresponds to
/// `ESA_MATCHFINDER_MIN_MATCH_LENGTH`.
pub const MIN_MATCH_LENGTH: i32 = 2;

/// Largest match length representable in the `lcp_excess` field before
/// `min_match_length` is added back. Corresponds to
/// `ESA_MATCHFINDER_MAX_MATCH_LENGTH = 1 << MATCH_BITS`.
pub const MAX_MATCH_LENGTH: i32 = 1 << MATCH_BITS;

/// Returned by `create` on success and by `parse`/`rewind` when no error
/// occurred. Corresponds to `ESA_MATCHFINDER_NO_ERROR`.
pub const NO_ERROR: i32 = 0;

/// Returned by `parse`/`rewind` when a precondition was violated.
/// Corresponds to `ESA_MATCHFINDER_BAD_PARAMETER`.
pub const BAD_PARAMETER: i32 = -1;

/// Upper bound on the number of worker slabs the parallel interval-tree
/// builder will track per-thread reset ranges for. The reference
/// implementation bounds this at 256 OpenMP threads; this crate inherits
/// the same ceiling as a sanity cap on `num_threads`, not a hard limit
/// rayon itself imposes.
pub const NUM_THREADS_MAX: usize = 256;

/// Storage guard padding, in `i32` slots, placed before and after the live
/// SA/PLCP/leaf-link regions so prefetch-ahead reads never touch unmapped
/// or uninitialized memory. Corresponds to `ESA_MF_STORAGE_PADDING`.
pub const STORAGE_PADDING: usize = 64;

pub const VERSION_MAJOR: u32 = 1;
pub const VERSION_MINOR: u32 = 1;
pub const VERSION_PATCH: u32 = 0;
pub const VERSION_STRING: &str = "1.1.0";
