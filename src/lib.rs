//! Enhanced suffix array (ESA) based match-finder for LZ factorization.
//!
//! Given a block of bytes, [`MatchFinder`] builds a compact interval-tree
//! representation of the block's suffix array once, then answers a stream of
//! "what matched before here" queries — one per position, strictly
//! left-to-right unless [`MatchFinder::rewind`] repositions the cursor —
//! each in time proportional to the match's own depth in the tree rather
//! than to the block size.
//!
//! ```
//! use esa_matchfinder::MatchFinder;
//!
//! let mut mf = MatchFinder::create(64, 2, 64, 1).unwrap();
//! mf.parse(b"abcabcabcabc").unwrap();
//!
//! let mut matches = Vec::new();
//! for _ in 0..12 {
//!     mf.find_all_matches(&mut matches);
//! }
//! ```

mod build;
mod consts;
mod cursor;
mod enumerate;
mod error;
mod matchfinder;
mod node;
mod pool;
mod racy;
mod sa;
mod storage;

pub use consts::{
    MAX_BLOCK_SIZE, MAX_MATCH_LENGTH, MIN_MATCH_LENGTH, NUM_THREADS_MAX, VERSION_MAJOR,
    VERSION_MINOR, VERSION_PATCH, VERSION_STRING,
};
pub use enumerate::Match;
pub use error::{Error, Result};
pub use matchfinder::MatchFinder;
pub use sa::{DefaultBuilder, SuffixArrayBuilder};

/// Returns the packed version number (e.g. `10100` for `1.1.0`), the way
/// `esa_matchfinder_version_number` reports `ESA_MATCHFINDER_VERSION_NUMBER`.
pub fn version_number() -> u32 {
    VERSION_MAJOR * 100 * 100 + VERSION_MINOR * 100 + VERSION_PATCH
}

/// Returns the library version string, e.g. `"1.1.0"`.
pub fn version_string() -> &'static str {
    VERSION_STRING
}
