//! Error type for the ESA match-finder core.
//!
//! Mirrors the two-kind error model of `esa_matchfinder.h`: every fallible
//! operation returns `BadParameter` for a precondition violation or
//! `Internal` for a failure that originated in an external collaborator
//! (the suffix-array/PLCP builder, or allocation). This is the same manual,
//! non-`thiserror` enum style this codebase uses for `Lz4Error` and
//! `BlockDecompressError` — appropriate here too, since the core never needs
//! to format a message for an end user (that belongs to a caller-side CLI,
//! which is out of scope).

/// Errors surfaced by [`crate::MatchFinder`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A caller-supplied argument violated the operation's precondition.
    /// Never partially mutates state: the previously parsed block (if any)
    /// is left intact.
    BadParameter,
    /// A collaborator (suffix-array builder, PLCP builder, or allocator)
    /// failed. The parsed-block state is left invalid; only `destroy`
    /// (handled by `Drop` in this port) is safe to call afterwards.
    Internal,
}

/// Result alias used throughout this crate.
pub type Result<T> = core::result::Result<T, Error>;
