//! A raw pointer that asserts it is safe to move across threads.
//!
//! Every parallel phase in this crate (32→64 widening, interval-tree
//! construction, offset reset) partitions its target buffer into disjoint,
//! non-overlapping index ranges up front and hands one raw pointer to each
//! worker; no two workers ever touch the same byte. `RacyPtr` exists purely
//! to get that pointer past `rayon::scope`'s `Send` bound — it carries no
//! synchronization of its own, so getting the partition wrong is instant
//! undefined behavior. Every call site is `unsafe` and documents why its
//! particular partition is disjoint.

#[derive(Clone, Copy)]
pub(crate) struct RacyPtr<T>(pub(crate) *mut T);

unsafe impl<T> Send for RacyPtr<T> {}
unsafe impl<T> Sync for RacyPtr<T> {}

#[derive(Clone, Copy)]
pub(crate) struct RacyConstPtr<T>(pub(crate) *const T);

unsafe impl<T> Send for RacyConstPtr<T> {}
unsafe impl<T> Sync for RacyConstPtr<T> {}
