//! # Heap Region Extension
//!
//! The seam between the allocator and whatever provides its backing memory.
//!
//! The allocator never maps or reserves memory itself; it asks an
//! [`ExtendRegion`] implementation to grow a single contiguous region at its
//! high end and lays blocks out in the returned space. Growth is monotonic:
//! once handed out, bytes are never returned to the backend.
//!
//! [`ArenaRegion`] is the bundled backend: a bump pointer over a fixed byte
//! range supplied by the caller, suitable for hosted use and tests.

#![cfg_attr(not(any(test, doctest)), no_std)]

mod arena;

pub use arena::ArenaRegion;

use segheap_words::HeapAddress;

/// Errors surfaced by a region backend.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegionError {
    /// The backend refused to grow the region.
    #[error("heap region exhausted")]
    Exhausted,
}

/// A contiguous, monotonically growable memory region.
///
/// # Contract
/// - `extend(bytes)` grows the region by `bytes` at its high end and returns
///   the address of the first new byte (the old high-water mark).
/// - Successive calls return strictly increasing, gap-free addresses.
/// - The base of the region is aligned to at least one heap word; callers
///   keep payload alignment by only requesting word-multiple sizes.
pub trait ExtendRegion {
    /// Grow the region by `bytes` bytes.
    ///
    /// # Errors
    /// [`RegionError::Exhausted`] when the backend cannot grow any further.
    /// A failed call must leave the region unchanged.
    fn extend(&mut self, bytes: usize) -> Result<HeapAddress, RegionError>;
}
