//! # Segregated-Fit Heap Allocator
//!
//! A dynamic memory allocator over a contiguous, monotonically growing
//! region, with first-fit placement across segregated free lists,
//! boundary-tag coalescing, and in-place reallocation fast paths.
//!
//! ## Heap layout
//!
//! Addresses grow upward. Every block carries a one-word header and an
//! identical one-word footer packing `(size, allocated)`; free blocks embed
//! a two-pointer list node in their payload. Synthetic allocated blocks at
//! both ends remove the edge cases from coalescing:
//!
//! ```text
//! ┌──────────────┬──────────────┬─────────────────────────┬──────────────┐
//! │ prologue hdr │ prologue ftr │   ... regular blocks ... │ epilogue hdr │
//! └──────────────┴──────────────┴─────────────────────────┴──────────────┘
//! ```
//!
//! Free blocks are indexed by twelve circular doubly-linked lists, one per
//! power-of-two size class starting at 32 bytes; the last bucket is
//! open-ended. Placement scans the smallest feasible bucket first, capped at
//! [`SCAN_LIMIT`] candidates per bucket, then escalates.
//!
//! ## Design outline
//! - **Storage**: any [`ExtendRegion`](segheap_region::ExtendRegion)
//!   backend; the allocator only ever grows the region at its high end.
//! - **Context**: all state lives in a caller-owned [`SegHeap`] value (the
//!   list sentinels are carved from the region itself, so the value stays
//!   movable). Independent heaps over separate regions are possible.
//! - **Coalescing** is eager: no two adjacent free blocks ever coexist.
//!
//! ## Typical Usage
//!
//! ```rust
//! use segheap::SegHeap;
//! use segheap_region::ArenaRegion;
//!
//! let mut backing = vec![0u8; 1 << 20].into_boxed_slice();
//! let region = unsafe { ArenaRegion::new(backing.as_mut_ptr(), backing.len()) };
//! let mut heap = SegHeap::init(region).expect("backing is large enough");
//!
//! let p = heap.alloc(100);
//! assert!(!p.is_null());
//! let p = unsafe { heap.realloc(p, 500) };
//! unsafe { heap.free(p) };
//! ```
//!
//! ## Caveats
//! - Single-threaded by design; wrap externally if cross-thread access is
//!   ever needed.
//! - Blocks never shrink and the region is never returned to the backend.
//! - Freeing a pointer this heap did not return is undefined behavior and is
//!   not detected.

#![cfg_attr(not(any(test, doctest)), no_std)]

mod block;
mod check;
mod free_list;
mod heap;

pub use check::HeapStats;
pub use free_list::NUM_BUCKETS;
pub use heap::{CHUNKSIZE, InitError, SCAN_LIMIT, SegHeap};
