//! Heap consistency checking and diagnostics.
//!
//! The checker walks the heap front to back and every bucket list, writing
//! one line per violated invariant to a caller-supplied sink. It never
//! panics and never repairs anything; callers decide what to do with a
//! non-zero violation count.

use crate::block;
use crate::free_list::{self, NUM_BUCKETS};
use crate::heap::SegHeap;
use core::fmt::Write;
use core::ptr;
use segheap_words::HeapAddress;
use segheap_words::layout::{ALIGNMENT, MIN_BLOCK, WORD};

/// Aggregate numbers from a heap walk.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct HeapStats {
    /// Number of free blocks.
    pub free_blocks: usize,
    /// Bytes held by free blocks, tags included.
    pub free_bytes: usize,
    /// Bytes spanned by all regular blocks (prologue and epilogue excluded).
    pub heap_bytes: usize,
}

impl<R> SegHeap<R> {
    /// Walk the heap and the free lists, reporting every invariant
    /// violation to `sink` and returning the violation count.
    ///
    /// With `verbose`, every block is printed before it is checked.
    #[must_use]
    pub fn check_heap(&self, verbose: bool, sink: &mut dyn Write) -> usize {
        let mut violations = 0;
        let mut free_in_heap = 0;

        let prologue = self.heap_start();
        if verbose {
            let _ = writeln!(sink, "heap ({prologue}):");
        }

        // SAFETY: heap_start is the prologue payload of an initialized heap;
        // the walk below stays between prologue and epilogue by construction.
        unsafe {
            if block::size(prologue) != 2 * WORD || !block::is_allocated(prologue) {
                violations += 1;
                let _ = writeln!(sink, "bad prologue header at {prologue}");
            }
            violations += check_block(prologue, sink);

            let mut prev_free = false;
            let mut bp = block::next_block(prologue);
            while block::size(bp) > 0 {
                if verbose {
                    print_block(bp, sink);
                }
                violations += check_block(bp, sink);
                if block::size(bp) < MIN_BLOCK {
                    violations += 1;
                    let _ = writeln!(sink, "undersized block at {bp}");
                }
                if block::prev_block(block::next_block(bp)) != bp {
                    violations += 1;
                    let _ = writeln!(sink, "footer walk disagrees with header walk at {bp}");
                }

                let free = !block::is_allocated(bp);
                if free {
                    free_in_heap += 1;
                    if prev_free {
                        violations += 1;
                        let _ = writeln!(sink, "two adjacent free blocks at {bp}");
                    }
                    if !self.bucket_holds(bp) {
                        violations += 1;
                        let _ = writeln!(sink, "free block at {bp} missing from its bucket");
                    }
                }
                prev_free = free;
                bp = block::next_block(bp);
            }

            if verbose {
                let _ = writeln!(sink, "{bp}: end of heap");
            }
            if block::size(bp) != 0 || !block::is_allocated(bp) {
                violations += 1;
                let _ = writeln!(sink, "bad epilogue header at {bp}");
            }

            // Second direction: everything listed must be a free block in
            // the bucket its size selects.
            let mut free_in_lists = 0;
            for bucket in 0..NUM_BUCKETS {
                let sentinel = self.lists().sentinel(bucket);
                let mut cursor = (*sentinel).next;
                while !ptr::eq(cursor, sentinel) {
                    free_in_lists += 1;
                    let bp = HeapAddress::from_ptr(cursor);
                    if block::is_allocated(bp) {
                        violations += 1;
                        let _ = writeln!(sink, "allocated block at {bp} on free list {bucket}");
                    }
                    if free_list::bucket_for(block::size(bp)) != bucket {
                        violations += 1;
                        let _ = writeln!(sink, "block at {bp} filed in wrong bucket {bucket}");
                    }
                    cursor = (*cursor).next;
                }
            }
            if free_in_lists != free_in_heap {
                violations += 1;
                let _ = writeln!(
                    sink,
                    "free-block count mismatch: {free_in_heap} in heap, {free_in_lists} listed"
                );
            }
        }

        violations
    }

    /// Heap aggregates from a front-to-back walk.
    #[must_use]
    pub fn stats(&self) -> HeapStats {
        let mut stats = HeapStats::default();
        // SAFETY: same walk bounds as check_heap.
        unsafe {
            let mut bp = block::next_block(self.heap_start());
            while block::size(bp) > 0 {
                stats.heap_bytes += block::size(bp);
                if !block::is_allocated(bp) {
                    stats.free_blocks += 1;
                    stats.free_bytes += block::size(bp);
                }
                bp = block::next_block(bp);
            }
        }
        stats
    }

    /// Whether the bucket selected by `bp`'s size actually links `bp`.
    fn bucket_holds(&self, bp: HeapAddress) -> bool {
        // SAFETY: caller established bp as a valid free block.
        unsafe {
            let sentinel = self.lists().sentinel(free_list::bucket_for(block::size(bp)));
            let needle = free_list::node(bp);
            let mut cursor = (*sentinel).next;
            while !ptr::eq(cursor, sentinel) {
                if ptr::eq(cursor, needle) {
                    return true;
                }
                cursor = (*cursor).next;
            }
        }
        false
    }
}

/// Per-block checks: payload alignment, tag agreement, size granularity.
unsafe fn check_block(bp: HeapAddress, sink: &mut dyn Write) -> usize {
    let mut violations = 0;
    if !bp.is_aligned(ALIGNMENT) {
        violations += 1;
        let _ = writeln!(sink, "payload at {bp} is not {ALIGNMENT}-byte aligned");
    }
    unsafe {
        let header = block::read_tag(block::header(bp));
        let footer = block::read_tag(block::footer(bp));
        if header != footer {
            violations += 1;
            let _ = writeln!(sink, "header {header:?} does not match footer {footer:?} at {bp}");
        }
        if header.size() % ALIGNMENT != 0 {
            violations += 1;
            let _ = writeln!(sink, "block size {} at {bp} is not aligned", header.size());
        }
    }
    violations
}

unsafe fn print_block(bp: HeapAddress, sink: &mut dyn Write) {
    unsafe {
        let header = block::read_tag(block::header(bp));
        let footer = block::read_tag(block::footer(bp));
        let _ = writeln!(sink, "{bp}: header {header:?}, footer {footer:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::CHUNKSIZE;
    use segheap_region::ArenaRegion;
    use segheap_words::BlockTag;

    fn fresh_heap() -> SegHeap<ArenaRegion> {
        let buf = Box::leak(vec![0u8; 1 << 20].into_boxed_slice());
        let region = unsafe { ArenaRegion::new(buf.as_mut_ptr(), buf.len()) };
        SegHeap::init(region).expect("arena large enough for init")
    }

    #[test]
    fn fresh_heap_is_consistent() {
        let heap = fresh_heap();
        let mut report = String::new();
        assert_eq!(heap.check_heap(false, &mut report), 0, "{report}");
        assert!(report.is_empty());
    }

    #[test]
    fn verbose_walk_prints_every_block() {
        let mut heap = fresh_heap();
        let p = heap.alloc(100);
        assert!(!p.is_null());
        let mut report = String::new();
        assert_eq!(heap.check_heap(true, &mut report), 0);
        // prologue line, two block lines, end-of-heap line
        assert_eq!(report.lines().count(), 4);
    }

    #[test]
    fn detects_a_clobbered_footer() {
        let mut heap = fresh_heap();
        let p = heap.alloc(100);
        assert!(!p.is_null());

        let bp = HeapAddress::from_ptr(p);
        unsafe {
            let footer = block::footer(bp);
            block::write_tag(footer, BlockTag::new(block::size(bp), false));
        }

        let mut report = String::new();
        assert!(heap.check_heap(false, &mut report) > 0);
        assert!(report.contains("footer"));

        // Undo so the heap drops cleanly in later reuse of the arena.
        unsafe {
            let size = block::size(bp);
            block::write_tag(block::footer(bp), BlockTag::new(size, true));
        }
    }

    #[test]
    fn detects_a_delisted_free_block() {
        let mut heap = fresh_heap();
        let p = heap.alloc(100);
        let q = heap.alloc(100);
        assert!(!q.is_null());
        unsafe { heap.free(p) };

        // Unlink the freed block behind the allocator's back.
        unsafe { crate::free_list::FreeLists::remove(HeapAddress::from_ptr(p)) };

        let mut report = String::new();
        assert!(heap.check_heap(false, &mut report) >= 2);
        assert!(report.contains("missing from its bucket"));
        assert!(report.contains("count mismatch"));
    }

    #[test]
    fn stats_track_alloc_and_free() {
        let mut heap = fresh_heap();
        assert_eq!(
            heap.stats(),
            HeapStats {
                free_blocks: 1,
                free_bytes: CHUNKSIZE,
                heap_bytes: CHUNKSIZE
            }
        );

        let p = heap.alloc(100);
        let stats = heap.stats();
        assert_eq!(stats.free_bytes, CHUNKSIZE - 120);
        assert_eq!(stats.heap_bytes, CHUNKSIZE);

        unsafe { heap.free(p) };
        assert_eq!(heap.stats().free_bytes, CHUNKSIZE);
    }
}
