//! Raw boundary-tag operations.
//!
//! Everything here works on **payload addresses** (`bp`): the first byte
//! after a block's header. These functions are correct only between valid
//! block boundaries; the prologue and epilogue guarantee the base cases at
//! the heap's ends. All raw-pointer traffic of the allocator funnels through
//! this module.

use segheap_words::layout::WORD;
use segheap_words::{BlockTag, HeapAddress};

/// Read the tag word at `at`.
///
/// # Safety
/// `at` must point at a live header or footer word of this heap.
#[inline]
pub(crate) unsafe fn read_tag(at: HeapAddress) -> BlockTag {
    BlockTag::from_raw(unsafe { at.as_ptr::<usize>().read() })
}

/// Write the tag word at `at`.
///
/// # Safety
/// `at` must point at a header or footer word position of this heap.
#[inline]
pub(crate) unsafe fn write_tag(at: HeapAddress, tag: BlockTag) {
    unsafe { at.as_mut_ptr::<usize>().write(tag.as_raw()) }
}

/// Address of the header of the block with payload `bp`.
#[inline]
pub(crate) const fn header(bp: HeapAddress) -> HeapAddress {
    bp.sub(WORD)
}

/// Size in bytes of the block with payload `bp`.
///
/// # Safety
/// `bp` must be the payload address of a valid block.
#[inline]
pub(crate) unsafe fn size(bp: HeapAddress) -> usize {
    unsafe { read_tag(header(bp)) }.size()
}

/// Whether the block with payload `bp` is allocated.
///
/// # Safety
/// `bp` must be the payload address of a valid block.
#[inline]
pub(crate) unsafe fn is_allocated(bp: HeapAddress) -> bool {
    unsafe { read_tag(header(bp)) }.is_allocated()
}

/// Address of the footer of the block with payload `bp`.
///
/// # Safety
/// `bp` must be the payload address of a valid block whose header is intact.
#[inline]
pub(crate) unsafe fn footer(bp: HeapAddress) -> HeapAddress {
    bp.add(unsafe { size(bp) }).sub(2 * WORD)
}

/// Payload address of the next block in the heap.
///
/// # Safety
/// `bp` must be the payload address of a valid block below the epilogue.
#[inline]
pub(crate) unsafe fn next_block(bp: HeapAddress) -> HeapAddress {
    bp.add(unsafe { size(bp) })
}

/// Payload address of the previous block in the heap.
///
/// Reads the previous block's footer, which sits one word below our header.
///
/// # Safety
/// `bp` must be the payload address of a valid block above the prologue.
#[inline]
pub(crate) unsafe fn prev_block(bp: HeapAddress) -> HeapAddress {
    bp.sub(unsafe { read_tag(bp.sub(2 * WORD)) }.size())
}

/// Stamp header and footer of the block at `bp` with `(size, allocated)`.
///
/// The footer position is derived from the new size, so this also works when
/// resizing a block in place.
///
/// # Safety
/// `[bp - WORD, bp + size)` must lie within the managed region and form a
/// valid block boundary.
#[inline]
pub(crate) unsafe fn stamp(bp: HeapAddress, size: usize, allocated: bool) {
    let tag = BlockTag::new(size, allocated);
    unsafe {
        write_tag(header(bp), tag);
        write_tag(bp.add(size).sub(2 * WORD), tag);
    }
}
