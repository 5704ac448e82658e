//! Layout constants shared across the heap.

/// Size of one heap word in bytes.
///
/// All tags are one word; all block sizes are counted in bytes but are
/// multiples of [`ALIGNMENT`]. Supported targets have pointer-sized words of
/// 8 bytes.
pub const WORD: usize = size_of::<usize>();

/// Payload alignment guaranteed to callers, in bytes.
pub const ALIGNMENT: usize = 8;

/// Smallest size any block may occupy, in bytes.
///
/// Header and footer take one word each; a free block must additionally hold
/// a two-pointer list node in its payload, giving four words total.
pub const MIN_BLOCK: usize = 4 * WORD;

const _: () = assert!(WORD == 8, "heap words are 8 bytes on supported targets");

/// Round `size` up to the next multiple of [`ALIGNMENT`].
#[inline]
#[must_use]
pub const fn align_up(size: usize) -> usize {
    (size + (ALIGNMENT - 1)) & !(ALIGNMENT - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_up_rounds_to_eight() {
        assert_eq!(align_up(0), 0);
        assert_eq!(align_up(1), 8);
        assert_eq!(align_up(8), 8);
        assert_eq!(align_up(9), 16);
        assert_eq!(align_up(100), 104);
    }

    #[test]
    fn min_block_holds_tags_and_node() {
        // header + footer + two payload words for the free-list node
        assert_eq!(MIN_BLOCK, 32);
    }
}
