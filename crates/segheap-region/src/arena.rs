use crate::{ExtendRegion, RegionError};
use segheap_words::HeapAddress;
use segheap_words::layout::WORD;

/// Bump backend over a fixed, caller-provided byte range.
///
/// The arena hands out `[base, base + capacity)` front to back and refuses
/// growth past the end. It never reads or writes the range itself; it only
/// does address arithmetic.
pub struct ArenaRegion {
    base: usize,
    capacity: usize,
    /// Bytes handed out so far.
    brk: usize,
}

impl ArenaRegion {
    /// Wrap the range `[base, base + capacity)`.
    ///
    /// # Safety
    /// - The range must be valid, writable, and exclusive to the allocator
    ///   built on top for the arena's whole lifetime.
    /// - `base` must be aligned to at least one heap word.
    #[must_use]
    pub unsafe fn new(base: *mut u8, capacity: usize) -> Self {
        let base = base as usize;
        debug_assert!(base % WORD == 0, "arena base must be word aligned");
        Self {
            base,
            capacity,
            brk: 0,
        }
    }

    /// Current high-water address (the next address `extend` would return).
    #[inline]
    #[must_use]
    pub const fn high_water(&self) -> HeapAddress {
        HeapAddress::new(self.base + self.brk)
    }

    /// Bytes still available for extension.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.capacity - self.brk
    }
}

impl ExtendRegion for ArenaRegion {
    fn extend(&mut self, bytes: usize) -> Result<HeapAddress, RegionError> {
        if bytes > self.remaining() {
            return Err(RegionError::Exhausted);
        }
        let old = self.high_water();
        self.brk += bytes;
        Ok(old)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena(capacity: usize) -> ArenaRegion {
        let buf = Box::leak(vec![0u8; capacity].into_boxed_slice());
        unsafe { ArenaRegion::new(buf.as_mut_ptr(), buf.len()) }
    }

    #[test]
    fn grows_monotonically() {
        let mut region = arena(256);
        let a = region.extend(64).unwrap();
        let b = region.extend(32).unwrap();
        assert_eq!(b.as_usize() - a.as_usize(), 64);
        assert_eq!(region.remaining(), 160);
        assert_eq!(region.high_water(), b.add(32));
    }

    #[test]
    fn refuses_past_capacity() {
        let mut region = arena(64);
        region.extend(64).unwrap();
        assert_eq!(region.extend(1), Err(RegionError::Exhausted));
        // a failed call leaves the region unchanged
        assert_eq!(region.remaining(), 0);
    }

    #[test]
    fn exact_fit_is_allowed() {
        let mut region = arena(128);
        region.extend(96).unwrap();
        assert!(region.extend(32).is_ok());
        assert_eq!(region.extend(8), Err(RegionError::Exhausted));
    }
}
