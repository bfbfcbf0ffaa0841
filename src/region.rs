//! Free-list allocation of element ranges inside one shared buffer.
//!
//! Operates purely on integer index spaces; knows nothing about GPU
//! buffers. The owning store decides when to grow and by how much.

use rustc_hash::FxHashMap;

/// A contiguous span of elements, `[start, start + len)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Span {
    start: u32,
    len: u32,
}

/// No free block is large enough for the request. The owning store grows
/// the index space and retries; this never reaches handle-level callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct OutOfSpace;

/// First-fit-exact / best-fit free-list allocator over `[0, capacity)`.
///
/// The free list stays sorted by start and fully coalesced: no two entries
/// are adjacent or overlapping. Allocated spans and free spans always
/// partition `[0, capacity)` exactly.
pub(crate) struct RegionAllocator {
    capacity: u32,
    /// Sorted by `start`; disjoint and non-adjacent.
    free: Vec<Span>,
    /// Live ranges, keyed by start.
    allocated: FxHashMap<u32, u32>,
}

impl RegionAllocator {
    /// Empty allocator with zero capacity; unusable until [`Self::grow`].
    pub(crate) fn new() -> Self {
        Self {
            capacity: 0,
            free: Vec::new(),
            allocated: FxHashMap::default(),
        }
    }

    pub(crate) const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Claim `len` contiguous elements and return the start index.
    ///
    /// An exact-size free block is preferred outright: most chunks allocate
    /// one of a few fixed sizes, so freed blocks are recycled whole instead
    /// of shredding larger blocks. Otherwise the smallest sufficient block
    /// wins, lowest start on ties, and `len` elements are split off its
    /// front.
    ///
    /// # Errors
    ///
    /// [`OutOfSpace`] when no free block is large enough.
    pub(crate) fn allocate(&mut self, len: u32) -> Result<u32, OutOfSpace> {
        assert!(len > 0, "zero-length region requested");
        let mut pick: Option<usize> = None;
        for (i, span) in self.free.iter().enumerate() {
            if span.len == len {
                pick = Some(i);
                break;
            }
            if span.len > len
                && pick.is_none_or(|best| span.len < self.free[best].len)
            {
                pick = Some(i);
            }
        }
        let Some(i) = pick else {
            return Err(OutOfSpace);
        };

        let span = &mut self.free[i];
        let start = span.start;
        span.start += len;
        span.len -= len;
        if span.len == 0 {
            let _ = self.free.remove(i);
        }
        let previous = self.allocated.insert(start, len);
        debug_assert!(previous.is_none());
        Ok(start)
    }

    /// Return the allocated span starting at `start` to the free list,
    /// coalescing with free neighbors on both sides.
    ///
    /// # Panics
    ///
    /// If `start` is not currently allocated. That is a double free or
    /// corrupted bookkeeping in the caller; continuing would hand the same
    /// range to two owners, so this aborts instead of reporting an error.
    pub(crate) fn free(&mut self, start: u32) {
        let removed = self.allocated.remove(&start);
        assert!(
            removed.is_some(),
            "freed offset {start} was never allocated (double free?)"
        );
        if let Some(len) = removed {
            self.release(start, len);
        }
    }

    /// Extend the index space by `additional` elements, making
    /// `[capacity, capacity + additional)` free. Never shrinks; only the
    /// owning store calls this.
    pub(crate) fn grow(&mut self, additional: u32) {
        if additional == 0 {
            return;
        }
        let start = self.capacity;
        self.capacity += additional;
        self.release(start, additional);
    }

    /// Insert a span into the free list, merging with an immediately
    /// preceding and/or following free span.
    fn release(&mut self, start: u32, len: u32) {
        let at = self.free.partition_point(|span| span.start < start);
        let mut merged = Span { start, len };

        if at < self.free.len()
            && merged.start + merged.len == self.free[at].start
        {
            merged.len += self.free[at].len;
            let _ = self.free.remove(at);
        }

        let touches_previous = at > 0 && {
            let previous = self.free[at - 1];
            previous.start + previous.len == merged.start
        };
        if touches_previous {
            self.free[at - 1].len += merged.len;
        } else {
            self.free.insert(at, merged);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Free and allocated spans must partition `[0, capacity)` exactly,
    /// and the free list must be sorted and fully coalesced.
    fn assert_partition(allocator: &RegionAllocator) {
        let mut spans: Vec<(u32, u32)> = allocator
            .free
            .iter()
            .map(|span| (span.start, span.len))
            .chain(allocator.allocated.iter().map(|(s, l)| (*s, *l)))
            .collect();
        spans.sort_unstable();
        let mut cursor = 0;
        for (start, len) in spans {
            assert_eq!(start, cursor, "gap or overlap at {cursor}");
            cursor += len;
        }
        assert_eq!(cursor, allocator.capacity());
        for pair in allocator.free.windows(2) {
            assert!(
                pair[0].start + pair[0].len < pair[1].start,
                "free list has adjacent uncoalesced spans"
            );
        }
    }

    fn with_capacity(capacity: u32) -> RegionAllocator {
        let mut allocator = RegionAllocator::new();
        allocator.grow(capacity);
        allocator
    }

    #[test]
    fn empty_allocator_is_out_of_space() {
        let mut allocator = RegionAllocator::new();
        assert_eq!(allocator.allocate(1), Err(OutOfSpace));
    }

    #[test]
    fn allocates_from_front() {
        let mut allocator = with_capacity(64);
        assert_eq!(allocator.allocate(16), Ok(0));
        assert_eq!(allocator.allocate(16), Ok(16));
        assert_partition(&allocator);
    }

    #[test]
    fn partition_invariant_through_interleaved_churn() {
        let mut allocator = with_capacity(128);
        let a = allocator.allocate(10).ok();
        let b = allocator.allocate(20).ok();
        let c = allocator.allocate(30).ok();
        assert_partition(&allocator);
        allocator.free(b.unwrap());
        assert_partition(&allocator);
        let d = allocator.allocate(5).ok();
        assert_partition(&allocator);
        allocator.free(a.unwrap());
        allocator.free(c.unwrap());
        assert_partition(&allocator);
        allocator.free(d.unwrap());
        assert_partition(&allocator);
        // Everything freed: one span covering the whole space.
        assert_eq!(allocator.free, vec![Span { start: 0, len: 128 }]);
    }

    #[test]
    fn adjacent_frees_coalesce_in_either_order() {
        for low_first in [true, false] {
            let mut allocator = with_capacity(64);
            let low = allocator.allocate(8).unwrap();
            let high = allocator.allocate(8).unwrap();
            let rest = allocator.allocate(48).unwrap();
            if low_first {
                allocator.free(low);
                allocator.free(high);
            } else {
                allocator.free(high);
                allocator.free(low);
            }
            assert_eq!(
                allocator.free,
                vec![Span { start: 0, len: 16 }],
                "low_first = {low_first}"
            );
            allocator.free(rest);
            assert_eq!(allocator.free, vec![Span { start: 0, len: 64 }]);
        }
    }

    #[test]
    fn three_way_coalescing_spans_both_neighbors() {
        let mut allocator = with_capacity(24);
        let a = allocator.allocate(8).unwrap();
        let b = allocator.allocate(8).unwrap();
        let c = allocator.allocate(8).unwrap();
        allocator.free(a);
        allocator.free(c);
        assert_eq!(allocator.free.len(), 2);
        allocator.free(b);
        assert_eq!(allocator.free, vec![Span { start: 0, len: 24 }]);
    }

    #[test]
    fn exact_fit_beats_larger_block() {
        let mut allocator = with_capacity(64);
        let exact = allocator.allocate(8).unwrap();
        let _pad = allocator.allocate(8).unwrap();
        allocator.free(exact);
        // Free list now holds [0, 8) and the [16, 64) tail; an 8-element
        // request must come from the exact block even though the tail is
        // also big enough.
        assert_eq!(allocator.allocate(8), Ok(exact));
        assert_partition(&allocator);
    }

    #[test]
    fn best_fit_picks_smallest_sufficient_block() {
        let mut allocator = with_capacity(100);
        let a = allocator.allocate(30).unwrap(); // [0, 30)
        let _b = allocator.allocate(10).unwrap(); // [30, 40)
        let c = allocator.allocate(12).unwrap(); // [40, 52)
        let _d = allocator.allocate(48).unwrap(); // [52, 100)
        allocator.free(a);
        allocator.free(c);
        // Free blocks: [0, 30) and [40, 52). An 11-element request fits
        // both; the 12-element block is the tighter fit.
        assert_eq!(allocator.allocate(11), Ok(c));
        assert_partition(&allocator);
    }

    #[test]
    fn best_fit_tie_breaks_on_lowest_start() {
        let mut allocator = with_capacity(30);
        let a = allocator.allocate(10).unwrap(); // [0, 10)
        let _b = allocator.allocate(10).unwrap(); // [10, 20)
        let c = allocator.allocate(10).unwrap(); // [20, 30)
        allocator.free(a);
        allocator.free(c);
        // Two equal-size free blocks; the earlier one wins.
        assert_eq!(allocator.allocate(4), Ok(0));
        assert_partition(&allocator);
    }

    #[test]
    fn grow_extends_trailing_free_space_without_a_seam() {
        let mut allocator = with_capacity(32);
        let a = allocator.allocate(16).unwrap();
        allocator.grow(32);
        assert_partition(&allocator);
        // [16, 32) and the new [32, 64) must have merged.
        assert_eq!(allocator.free, vec![Span { start: 16, len: 48 }]);
        assert_eq!(allocator.allocate(48), Ok(16));
        allocator.free(a);
        assert_partition(&allocator);
    }

    #[test]
    #[should_panic(expected = "never allocated")]
    fn double_free_aborts() {
        let mut allocator = with_capacity(16);
        let a = allocator.allocate(8).unwrap();
        allocator.free(a);
        allocator.free(a);
    }

    #[test]
    #[should_panic(expected = "never allocated")]
    fn freeing_interior_offset_aborts() {
        let mut allocator = with_capacity(16);
        let _a = allocator.allocate(8).unwrap();
        allocator.free(4);
    }
}
