//! Slot index owning the chunks of a [`ChunkedDeque`](super::ChunkedDeque).
//!
//! The index is a vector of slots, each either empty or owning one boxed
//! chunk. The chunks holding live elements always form the contiguous window
//! `[front, back]`. When an edge of the vector is reached the window is moved
//! back to the middle, in place while it spans at most a quarter of the
//! slots and by doubling the index otherwise, so growth in either direction
//! stays amortized. At most one vacated chunk is retained on each side of the
//! window.

use std::collections::TryReserveError;

use tracing::{debug, trace};

/// A fixed-size block of `CHUNK` element cells, the unit of allocation.
#[derive(Clone)]
pub(crate) struct Chunk<T, const CHUNK: usize> {
    cells: [Option<T>; CHUNK],
}

impl<T, const CHUNK: usize> Chunk<T, CHUNK> {
    pub(crate) fn boxed() -> Box<Self> {
        Box::new(Self { cells: std::array::from_fn(|_| None) })
    }

    #[inline(always)]
    pub(crate) fn get(&self, offset: usize) -> Option<&T> {
        self.cells[offset].as_ref()
    }

    #[inline(always)]
    pub(crate) fn get_mut(&mut self, offset: usize) -> Option<&mut T> {
        self.cells[offset].as_mut()
    }

    #[inline(always)]
    pub(crate) fn put(&mut self, offset: usize, value: T) {
        debug_assert!(self.cells[offset].is_none(), "overwriting a live cell");
        self.cells[offset] = Some(value);
    }

    #[inline(always)]
    pub(crate) fn take(&mut self, offset: usize) -> Option<T> {
        self.cells[offset].take()
    }
}

type Slot<T, const CHUNK: usize> = Option<Box<Chunk<T, CHUNK>>>;

/// Growable, recentering vector of chunk slots.
pub(crate) struct ChunkIndex<T, const CHUNK: usize> {
    slots: Vec<Slot<T, CHUNK>>,
    front: usize,
    back: usize,
}

impl<T, const CHUNK: usize> ChunkIndex<T, CHUNK> {
    /// Creates an index of `capacity` slots with a single chunk in the middle.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        let middle = capacity / 2;
        slots[middle] = Some(Chunk::boxed());
        Self { slots, front: middle, back: middle }
    }

    #[inline(always)]
    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline(always)]
    pub(crate) fn front(&self) -> usize {
        self.front
    }

    #[inline(always)]
    pub(crate) fn back(&self) -> usize {
        self.back
    }

    /// Number of slots currently owning a chunk, retained ones included.
    pub(crate) fn allocated_chunks(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Number of whole empty slots after the back of the window.
    #[inline(always)]
    pub(crate) fn slots_after_back(&self) -> usize {
        self.capacity() - 1 - self.back
    }

    pub(crate) fn chunk(&self, slot: usize) -> Option<&Chunk<T, CHUNK>> {
        self.slots.get(slot).and_then(|slot| slot.as_deref())
    }

    pub(crate) fn chunk_mut(&mut self, slot: usize) -> Option<&mut Chunk<T, CHUNK>> {
        self.slots.get_mut(slot).and_then(|slot| slot.as_deref_mut())
    }

    /// Returns the chunk at `slot`, allocating it if the slot is empty.
    ///
    /// Only ever called for slots inside the window, which already own a
    /// chunk; the allocation keeps the call total.
    pub(crate) fn chunk_or_alloc(&mut self, slot: usize) -> &mut Chunk<T, CHUNK> {
        debug_assert!(self.slots[slot].is_some(), "slot {slot} inside the window has no chunk");
        self.slots[slot].get_or_insert_with(Chunk::boxed)
    }

    /// Largest slot count a `Vec` of slots can hold without its byte size
    /// exceeding `isize::MAX`.
    pub(crate) const MAX_CAPACITY: usize = isize::MAX as usize / size_of::<Slot<T, CHUNK>>();

    /// Number of slots in the live window `[front, back]`.
    #[inline(always)]
    fn window(&self) -> usize {
        self.back - self.front + 1
    }

    /// Makes room at both edges of the window.
    ///
    /// A window spanning at most a quarter of the index is moved back to the
    /// middle in place; otherwise the index doubles.
    fn make_room(&mut self) {
        if self.window() * 4 <= self.capacity() {
            self.recenter_in_place();
        } else {
            self.grow();
        }
    }

    /// Doubles the index and recenters the window.
    pub(crate) fn grow(&mut self) {
        let new_capacity = self.capacity() * 2;
        self.relocate(Vec::with_capacity(new_capacity), new_capacity);
    }

    /// Fallible counterpart of [`grow`](Self::grow) towards an explicit size.
    pub(crate) fn try_grow_to(&mut self, new_capacity: usize) -> Result<(), TryReserveError> {
        let mut slots = Vec::new();
        slots.try_reserve_exact(new_capacity)?;
        self.relocate(slots, new_capacity);
        Ok(())
    }

    /// Moves every slot into `slots`, shifted by half the added capacity.
    ///
    /// `slots` must be empty with room for `new_capacity` entries. Chunk
    /// contents are untouched; only the ownership records move. Retained
    /// chunks outside the window are released.
    fn relocate(&mut self, mut slots: Vec<Slot<T, CHUNK>>, new_capacity: usize) {
        let old_capacity = self.capacity();
        debug_assert!(new_capacity > old_capacity);

        self.release_outside_window();
        let offset = (new_capacity - old_capacity) / 2;
        slots.resize_with(offset, || None);
        slots.append(&mut self.slots);
        slots.resize_with(new_capacity, || None);

        self.slots = slots;
        self.front += offset;
        self.back += offset;

        trace!(old_capacity, new_capacity, offset, "Grew the chunk index");
    }

    /// Moves the window to the middle of the current index.
    fn recenter_in_place(&mut self) {
        self.release_outside_window();
        let window = self.window();
        let new_front = (self.capacity() - window) / 2;

        if new_front < self.front {
            self.slots[new_front..=self.back].rotate_left(self.front - new_front);
        } else if new_front > self.front {
            self.slots[self.front..new_front + window].rotate_right(new_front - self.front);
        }

        trace!(capacity = self.capacity(), from = self.front, to = new_front, "Recentered the chunk index");
        self.front = new_front;
        self.back = new_front + window - 1;
    }

    /// Claims the slot before the window for a new front chunk.
    pub(crate) fn ensure_front_space(&mut self) {
        // A one-slot index doubles with a zero offset, hence the loop.
        while self.front == 0 {
            self.make_room();
        }

        let slot = &mut self.slots[self.front - 1];
        if slot.is_none() {
            *slot = Some(Chunk::boxed());
        }
        self.front -= 1;
    }

    /// Claims the slot after the window for a new back chunk.
    pub(crate) fn ensure_back_space(&mut self) {
        if self.back == self.capacity() - 1 {
            self.make_room();
        }

        let slot = &mut self.slots[self.back + 1];
        if slot.is_none() {
            *slot = Some(Chunk::boxed());
        }
        self.back += 1;
    }

    /// Drops the back chunk out of the window.
    ///
    /// The vacated chunk stays allocated for the next back push; only the one
    /// chunk next to the window is kept, so a previously retained chunk
    /// further out is released.
    pub(crate) fn retreat_back(&mut self) {
        debug_assert!(self.back > self.front);
        self.back -= 1;
        if let Some(slot) = self.slots.get_mut(self.back + 2) {
            *slot = None;
        }
    }

    /// Drops the front chunk out of the window, keeping at most one retained
    /// chunk before it.
    pub(crate) fn advance_front(&mut self) {
        debug_assert!(self.front < self.back);
        self.front += 1;
        if self.front >= 2 {
            self.slots[self.front - 2] = None;
        }
    }

    /// Releases every chunk outside of `[front, back]`, returning how many.
    fn release_outside_window(&mut self) -> usize {
        let (front, back) = (self.front, self.back);
        let mut released = 0;
        for (position, slot) in self.slots.iter_mut().enumerate() {
            if (position < front || position > back) && slot.take().is_some() {
                released += 1;
            }
        }
        released
    }

    /// Releases every chunk retained outside of `[front, back]`.
    pub(crate) fn shrink_to_fit(&mut self) {
        let released = self.release_outside_window();
        if released > 0 {
            debug!(released, "Released retained chunks");
        }
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        assert!(self.front <= self.back, "front {} > back {}", self.front, self.back);
        assert!(self.back < self.capacity(), "back {} out of {}", self.back, self.capacity());
        for position in self.front..=self.back {
            assert!(self.slots[position].is_some(), "slot {position} in the window has no chunk");
        }
        // Retained chunks only sit right next to the window.
        for (position, slot) in self.slots.iter().enumerate() {
            if position + 1 < self.front || position > self.back + 1 {
                assert!(slot.is_none(), "slot {position} retains a chunk away from the window");
            }
        }
    }
}

impl<T: Clone, const CHUNK: usize> Clone for ChunkIndex<T, CHUNK> {
    /// Deep-copies the chunks of the window; retained chunks are not copied.
    fn clone(&self) -> Self {
        let slots = self
            .slots
            .iter()
            .enumerate()
            .map(|(position, slot)| {
                if (self.front..=self.back).contains(&position) { slot.clone() } else { None }
            })
            .collect();

        Self { slots, front: self.front, back: self.back }
    }

    fn clone_from(&mut self, source: &Self) {
        self.slots.clear();
        self.slots.extend(source.slots.iter().enumerate().map(|(position, slot)| {
            if (source.front..=source.back).contains(&position) { slot.clone() } else { None }
        }));
        self.front = source.front;
        self.back = source.back;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(capacity: usize) -> ChunkIndex<u8, 4> {
        ChunkIndex::with_capacity(capacity)
    }

    #[test]
    fn test_index_starts_centered_with_one_chunk() {
        let idx = index(8);
        assert_eq!(idx.capacity(), 8);
        assert_eq!(idx.front(), 4);
        assert_eq!(idx.back(), 4);
        assert_eq!(idx.allocated_chunks(), 1);
        idx.assert_invariants();
    }

    #[test]
    fn test_index_grow_recenters_even_delta() {
        let mut idx = index(8);
        idx.chunk_or_alloc(4).put(0, 7);
        idx.grow();

        // offset = (16 - 8) / 2
        assert_eq!(idx.capacity(), 16);
        assert_eq!(idx.front(), 8);
        assert_eq!(idx.back(), 8);
        assert_eq!(idx.chunk(8).and_then(|c| c.get(0)), Some(&7));
        assert_eq!(idx.allocated_chunks(), 1);
        idx.assert_invariants();
    }

    #[test]
    fn test_index_grow_recenters_odd_delta() {
        let mut idx = index(3);
        assert_eq!(idx.front(), 1);
        idx.grow();

        // offset = (6 - 3) / 2
        assert_eq!(idx.capacity(), 6);
        assert_eq!(idx.front(), 2);
        assert_eq!(idx.back(), 2);
        idx.assert_invariants();
    }

    #[test]
    fn test_index_ensure_back_space_grows_at_edge() {
        let mut idx = index(2);
        assert_eq!(idx.back(), 1);
        idx.ensure_back_space();

        assert_eq!(idx.capacity(), 4);
        assert_eq!(idx.front(), 2);
        assert_eq!(idx.back(), 3);
        idx.assert_invariants();
    }

    #[test]
    fn test_index_ensure_front_space_on_single_slot() {
        let mut idx = index(1);
        idx.ensure_front_space();

        // 1 -> 2 has a zero offset, 2 -> 4 shifts by one.
        assert_eq!(idx.capacity(), 4);
        assert_eq!(idx.front(), 0);
        assert_eq!(idx.back(), 1);
        idx.assert_invariants();
    }

    #[test]
    fn test_index_reuses_retained_chunk() {
        let mut idx = index(8);
        idx.ensure_back_space();
        idx.retreat_back();
        assert_eq!(idx.allocated_chunks(), 2);

        idx.ensure_back_space();
        assert_eq!(idx.allocated_chunks(), 2);
        assert_eq!(idx.back(), 5);
    }

    #[test]
    fn test_index_shrink_to_fit_releases_outside_window() {
        let mut idx = index(8);
        idx.ensure_front_space();
        idx.ensure_back_space();
        idx.advance_front();
        idx.retreat_back();
        assert_eq!(idx.allocated_chunks(), 3);

        idx.shrink_to_fit();
        assert_eq!(idx.allocated_chunks(), 1);
        idx.assert_invariants();
    }

    #[test]
    fn test_index_clone_skips_retained_chunks() {
        let mut idx = index(8);
        idx.ensure_back_space();
        idx.retreat_back();

        let cloned = idx.clone();
        assert_eq!(cloned.allocated_chunks(), 1);
        assert_eq!((cloned.front(), cloned.back()), (idx.front(), idx.back()));

        let mut target = index(32);
        target.clone_from(&idx);
        assert_eq!(target.capacity(), 8);
        assert_eq!(target.allocated_chunks(), 1);
    }

    #[test]
    fn test_index_try_grow_to() {
        let mut idx = index(4);
        idx.try_grow_to(10).unwrap();

        // offset = (10 - 4) / 2
        assert_eq!(idx.capacity(), 10);
        assert_eq!(idx.front(), 5);
        idx.assert_invariants();
    }

    #[test]
    fn test_index_retains_one_chunk_per_side() {
        let mut idx = index(16);
        for _ in 0..4 {
            idx.ensure_back_space();
        }
        for _ in 0..4 {
            idx.ensure_front_space();
        }
        assert_eq!(idx.allocated_chunks(), 9);

        for _ in 0..3 {
            idx.advance_front();
            idx.retreat_back();
            idx.assert_invariants();
        }
        // Window of 3 plus one retained chunk on each side.
        assert_eq!(idx.allocated_chunks(), 5);
    }

    #[test]
    fn test_index_recenters_in_place_when_sparse() {
        let mut idx = index(8);
        for _ in 0..3 {
            idx.ensure_back_space();
            idx.advance_front();
        }
        assert_eq!((idx.front(), idx.back()), (7, 7));
        idx.chunk_or_alloc(7).put(1, 9);

        idx.ensure_back_space();

        // A one-slot window in eight slots moves to (8 - 1) / 2 without growing.
        assert_eq!(idx.capacity(), 8);
        assert_eq!((idx.front(), idx.back()), (3, 4));
        assert_eq!(idx.chunk(3).and_then(|c| c.get(1)), Some(&9));
        idx.assert_invariants();
    }

    #[test]
    fn test_index_recenters_in_place_towards_back() {
        let mut idx = index(8);
        for _ in 0..4 {
            idx.ensure_front_space();
            idx.retreat_back();
        }
        assert_eq!((idx.front(), idx.back()), (0, 0));
        idx.chunk_or_alloc(0).put(2, 5);

        idx.ensure_front_space();

        assert_eq!(idx.capacity(), 8);
        assert_eq!((idx.front(), idx.back()), (2, 3));
        assert_eq!(idx.chunk(3).and_then(|c| c.get(2)), Some(&5));
        idx.assert_invariants();
    }

    #[test]
    fn test_index_grows_when_window_is_dense() {
        let mut idx = index(8);
        for _ in 0..3 {
            idx.ensure_back_space();
        }
        // Window 4..=7 spans half of the slots.
        idx.ensure_back_space();
        assert_eq!(idx.capacity(), 16);
        assert_eq!((idx.front(), idx.back()), (8, 12));
        idx.assert_invariants();
    }

    #[test]
    fn test_index_max_capacity_fits_isize() {
        let max = ChunkIndex::<u8, 4>::MAX_CAPACITY;
        assert!(max.checked_mul(size_of::<Slot<u8, 4>>()).is_some_and(|bytes| bytes <= isize::MAX as usize));
        assert!(max * 2 > max);
    }
}
