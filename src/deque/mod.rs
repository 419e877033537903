//! Double-ended queue storing its elements in fixed-size heap chunks.
//!
//! Provides [`ChunkedDeque`], which keeps `CHUNK` elements per boxed chunk and
//! addresses the chunks through a growable slot index. Pushing or popping at
//! either end touches at most one chunk and, at chunk seams, one slot of the
//! index, so both ends are amortized O(1) and elements never move once
//! written.
//!
//! [`AnyDeque`] abstracts over [`ChunkedDeque`] and `std::collections::VecDeque`
//! for code that only needs the end operations.

mod index;

use core::fmt;
use core::num::NonZeroUsize;
use std::collections::VecDeque;

use self::index::ChunkIndex;
use crate::error::ReserveError;

/// Number of index slots allocated by [`ChunkedDeque::new`].
pub const DEFAULT_SLOTS: usize = 8;

// ─── AnyDeque ─────────────────────────────────────────────────────────────────

/// An object-safe abstraction over double-ended queue types.
///
/// Implemented by both `VecDeque<T>` and `ChunkedDeque<T, CHUNK>` so that code
/// can operate on either end of a deque without knowing its storage layout.
pub trait AnyDeque<T> {
    /// Returns the number of elements in the deque.
    fn len(&self) -> usize;
    /// Returns `true` if the deque contains no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Appends an element to the back.
    fn push_back(&mut self, item: T);
    /// Prepends an element to the front.
    fn push_front(&mut self, item: T);
    /// Removes and returns the element from the back, or `None` if empty.
    fn pop_back(&mut self) -> Option<T>;
    /// Removes and returns the element from the front, or `None` if empty.
    fn pop_front(&mut self) -> Option<T>;
    /// Removes all elements.
    fn clear(&mut self);
    /// Returns a shared reference to the front element, or `None` if empty.
    fn front(&self) -> Option<&T>;
    /// Returns a shared reference to the back element, or `None` if empty.
    fn back(&self) -> Option<&T>;
    /// Returns an exclusive reference to the front element, or `None` if empty.
    fn front_mut(&mut self) -> Option<&mut T>;
    /// Returns an exclusive reference to the back element, or `None` if empty.
    fn back_mut(&mut self) -> Option<&mut T>;
}

impl<T> AnyDeque<T> for VecDeque<T> {
    fn len(&self) -> usize {
        self.len()
    }
    fn push_back(&mut self, item: T) {
        self.push_back(item);
    }
    fn push_front(&mut self, item: T) {
        self.push_front(item);
    }
    fn pop_back(&mut self) -> Option<T> {
        self.pop_back()
    }
    fn pop_front(&mut self) -> Option<T> {
        self.pop_front()
    }
    fn clear(&mut self) {
        self.clear();
    }
    fn front(&self) -> Option<&T> {
        self.front()
    }
    fn back(&self) -> Option<&T> {
        self.back()
    }
    fn front_mut(&mut self) -> Option<&mut T> {
        self.front_mut()
    }
    fn back_mut(&mut self) -> Option<&mut T> {
        self.back_mut()
    }
}

/// A double-ended queue built from fixed-size chunks of `CHUNK` elements.
///
/// # Layout
/// The chunks are owned by a slot index (`Vec<Option<Box<chunk>>>`). The chunks
/// holding live elements occupy the contiguous slot window `[front, back]`;
/// inside it, the logical front element sits at offset `head` of the front
/// chunk and the following elements fill the window in order.
///
/// When a push crosses a chunk seam a chunk is claimed next to the window. If
/// the window already touches that end of the index, the index doubles and the
/// window is moved to the middle of the new index first: with `c` old slots,
/// every slot moves by `c / 2` positions.
///
/// Pops that empty a chunk only shrink the window; the vacated chunk stays
/// allocated and is reused by the next push crossing that seam. Call
/// [`shrink_to_fit`](ChunkedDeque::shrink_to_fit) to release such chunks.
///
/// # Empty deques
/// `front`, `back`, `front_mut` and `back_mut` return `None` and the pops
/// return `None` without changing anything. An empty deque always keeps one
/// chunk allocated.
///
/// # Generic parameters
/// | Parameter | Meaning |
/// |-----------|--------|
/// | `T` | Element type |
/// | `CHUNK` | Elements per chunk; must be non-zero, defaults to 4 |
pub struct ChunkedDeque<T, const CHUNK: usize = 4> {
    index: ChunkIndex<T, CHUNK>,
    head: usize,
    len: usize,
}

impl<T, const CHUNK: usize> AnyDeque<T> for ChunkedDeque<T, CHUNK> {
    fn len(&self) -> usize {
        self.len
    }
    fn push_back(&mut self, item: T) {
        self.push_back(item);
    }
    fn push_front(&mut self, item: T) {
        self.push_front(item);
    }
    fn pop_back(&mut self) -> Option<T> {
        self.pop_back()
    }
    fn pop_front(&mut self) -> Option<T> {
        self.pop_front()
    }
    fn clear(&mut self) {
        self.clear();
    }
    fn front(&self) -> Option<&T> {
        self.front()
    }
    fn back(&self) -> Option<&T> {
        self.back()
    }
    fn front_mut(&mut self) -> Option<&mut T> {
        self.front_mut()
    }
    fn back_mut(&mut self) -> Option<&mut T> {
        self.back_mut()
    }
}

impl<T, const CHUNK: usize> ChunkedDeque<T, CHUNK> {
    /// Creates an empty deque with [`DEFAULT_SLOTS`] index slots and one chunk.
    pub fn new() -> Self {
        Self::with_index_capacity(DEFAULT_SLOTS)
    }

    /// Creates an empty deque whose index starts with `slots` slots.
    pub fn with_slots(slots: NonZeroUsize) -> Self {
        Self::with_index_capacity(slots.get())
    }

    /// Creates an empty deque that can take at least `capacity` elements at
    /// either end without growing its index.
    ///
    /// The live window starts in the middle of the index, so the index gets
    /// twice the slots `capacity` needs. Only the index is sized up front;
    /// chunks are still allocated as pushes reach them.
    ///
    /// # Panics
    /// Panics if the index exceeds `isize::MAX` bytes, as `Vec::with_capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        let slots = capacity.div_ceil(CHUNK).saturating_mul(2);
        Self::with_index_capacity(slots.max(DEFAULT_SLOTS))
    }

    fn with_index_capacity(slots: usize) -> Self {
        const { assert!(CHUNK > 0, "ChunkedDeque CHUNK must be non-zero") }
        Self { index: ChunkIndex::with_capacity(slots), head: 0, len: 0 }
    }

    /// Returns the number of elements currently in the deque.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the deque contains no elements.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of elements the index can address without growing,
    /// `slot_capacity() * CHUNK`.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.index.capacity() * CHUNK
    }

    /// Returns the number of slots in the chunk index.
    #[inline(always)]
    pub fn slot_capacity(&self) -> usize {
        self.index.capacity()
    }

    /// Returns how many chunks are allocated, including chunks retained
    /// outside the live window after pops.
    pub fn allocated_chunks(&self) -> usize {
        self.index.allocated_chunks()
    }

    /// Offset inside the back chunk of the last element. Requires `len > 0`.
    #[inline(always)]
    fn back_offset(&self) -> usize {
        (self.head + self.len - 1) % CHUNK
    }

    /// Appends `item` to the back of the deque.
    pub fn push_back(&mut self, item: T) {
        let offset = if self.len == 0 {
            self.head = 0;
            0
        } else {
            let tail = (self.head + self.len) % CHUNK;
            if tail == 0 {
                self.index.ensure_back_space();
            }
            tail
        };

        let back = self.index.back();
        self.index.chunk_or_alloc(back).put(offset, item);
        self.len += 1;
    }

    /// Prepends `item` to the front of the deque.
    pub fn push_front(&mut self, item: T) {
        if self.len == 0 {
            self.head = 0;
        } else {
            if self.head == 0 {
                self.index.ensure_front_space();
                self.head = CHUNK;
            }
            self.head -= 1;
        }

        let front = self.index.front();
        self.index.chunk_or_alloc(front).put(self.head, item);
        self.len += 1;
    }

    /// Removes and returns the last element, or `None` if empty.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }

        let offset = self.back_offset();
        let back = self.index.back();
        let item = self.index.chunk_mut(back).and_then(|chunk| chunk.take(offset));
        self.len -= 1;

        if self.len == 0 {
            self.head = 0;
        } else if offset == 0 {
            self.index.retreat_back();
        }
        item
    }

    /// Removes and returns the first element, or `None` if empty.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }

        let front = self.index.front();
        let item = self.index.chunk_mut(front).and_then(|chunk| chunk.take(self.head));
        self.len -= 1;
        self.head += 1;

        if self.len == 0 {
            self.head = 0;
        } else if self.head == CHUNK {
            self.index.advance_front();
            self.head = 0;
        }
        item
    }

    /// Returns a shared reference to the front element, or `None` if empty.
    #[inline]
    pub fn front(&self) -> Option<&T> {
        if self.len == 0 {
            return None;
        }
        self.index.chunk(self.index.front()).and_then(|chunk| chunk.get(self.head))
    }

    /// Returns a shared reference to the back element, or `None` if empty.
    #[inline]
    pub fn back(&self) -> Option<&T> {
        if self.len == 0 {
            return None;
        }
        let offset = self.back_offset();
        self.index.chunk(self.index.back()).and_then(|chunk| chunk.get(offset))
    }

    /// Returns an exclusive reference to the front element, or `None` if empty.
    #[inline]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        if self.len == 0 {
            return None;
        }
        let (front, head) = (self.index.front(), self.head);
        self.index.chunk_mut(front).and_then(|chunk| chunk.get_mut(head))
    }

    /// Returns an exclusive reference to the back element, or `None` if empty.
    #[inline]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        if self.len == 0 {
            return None;
        }
        let (back, offset) = (self.index.back(), self.back_offset());
        self.index.chunk_mut(back).and_then(|chunk| chunk.get_mut(offset))
    }

    /// Removes all elements.
    ///
    /// The index keeps its slot count; every chunk but the middle one is
    /// released.
    pub fn clear(&mut self) {
        self.index = ChunkIndex::with_capacity(self.index.capacity());
        self.head = 0;
        self.len = 0;
    }

    /// Grows the index until at least `additional` more elements can be pushed
    /// to the back without growing it again.
    ///
    /// # Panics
    /// Panics if the index would exceed `isize::MAX` bytes or the allocation
    /// fails.
    pub fn reserve(&mut self, additional: usize) {
        if let Err(err) = self.try_reserve(additional) {
            panic!("ChunkedDeque::reserve failed: {err}");
        }
    }

    /// Fallible version of [`reserve`](ChunkedDeque::reserve).
    ///
    /// The index is still grown by doubling, so the recentering applies as for
    /// any other growth. On error the deque is left unchanged.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), ReserveError> {
        let free_in_back = if self.len == 0 { CHUNK } else { CHUNK - 1 - self.back_offset() };
        let Some(extra) = additional.checked_sub(free_in_back) else {
            return Ok(());
        };
        let needed_slots = extra.div_ceil(CHUNK);

        let mut capacity = self.index.capacity();
        let mut back = self.index.back();
        while capacity - 1 - back < needed_slots {
            let doubled = capacity
                .checked_mul(2)
                .filter(|&doubled| doubled <= ChunkIndex::<T, CHUNK>::MAX_CAPACITY)
                .ok_or(ReserveError::CapacityOverflow)?;
            back += (doubled - capacity) / 2;
            capacity = doubled;
        }

        if capacity > self.index.capacity() {
            self.index.try_grow_to(capacity)?;
        }
        debug_assert!(self.index.slots_after_back() >= needed_slots);
        Ok(())
    }

    /// Releases the chunks retained outside the live window after pops.
    pub fn shrink_to_fit(&mut self) {
        self.index.shrink_to_fit();
    }

    /// Walks the elements from front to back.
    fn elements(&self) -> impl Iterator<Item = &T> + '_ {
        let first = self.index.front();
        (self.head..self.head + self.len).filter_map(move |position| {
            self.index.chunk(first + position / CHUNK).and_then(|chunk| chunk.get(position % CHUNK))
        })
    }
}

impl<T: Clone, const CHUNK: usize> Clone for ChunkedDeque<T, CHUNK> {
    fn clone(&self) -> Self {
        Self { index: self.index.clone(), head: self.head, len: self.len }
    }

    fn clone_from(&mut self, source: &Self) {
        self.index.clone_from(&source.index);
        self.head = source.head;
        self.len = source.len;
    }
}

impl<T: fmt::Debug, const CHUNK: usize> fmt::Debug for ChunkedDeque<T, CHUNK> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.elements()).finish()
    }
}

impl<T, const CHUNK: usize> Default for ChunkedDeque<T, CHUNK> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq, const CHUNK: usize> PartialEq for ChunkedDeque<T, CHUNK> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.elements().eq(other.elements())
    }
}
impl<T: Eq, const CHUNK: usize> Eq for ChunkedDeque<T, CHUNK> {}

impl<T, const CHUNK: usize> Extend<T> for ChunkedDeque<T, CHUNK> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for i in iter {
            self.push_back(i);
        }
    }
}

impl<T, const CHUNK: usize> FromIterator<T> for ChunkedDeque<T, CHUNK> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut deque = Self::new();
        deque.extend(iter);
        deque
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::ChunkedDeque;

    impl<T: Serialize, const CHUNK: usize> Serialize for ChunkedDeque<T, CHUNK> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(self.elements())
        }
    }

    impl<'de, T: Deserialize<'de>, const CHUNK: usize> Deserialize<'de> for ChunkedDeque<T, CHUNK> {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            Vec::<T>::deserialize(deserializer).map(Self::from_iter)
        }
    }
}
