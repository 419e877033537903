//! LIFO stack adapter over [`ChunkedDeque`].
//!
//! [`ChunkedStack`] forwards `push`, `pop` and `top` to the back of a
//! [`ChunkedDeque`] and keeps no state of its own. [`AnyStack`] is the
//! object-safe view shared with `Vec<T>`.

use core::fmt;

use crate::deque::ChunkedDeque;

/// A trait for abstraction over different LIFO stack types.
pub trait AnyStack<T> {
    /// Number of elements on the stack.
    fn len(&self) -> usize;
    /// Returns `true` if the stack holds no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Pushes `item` on top.
    fn push(&mut self, item: T);
    /// Removes and returns the top element, or `None` if empty.
    fn pop(&mut self) -> Option<T>;
    /// The top element, or `None` if empty.
    fn top(&self) -> Option<&T>;
    /// Mutable access to the top element, or `None` if empty.
    fn top_mut(&mut self) -> Option<&mut T>;
}

impl<T> AnyStack<T> for Vec<T> {
    fn len(&self) -> usize {
        self.len()
    }
    fn push(&mut self, item: T) {
        self.push(item);
    }
    fn pop(&mut self) -> Option<T> {
        self.pop()
    }
    fn top(&self) -> Option<&T> {
        self.last()
    }
    fn top_mut(&mut self) -> Option<&mut T> {
        self.last_mut()
    }
}

/// A stack storing its elements in a [`ChunkedDeque`].
///
/// | Stack | Deque |
/// |-------|-------|
/// | `push` | `push_back` |
/// | `pop` | `pop_back` |
/// | `top` / `top_mut` | `back` / `back_mut` |
/// | `len` | `len` |
/// | `is_empty` | `len() == 0` |
///
/// As with the deque, `pop` and `top` return `None` on an empty stack.
pub struct ChunkedStack<T, const CHUNK: usize = 4> {
    container: ChunkedDeque<T, CHUNK>,
}

impl<T, const CHUNK: usize> AnyStack<T> for ChunkedStack<T, CHUNK> {
    fn len(&self) -> usize {
        self.len()
    }
    fn push(&mut self, item: T) {
        self.push(item);
    }
    fn pop(&mut self) -> Option<T> {
        self.pop()
    }
    fn top(&self) -> Option<&T> {
        self.top()
    }
    fn top_mut(&mut self) -> Option<&mut T> {
        self.top_mut()
    }
}

impl<T, const CHUNK: usize> ChunkedStack<T, CHUNK> {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self { container: ChunkedDeque::new() }
    }

    /// Pushes `item` on top of the stack.
    #[inline]
    pub fn push(&mut self, item: T) {
        self.container.push_back(item);
    }

    /// Removes and returns the top element, or `None` if empty.
    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        self.container.pop_back()
    }

    /// Returns a shared reference to the top element, or `None` if empty.
    #[inline]
    pub fn top(&self) -> Option<&T> {
        self.container.back()
    }

    /// Returns a mutable reference to the top element, or `None` if empty.
    #[inline]
    pub fn top_mut(&mut self) -> Option<&mut T> {
        self.container.back_mut()
    }

    /// Returns the number of elements on the stack.
    #[inline]
    pub fn len(&self) -> usize {
        self.container.len()
    }

    /// Returns `true` if the stack is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.container.len() == 0
    }
}

impl<T: Clone, const CHUNK: usize> Clone for ChunkedStack<T, CHUNK> {
    fn clone(&self) -> Self {
        Self { container: self.container.clone() }
    }

    fn clone_from(&mut self, source: &Self) {
        self.container.clone_from(&source.container);
    }
}

impl<T: fmt::Debug, const CHUNK: usize> fmt::Debug for ChunkedStack<T, CHUNK> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.container, f)
    }
}

impl<T, const CHUNK: usize> Default for ChunkedStack<T, CHUNK> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq, const CHUNK: usize> PartialEq for ChunkedStack<T, CHUNK> {
    fn eq(&self, other: &Self) -> bool {
        self.container == other.container
    }
}
impl<T: Eq, const CHUNK: usize> Eq for ChunkedStack<T, CHUNK> {}

impl<T, const CHUNK: usize> Extend<T> for ChunkedStack<T, CHUNK> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.container.extend(iter);
    }
}

impl<T, const CHUNK: usize> FromIterator<T> for ChunkedStack<T, CHUNK> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { container: ChunkedDeque::from_iter(iter) }
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{ChunkedDeque, ChunkedStack};

    // Bottom to top.
    impl<T: Serialize, const CHUNK: usize> Serialize for ChunkedStack<T, CHUNK> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            self.container.serialize(serializer)
        }
    }

    impl<'de, T: Deserialize<'de>, const CHUNK: usize> Deserialize<'de> for ChunkedStack<T, CHUNK> {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            ChunkedDeque::deserialize(deserializer).map(|container| Self { container })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_lifo() {
        let mut s: ChunkedStack<i32> = ChunkedStack::new();
        assert!(s.is_empty());
        for i in 0..10 {
            s.push(i);
        }
        assert_eq!(s.len(), 10);
        assert_eq!(s.top(), Some(&9));

        for expected in (0..10).rev() {
            assert_eq!(s.top(), Some(&expected));
            assert_eq!(s.pop(), Some(expected));
        }
        assert!(s.is_empty());
    }

    #[test]
    fn test_stack_empty_ops() {
        let mut s: ChunkedStack<i32> = ChunkedStack::new();
        assert_eq!(s.pop(), None);
        assert_eq!(s.top(), None);
        assert_eq!(s.top_mut(), None);
        assert_eq!(s.len(), 0);

        s.push(1);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_stack_top_mut() {
        let mut s: ChunkedStack<String> = ChunkedStack::new();
        s.push("a".to_owned());
        s.push("b".to_owned());
        if let Some(top) = s.top_mut() {
            top.push('c');
        }
        assert_eq!(s.pop().as_deref(), Some("bc"));
        assert_eq!(s.top().map(String::as_str), Some("a"));
    }

    #[test]
    fn test_stack_mirrors_deque_back() {
        let s: ChunkedStack<i32> = (1..=5).collect();
        let d: ChunkedDeque<i32> = (1..=5).collect();
        assert_eq!(s.top(), d.back());
        assert_eq!(s.len(), d.len());
        assert_eq!(format!("{s:?}"), format!("{d:?}"));
    }

    #[test]
    fn test_stack_clone_is_independent() {
        let mut s1: ChunkedStack<i32> = (0..6).collect();
        let mut s2 = s1.clone();
        assert_eq!(s1, s2);

        s2.pop();
        s2.push(42);
        assert_eq!(s1.top(), Some(&5));
        assert_eq!(s2.top(), Some(&42));

        s1.extend([7, 8]);
        assert_eq!(s1.len(), 8);
        assert_eq!(s2.len(), 6);
    }

    #[test]
    fn test_stack_any_stack_matches_vec() {
        fn exercise(s: &mut dyn AnyStack<u32>) -> Vec<Option<u32>> {
            let mut out = Vec::new();
            for i in 0..20 {
                s.push(i);
                if i % 3 == 0 {
                    out.push(s.pop());
                }
            }
            if let Some(top) = s.top_mut() {
                *top += 1000;
            }
            out.push(s.top().copied());
            out.push(Some(s.len() as u32));
            out
        }

        let mut chunked: ChunkedStack<u32> = ChunkedStack::new();
        let mut vec: Vec<u32> = Vec::new();
        assert_eq!(exercise(&mut chunked), exercise(&mut vec));
        assert!(!AnyStack::is_empty(&chunked));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_stack_serde_round_trip() {
        let s: ChunkedStack<u8> = (1..=5).collect();
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, "[1,2,3,4,5]");

        let back: ChunkedStack<u8> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.top(), Some(&5));
        assert_eq!(back, s);
    }
}
