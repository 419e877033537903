//! # Chunked Collections
//!
//! A double-ended queue that stores its elements in small fixed-size heap chunks, and a
//! stack adapter built on top of it.
//!
//! ## Key Features
//!
//! * **Amortized O(1) at both ends:** pushes and pops touch one chunk; a new chunk is only
//!   claimed when a push crosses a chunk seam.
//! * **Stable element storage:** elements are never moved once written. Growing the deque
//!   only relocates the chunk index, never the chunks.
//! * **Recentering growth:** when the index runs out of slots at either end the occupied
//!   window moves back to the middle, in place while it is small and by doubling the index
//!   otherwise, so growth at both ends stays cheap and queue churn never grows the index.
//! * **Bounded retention:** at most one vacated chunk is kept on each side for reuse.
//! * **No unsafe code:** chunks are `Box<[Option<T>; CHUNK]>` owned by a `Vec` of slots.
//! * **Interoperability:** [`AnyDeque`] and [`AnyStack`] are implemented for the standard
//!   `VecDeque` and `Vec` as well.
//!
//! ## Chunk Size (`CHUNK`)
//!
//! The const generic `CHUNK` sets the number of elements per chunk. It defaults to 4 and
//! must be non-zero (checked at compile time).
//!
//! ## Empty Containers
//!
//! Accessors and pops on an empty container return `None` and leave it untouched. Nothing
//! is ever read from an unoccupied cell.
//!
//! ## Cargo Features
//!
//! * `serde`: `Serialize`/`Deserialize` for both containers, as a sequence of elements.
//!
//! ## Examples
//!
//! ### ChunkedDeque
//!
//! ```rust
//! use chunked_collections::ChunkedDeque;
//!
//! // Four elements per chunk.
//! let mut deque: ChunkedDeque<i32> = ChunkedDeque::new();
//!
//! for i in 1..=5 {
//!     deque.push_back(i);
//! }
//! // The fifth push opened a second chunk.
//! assert_eq!(deque.len(), 5);
//! assert_eq!(deque.front(), Some(&1));
//! assert_eq!(deque.back(), Some(&5));
//!
//! deque.pop_front();
//! deque.pop_front();
//! assert_eq!(deque.front(), Some(&3));
//! assert_eq!(deque.len(), 3);
//!
//! deque.push_front(0);
//! assert_eq!(deque.front(), Some(&0));
//! ```
//!
//! ### ChunkedStack
//!
//! ```rust
//! use chunked_collections::ChunkedStack;
//!
//! let mut stack: ChunkedStack<&str> = ChunkedStack::new();
//! stack.push("a");
//! stack.push("b");
//!
//! assert_eq!(stack.top(), Some(&"b"));
//! assert_eq!(stack.pop(), Some("b"));
//! assert_eq!(stack.pop(), Some("a"));
//! assert!(stack.is_empty());
//! assert_eq!(stack.pop(), None);
//! ```
//!
//! ### Reserving room
//!
//! ```rust
//! use chunked_collections::{ChunkedDeque, ReserveError};
//!
//! let mut deque: ChunkedDeque<u64, 16> = ChunkedDeque::new();
//! deque.try_reserve(1_000).unwrap();
//! let capacity = deque.capacity();
//!
//! deque.extend(0..1_000);
//! assert_eq!(deque.capacity(), capacity);
//!
//! assert_eq!(deque.try_reserve(usize::MAX), Err(ReserveError::CapacityOverflow));
//! ```

// --- Module Declarations ---

pub mod deque;
pub mod error;
pub mod stack;

// --- Re-exports ---

pub use deque::{AnyDeque, ChunkedDeque, DEFAULT_SLOTS};
pub use error::ReserveError;
pub use stack::{AnyStack, ChunkedStack};
