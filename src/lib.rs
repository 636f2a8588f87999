//! # Block Deque
//!
//! A double-ended queue built on a segmented block map instead of a single
//! contiguous buffer.
//!
//! This crate provides [`BlockDeque`], a deque whose elements live in
//! lazily-allocated 64-element blocks addressed through an indirection
//! array. Head and tail cursors move through a virtual flat address space
//! with wraparound, and resizing doubles the map while recentering the live
//! window, so relative element order is never disturbed.
//!
//! ## Key Features
//!
//! * **Amortized O(1) at both ends:** `push_back`, `push_front`, `pop_back`
//!   and `pop_front` are constant time outside the occasional resize.
//! * **Sparse Allocation:** blocks are allocated on first write, so unused
//!   regions of the address space cost nothing.
//! * **Order-Preserving Growth:** resizing recenters the live window a
//!   quarter of the way into the doubled flat space, leaving headroom for
//!   both ends.
//! * **Explicit Empty-Pop Failure:** popping an empty deque returns
//!   [`EmptyError`] rather than panicking.
//! * **Deep Copies:** `clone` and `clone_from` duplicate the map and its
//!   blocks; two deques never alias storage.
//!
//! ## Examples
//!
//! ```rust
//! use block_deque::BlockDeque;
//!
//! let mut d = BlockDeque::new();
//!
//! d.push_back(2);
//! d.push_back(3);
//! d.push_front(1);
//!
//! assert_eq!(d.len(), 3);
//! assert_eq!(d.pop_front(), Ok(1));
//! assert_eq!(d.pop_back(), Ok(3));
//! assert_eq!(d.pop_back(), Ok(2));
//! assert!(d.pop_front().is_err());
//! ```
//!
//! Growth keeps insertion order intact:
//!
//! ```rust
//! use block_deque::BlockDeque;
//!
//! let mut d: BlockDeque<u32> = (0..300).collect();
//! assert!(d.capacity() >= 300);
//!
//! for i in 0..300 {
//!     assert_eq!(d.pop_front(), Ok(i));
//! }
//! ```

// --- Module Declarations ---

mod block;
pub mod deque;

// --- Re-exports ---

pub use deque::{AnyDeque, BlockDeque, EmptyError};
