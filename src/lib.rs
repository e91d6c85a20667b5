//! This crate exposes three ordered key sets that share one contract (insert,
//! delete, search, and ordered traversal) but balance themselves differently,
//! mostly for educational purposes.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored keys. BSTs are typically defined
//! recursively using the notion of a `Node`. A `Node` will store the key that
//! was inserted and will sometimes have child `Node`s. The most important
//! invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    key less than its own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    key greater than its own key.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! The benefits of these invariants are many. For instance, searching for
//! keys in the tree takes `O(height)` (where `height` is defined as the longest
//! path from the root `Node` to a leaf `Node`). BSTs also naturally support
//! sorted iteration by visiting the left subtree, then the subtree root, then
//! the right subtree.
//!
//! ## Balancing
//!
//! - [`bst`] does no balancing at all. Its height depends on insertion order
//!   and is `O(N)` in the worst case. It also exposes predicates describing
//!   the shape of the tree (complete, full, perfect, balanced).
//! - [`avl`] keeps the heights of every node's subtrees within one of each
//!   other by rotating nodes on the way back up from an insert or delete,
//!   limiting the height to `O(lg N)`.
//! - [`btree`] stores many keys per node and keeps every leaf at the same
//!   depth by splitting full nodes (and merging sparse ones), limiting the
//!   height to `O(log_t N)`.
//!
//! All three are sets: inserting a key that is already present is rejected
//! and reported by `insert` returning `false`.
//!
//! ## Logging
//!
//! Rotations, splits, borrows, and merges are reported as `tracing` events at
//! the `TRACE` level. Install a subscriber to see them.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod avl;
pub mod bst;
pub mod btree;
mod error;
mod shape;
pub mod traverse;

pub use error::{TreeError, TreeResult};
