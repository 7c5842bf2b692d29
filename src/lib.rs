//! A membership set for character classes such as `[a-z0-9_]`, built from single values and
//! inclusive ranges.
//!
//! ## Ranged Tree
//!
//! A [`RangedTree`] is a Binary Search Tree kept balanced with AVL rotations. Every inserted
//! value becomes one node, and every inserted range becomes two: one marking where the range
//! starts and one marking where it ends. All nodes are ordered by key alone, whatever they stand
//! for, so the usual BST invariants hold:
//!
//! 1. For every node, all the nodes in its left subtree have a smaller key.
//! 2. For every node, all the nodes in its right subtree have a larger key.
//!
//! The AVL invariant (the heights of any node's two subtrees differ by at most one) keeps the
//! height at `O(lg N)`, so [`RangedTree::contains`] is a single `O(lg N)` descent.
//!
//! > Overlapping ranges are not merged. Callers should merge them before inserting.
//!
//! Once built, the tree is only read, so it can be shared between threads without locking.
//!
//! ## Features
//!
//! - `serde`: derives `Serialize` and `Deserialize` for [`Entry`] and [`NodeKind`].

#![deny(missing_docs)]

mod entry;
mod error;
pub mod tree;

pub use entry::Entry;
pub use error::{RangedTreeError, Result};
pub use tree::{NodeKind, RangedTree};
