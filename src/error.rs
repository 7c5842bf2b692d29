//! Errors returned when an [`Entry`][crate::Entry] cannot be inserted.

use crate::NodeKind;

/// Shorthand for results of fallible tree operations.
pub type Result<V, T> = std::result::Result<V, RangedTreeError<T>>;

/// Errors triggered by inserting into a [`RangedTree`][crate::RangedTree]. The tree is left
/// exactly as it was before the failing call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum RangedTreeError<T> {
    /// A range whose start is greater than its end. The rejected bounds are handed back.
    #[error("range start is greater than range end")]
    InvalidRange {
        /// The rejected lower bound.
        start: T,
        /// The rejected upper bound.
        end: T,
    },
    /// The key is already occupied by a node of a different kind. Overlaps are never merged.
    #[error("key is already held by a {existing:?} node, cannot insert a {inserted:?} node")]
    OverlappingRange {
        /// The contested key.
        key: T,
        /// The kind of the node already in the tree.
        existing: NodeKind,
        /// The kind of the node that was rejected.
        inserted: NodeKind,
    },
}
