//! The two kinds of things that can be added to a [`RangedTree`][crate::RangedTree].

use std::ops::RangeInclusive;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single insertion into a [`RangedTree`][crate::RangedTree].
///
/// # Examples
///
/// ```
/// use ranged_tree::{Entry, RangedTree};
///
/// let mut tree = RangedTree::new();
/// tree.insert(Entry::point('_')).unwrap();
/// tree.insert('a'..='z').unwrap();
///
/// assert!(tree.contains(&'_'));
/// assert!(tree.contains(&'q'));
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Entry<T> {
    /// One element of the set.
    Point(T),
    /// Every element from `start` to `end`, both inclusive. Only valid when `start <= end`,
    /// which is checked on insertion.
    Range {
        /// Smallest element of the range.
        start: T,
        /// Largest element of the range.
        end: T,
    },
}

impl<T> Entry<T> {
    /// An entry for the single element `value`.
    pub fn point(value: T) -> Self {
        Self::Point(value)
    }

    /// An entry for every element in `start..=end`.
    pub fn range(start: T, end: T) -> Self {
        Self::Range { start, end }
    }
}

impl<T> From<RangeInclusive<T>> for Entry<T> {
    fn from(range: RangeInclusive<T>) -> Self {
        let (start, end) = range.into_inner();
        Self::Range { start, end }
    }
}
