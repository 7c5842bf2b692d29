//! A self-balancing (AVL) tree holding single values and inclusive ranges side by side.
//!
//! A range `start..=end` is not stored as one node. Instead it becomes two independent nodes, a
//! [`NodeKind::LowerFence`] at `start` and a [`NodeKind::UpperFence`] at `end`, which are inserted
//! and balanced like any other key. Read in order, the keys form a sequence of breakpoints that
//! splits the domain into runs that are inside or outside the set.
//!
//! Nodes live in an arena and refer to each other by index, so the parent link that rotations
//! need is plain data and never owns anything.
//!
//! # Examples
//!
//! ```
//! use ranged_tree::{RangedTree, RangedTreeError};
//!
//! let mut tree = RangedTree::new();
//!
//! // Nothing in here yet.
//! assert!(!tree.contains(&'a'));
//!
//! tree.insert_point('a').unwrap();
//! tree.insert_range('c', 'f').unwrap();
//!
//! assert!(tree.contains(&'a'));
//! assert!(!tree.contains(&'b'));
//! assert!(tree.contains(&'d'));
//! assert!(tree['f']);
//!
//! // Keys already holding a fence can't also hold a point.
//! assert!(matches!(
//!     tree.insert_point('f'),
//!     Err(RangedTreeError::OverlappingRange { .. })
//! ));
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Entry, RangedTreeError, Result};

/// What a node in a [`RangedTree`] stands for.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A single value.
    Point,
    /// The inclusive start of a range.
    LowerFence,
    /// The inclusive end of a range.
    UpperFence,
}

/// Position of a node in the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct NodeId(usize);

type Link = Option<NodeId>;

#[derive(Clone, Debug)]
struct Node<T> {
    key: T,
    kind: NodeKind,

    /// How many levels are in the subtree rooted at this node.
    /// A node with no children has a height of 1.
    height: usize,

    left: Link,
    right: Link,
    /// Only used to walk back up after an insert and to re-hang rotated subtrees.
    parent: Link,
}

impl<T> Node<T> {
    fn new(key: T, kind: NodeKind, parent: Link) -> Self {
        Self {
            key,
            kind,
            height: 1,
            left: None,
            right: None,
            parent,
        }
    }
}

/// Outcome of walking the tree looking for a key.
enum Search {
    Found(NodeId),
    /// The key is absent. Holds the node a new leaf would hang from and the side it would hang
    /// on, or `None` if the tree is empty.
    Vacant(Option<(NodeId, Ordering)>),
}

/// An AVL tree answering "is `x` in the set?" for a set made of single values and inclusive
/// ranges.
///
/// Overlapping ranges are not merged. Inserting a key that is already held by a node of another
/// kind fails with [`RangedTreeError::OverlappingRange`] and leaves the tree untouched.
///
/// Cloning copies every node. Mutation needs `&mut self`, so once built the tree can be shared
/// freely between readers.
#[derive(Clone)]
pub struct RangedTree<T> {
    nodes: Vec<Node<T>>,
    root: Link,
}

impl<T> Default for RangedTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for RangedTree<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<T> RangedTree<T> {
    /// Generate a new, empty `RangedTree`.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
        }
    }

    /// Builds a tree by inserting every entry in order. Construction stops at the first entry
    /// that can't be inserted and its error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranged_tree::{Entry, RangedTree};
    ///
    /// // [a-z0-9_]
    /// let word = RangedTree::from_entries([
    ///     Entry::range('a', 'z'),
    ///     Entry::range('0', '9'),
    ///     Entry::point('_'),
    /// ])
    /// .unwrap();
    ///
    /// assert!(word.contains(&'7'));
    /// assert!(!word.contains(&'-'));
    /// ```
    pub fn from_entries<I>(entries: I) -> Result<Self, T>
    where
        I: IntoIterator,
        I::Item: Into<Entry<T>>,
        T: Ord,
    {
        let mut tree = Self::new();
        tree.try_extend(entries)?;
        Ok(tree)
    }

    /// Inserts every entry in order, stopping at the first one that fails. Entries before the
    /// failing one stay in the tree.
    pub fn try_extend<I>(&mut self, entries: I) -> Result<(), T>
    where
        I: IntoIterator,
        I::Item: Into<Entry<T>>,
        T: Ord,
    {
        entries
            .into_iter()
            .try_for_each(|entry| self.insert(entry))
    }

    /// Inserts a point or a range. See [`insert_point`][Self::insert_point] and
    /// [`insert_range`][Self::insert_range].
    ///
    /// # Examples
    ///
    /// ```
    /// use ranged_tree::{Entry, RangedTree};
    ///
    /// let mut tree = RangedTree::new();
    /// tree.insert(Entry::point(42)).unwrap();
    /// tree.insert(0..=9).unwrap();
    ///
    /// assert!(tree.contains(&42));
    /// assert!(tree.contains(&5));
    /// ```
    pub fn insert(&mut self, entry: impl Into<Entry<T>>) -> Result<(), T>
    where
        T: Ord,
    {
        match entry.into() {
            Entry::Point(value) => self.insert_point(value),
            Entry::Range { start, end } => self.insert_range(start, end),
        }
    }

    /// Adds the single value `value`. Inserting a value that is already a point does nothing.
    ///
    /// # Errors
    ///
    /// [`RangedTreeError::OverlappingRange`] if `value` is the start or end of a range already
    /// in the tree.
    pub fn insert_point(&mut self, value: T) -> Result<(), T>
    where
        T: Ord,
    {
        if let Some(existing) = self.conflict(&value, NodeKind::Point) {
            return Err(overlap(value, existing, NodeKind::Point));
        }
        self.attach(value, NodeKind::Point);
        Ok(())
    }

    /// Adds every value from `start` to `end`, both inclusive. A range whose bounds are equal is
    /// stored as a point. A bound that already holds a fence of the same kind is left alone.
    ///
    /// Either both bounds are added or neither is.
    ///
    /// # Errors
    ///
    /// - [`RangedTreeError::InvalidRange`] if `start > end`.
    /// - [`RangedTreeError::OverlappingRange`] if either bound is already held by a node of a
    ///   different kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranged_tree::{RangedTree, RangedTreeError};
    ///
    /// let mut tree = RangedTree::new();
    /// tree.insert_point(9).unwrap();
    ///
    /// let err = tree.insert_range(5, 9).unwrap_err();
    /// assert!(matches!(err, RangedTreeError::OverlappingRange { key: 9, .. }));
    ///
    /// // The lower bound wasn't added either.
    /// assert!(!tree.contains(&5));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert_range(&mut self, start: T, end: T) -> Result<(), T>
    where
        T: Ord,
    {
        match start.cmp(&end) {
            Ordering::Less => {}
            Ordering::Equal => return self.insert_point(start),
            Ordering::Greater => {
                log::debug!("rejected range whose start is greater than its end");
                return Err(RangedTreeError::InvalidRange { start, end });
            }
        }

        // Check both bounds before touching anything so a conflict on `end` doesn't leave a
        // dangling lower fence behind.
        if let Some(existing) = self.conflict(&start, NodeKind::LowerFence) {
            return Err(overlap(start, existing, NodeKind::LowerFence));
        }
        if let Some(existing) = self.conflict(&end, NodeKind::UpperFence) {
            return Err(overlap(end, existing, NodeKind::UpperFence));
        }

        self.attach(start, NodeKind::LowerFence);
        self.attach(end, NodeKind::UpperFence);
        Ok(())
    }

    /// Whether `value` is in the set, i.e. it was inserted as a point or lies inside an inserted
    /// range.
    ///
    /// A key hit on any node is a match, fences included. Otherwise `value` is inside a range
    /// when its closest smaller key is a lower fence and its closest larger key is an upper fence
    /// (or there is none). Both neighbours are picked up on the way down so this is a single
    /// `O(lg N)` descent.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranged_tree::RangedTree;
    ///
    /// let mut tree = RangedTree::new();
    /// tree.insert_range(10, 20).unwrap();
    ///
    /// assert!(tree.contains(&10));
    /// assert!(tree.contains(&15));
    /// assert!(tree.contains(&20));
    /// assert!(!tree.contains(&21));
    /// ```
    pub fn contains(&self, value: &T) -> bool
    where
        T: Ord,
    {
        let mut predecessor = None;
        let mut successor = None;

        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = self.node(id);
            cursor = match value.cmp(&node.key) {
                Ordering::Less => {
                    successor = Some(node.kind);
                    node.left
                }
                Ordering::Equal => return true,
                Ordering::Greater => {
                    predecessor = Some(node.kind);
                    node.right
                }
            };
        }

        matches!(
            (predecessor, successor),
            (
                Some(NodeKind::LowerFence),
                None | Some(NodeKind::UpperFence)
            )
        )
    }

    /// Number of nodes in the tree. A range counts for two unless its bounds are equal.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing was inserted yet.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// How many levels the tree has. An empty tree has a height of 0.
    pub fn height(&self) -> usize {
        self.root.map_or(0, |root| self.node(root).height)
    }

    /// Removes everything from the tree.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// Moves every node out into a new tree and leaves `self` empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranged_tree::RangedTree;
    ///
    /// let mut source = RangedTree::new();
    /// source.insert_range('a', 'z').unwrap();
    ///
    /// let target = source.take();
    ///
    /// assert!(target.contains(&'m'));
    /// assert!(!source.contains(&'m'));
    /// assert!(source.is_empty());
    /// ```
    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }

    /// Iterates over every key in increasing order along with the kind of node holding it.
    ///
    /// # Examples
    ///
    /// ```
    /// use ranged_tree::{NodeKind, RangedTree};
    ///
    /// let mut tree = RangedTree::new();
    /// tree.insert_range(3, 7).unwrap();
    /// tree.insert_point(1).unwrap();
    ///
    /// let entries: Vec<_> = tree.iter().collect();
    /// assert_eq!(
    ///     entries,
    ///     [
    ///         (&1, NodeKind::Point),
    ///         (&3, NodeKind::LowerFence),
    ///         (&7, NodeKind::UpperFence),
    ///     ]
    /// );
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            tree: self,
            stack: Vec::new(),
            cursor: self.root,
        }
    }

    fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        &mut self.nodes[id.0]
    }

    fn search(&self, key: &T) -> Search
    where
        T: Ord,
    {
        let mut parent = None;
        let mut cursor = self.root;
        while let Some(id) = cursor {
            let node = self.node(id);
            let ordering = key.cmp(&node.key);
            cursor = match ordering {
                Ordering::Less => node.left,
                Ordering::Equal => return Search::Found(id),
                Ordering::Greater => node.right,
            };
            parent = Some((id, ordering));
        }
        Search::Vacant(parent)
    }

    /// The kind of the node already at `key`, if there is one and it isn't a `kind` node.
    fn conflict(&self, key: &T, kind: NodeKind) -> Option<NodeKind>
    where
        T: Ord,
    {
        match self.search(key) {
            Search::Found(id) => Some(self.node(id).kind).filter(|&existing| existing != kind),
            Search::Vacant(_) => None,
        }
    }

    /// Hangs a new leaf for `key` at the bottom of its search path and rebalances every ancestor
    /// up to the root. Does nothing if `key` is already present.
    fn attach(&mut self, key: T, kind: NodeKind)
    where
        T: Ord,
    {
        let parent = match self.search(&key) {
            Search::Found(_) => return,
            Search::Vacant(parent) => parent,
        };

        let id = NodeId(self.nodes.len());
        self.nodes
            .push(Node::new(key, kind, parent.map(|(parent, _)| parent)));
        log::trace!("attached {:?} node #{}", kind, id.0);

        match parent {
            None => self.root = Some(id),
            Some((parent, Ordering::Less)) => self.node_mut(parent).left = Some(id),
            Some((parent, _)) => self.node_mut(parent).right = Some(id),
        }

        let mut cursor = parent.map(|(parent, _)| parent);
        while let Some(id) = cursor {
            let subtree_root = self.balance(id);
            cursor = self.node(subtree_root).parent;
        }
    }

    /// Adjusts the height of `id` to be the max of its children's heights + 1.
    fn fix_height(&mut self, id: NodeId) {
        let node = self.node(id);
        let left_height = node.left.map_or(0, |n| self.node(n).height);
        let right_height = node.right.map_or(0, |n| self.node(n).height);
        self.node_mut(id).height = left_height.max(right_height) + 1;
    }

    /// The difference in height between the right and left subtrees. See [the Wikipedia
    /// page][wiki] for more details.
    ///
    /// [wiki]: https://en.wikipedia.org/wiki/AVL_tree#Balance_factor
    fn balance_factor(&self, id: NodeId) -> isize {
        let node = self.node(id);
        let right_height = node.right.map_or(0, |n| self.node(n).height);
        let left_height = node.left.map_or(0, |n| self.node(n).height);
        right_height as isize - left_height as isize
    }

    /// Restores the AVL invariant at `id` assuming both its subtrees satisfy it. Returns the node
    /// now at the top of this subtree.
    ///
    /// See https://en.wikipedia.org/wiki/AVL_tree#Rebalancing for terminology.
    fn balance(&mut self, id: NodeId) -> NodeId {
        self.fix_height(id);
        let node = self.node(id);
        let subtree_root = match (self.balance_factor(id), node.left, node.right) {
            (-2, Some(left), _) => {
                if self.balance_factor(left) > 0 {
                    self.rotate_left(left);
                }
                self.rotate_right(id)
            }
            (2, _, Some(right)) => {
                if self.balance_factor(right) < 0 {
                    self.rotate_right(right);
                }
                self.rotate_left(id)
            }
            _ => id,
        };

        if cfg!(debug_assertions) {
            let root = self.node(subtree_root);
            let left_height = root.left.map_or(0, |n| self.node(n).height);
            let right_height = root.right.map_or(0, |n| self.node(n).height);
            assert_eq!(root.height, left_height.max(right_height) + 1);
            assert!(left_height.abs_diff(right_height) <= 1);
        }
        subtree_root
    }

    /// Rotate `id` to the right. This moves the left child up vertically and `id` down
    /// vertically. Used to rebalance the tree when the left child is too tall. As such, it must
    /// only be called when there _is_ a left child.
    ///
    /// ## Panics
    ///
    /// When called on a node without a left child.
    ///
    /// # Diagram
    ///
    /// ```text
    ///    Option<parent>            Option<parent>
    ///      /                         /
    ///   old_root (i.e. "id")      new_root
    ///    /     \                  /     \
    /// new_root  z     rotate ->  x    old_root
    ///  / \                               /  \
    /// x   y                             y    z
    /// ```
    fn rotate_right(&mut self, id: NodeId) -> NodeId {
        let new_root = self.node(id).left.expect("Rotate right => left child");
        let parent = self.node(id).parent;
        let inner = self.node(new_root).right;

        self.node_mut(id).left = inner;
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(id);
        }
        self.node_mut(id).parent = Some(new_root);
        self.fix_height(id);

        self.node_mut(new_root).right = Some(id);
        self.node_mut(new_root).parent = parent;
        self.fix_height(new_root);

        self.replace_child(parent, id, new_root);
        log::trace!("rotated node #{} right under node #{}", id.0, new_root.0);
        new_root
    }

    /// Mirror image of [`rotate_right`][Self::rotate_right].
    ///
    /// ## Panics
    ///
    /// When called on a node without a right child.
    fn rotate_left(&mut self, id: NodeId) -> NodeId {
        let new_root = self.node(id).right.expect("Rotate left => right child");
        let parent = self.node(id).parent;
        let inner = self.node(new_root).left;

        self.node_mut(id).right = inner;
        if let Some(inner) = inner {
            self.node_mut(inner).parent = Some(id);
        }
        self.node_mut(id).parent = Some(new_root);
        self.fix_height(id);

        self.node_mut(new_root).left = Some(id);
        self.node_mut(new_root).parent = parent;
        self.fix_height(new_root);

        self.replace_child(parent, id, new_root);
        log::trace!("rotated node #{} left under node #{}", id.0, new_root.0);
        new_root
    }

    /// Points whatever referenced `old` (a parent or the root) at `new` instead.
    fn replace_child(&mut self, parent: Link, old: NodeId, new: NodeId) {
        let Some(parent) = parent else {
            self.root = Some(new);
            return;
        };
        let parent = self.node_mut(parent);
        if parent.left == Some(old) {
            parent.left = Some(new);
        } else {
            parent.right = Some(new);
        }
    }
}

fn overlap<T>(key: T, existing: NodeKind, inserted: NodeKind) -> RangedTreeError<T> {
    log::debug!("rejected {inserted:?} node on a key held by a {existing:?} node");
    RangedTreeError::OverlappingRange {
        key,
        existing,
        inserted,
    }
}

/// `tree[x]` is the same as `tree.contains(&x)`.
impl<T> Index<T> for RangedTree<T>
where
    T: Ord,
{
    type Output = bool;

    fn index(&self, value: T) -> &bool {
        if self.contains(&value) {
            &true
        } else {
            &false
        }
    }
}

/// In-order iterator over the keys of a [`RangedTree`]. Created by [`RangedTree::iter`].
pub struct Iter<'a, T> {
    tree: &'a RangedTree<T>,
    /// Ancestors whose key hasn't been yielded yet.
    stack: Vec<NodeId>,
    cursor: Link,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (&'a T, NodeKind);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        while let Some(id) = self.cursor {
            self.stack.push(id);
            self.cursor = tree.node(id).left;
        }

        let node = tree.node(self.stack.pop()?);
        self.cursor = node.right;
        Some((&node.key, node.kind))
    }
}

impl<'a, T> IntoIterator for &'a RangedTree<T> {
    type Item = (&'a T, NodeKind);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
