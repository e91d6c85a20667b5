//! An in-memory B-Tree: a multiway search tree whose nodes hold between `t - 1`
//! and `2t - 1` sorted keys, where `t` is the tree's *order* (minimum degree).
//! Instead of rotating, it stays balanced by splitting full nodes on the way
//! down during inserts and by borrowing from or merging with siblings on the
//! way down during deletes, so every leaf is always at the same depth.
//!
//! With `t = 2` nodes hold one to three keys, which makes it a 2-3-4 tree.
//!
//! # Examples
//!
//! ```
//! use search_trees::btree::Tree;
//!
//! let mut tree = Tree::new(3).unwrap();
//! for key in [6, 2, 4, 15, 18, 8, 27, 9, 10, 15, 12, 17] {
//!     tree.insert(key);
//! }
//!
//! // The second 15 was rejected.
//! assert_eq!(tree.len(), 11);
//! assert_eq!(
//!     tree.traverse().copied().collect::<Vec<_>>(),
//!     [2, 4, 6, 8, 9, 10, 12, 15, 17, 18, 27]
//! );
//!
//! let found = tree.search(&6).unwrap();
//! assert_eq!(found.key(), &6);
//! assert!(tree.search(&7).is_none());
//! ```

use std::fmt;
use std::iter::FusedIterator;

use tracing::{debug, trace};

use crate::error::{TreeError, TreeResult};

/// The smallest valid order. A B-Tree of this order is a 2-3-4 tree.
pub const MIN_ORDER: usize = 2;

/// The order used by [`Tree::default`].
pub const DEFAULT_ORDER: usize = 3;

/// A B-Tree holding a set of keys. Inserting a key that is already present
/// leaves the tree unchanged.
pub struct Tree<K> {
    /// `None` exactly when the tree is empty. Otherwise the root holds at
    /// least one key.
    root: Option<Box<Node<K>>>,
    /// Fixed for the tree's lifetime.
    degree: Degree,
    len: usize,
}

/// A node of a [`Tree`]. A node is a leaf when it has no children. Otherwise it
/// has exactly one more child than it has keys, and child `i` holds the keys
/// that fall between `keys[i - 1]` and `keys[i]`.
#[derive(Debug)]
pub struct Node<K> {
    keys: Vec<K>,
    children: Vec<Box<Node<K>>>,
}

/// Where [`Tree::search`] found a key: the node holding it and the key's
/// position among that node's keys.
#[derive(Debug)]
pub struct Found<'a, K> {
    node: &'a Node<K>,
    index: usize,
}

/// Manual implementation of `Clone` so a handle can be copied even when `K`
/// isn't `Clone`.
impl<K> Clone for Found<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for Found<'_, K> {}

impl<'a, K> Found<'a, K> {
    /// The key that was searched for, as stored in the tree.
    pub fn key(&self) -> &'a K {
        &self.node.keys[self.index]
    }

    /// The key's position within its node.
    pub fn index(&self) -> usize {
        self.index
    }

    /// All keys of the node holding the key, in ascending order.
    pub fn keys(&self) -> &'a [K] {
        &self.node.keys
    }

    /// Whether the key lives in a leaf.
    pub fn is_leaf(&self) -> bool {
        self.node.is_leaf()
    }
}

/// A tree's order together with the node capacity it implies.
#[derive(Debug, Clone, Copy)]
struct Degree {
    /// Minimum degree `t`. Every node but the root holds at least `t - 1` keys.
    order: usize,
    /// `2t - 1`, the most keys a node can hold.
    max_keys: usize,
}

impl Degree {
    /// `None` when `order` is below [`MIN_ORDER`] or `2 * order - 1` overflows.
    fn new(order: usize) -> Option<Self> {
        if order < MIN_ORDER {
            return None;
        }
        let max_keys = order.checked_mul(2)? - 1;
        Some(Self { order, max_keys })
    }
}

impl<K> Default for Tree<K> {
    fn default() -> Self {
        Self {
            root: None,
            degree: Degree {
                order: DEFAULT_ORDER,
                max_keys: 2 * DEFAULT_ORDER - 1,
            },
            len: 0,
        }
    }
}

impl<K> Tree<K> {
    /// Creates an empty tree of the given order (minimum degree).
    ///
    /// # Errors
    ///
    /// [`TreeError::InvalidOrder`] if `order` is below [`MIN_ORDER`], or so large
    /// that a node's capacity of `2 * order - 1` keys doesn't fit in a `usize`.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::{btree::Tree, TreeError};
    ///
    /// assert!(Tree::<i32>::new(2).is_ok());
    /// assert_eq!(Tree::<i32>::new(1).err(), Some(TreeError::InvalidOrder(1)));
    /// ```
    pub fn new(order: usize) -> TreeResult<Self> {
        let Some(degree) = Degree::new(order) else {
            debug!(order, "rejected B-Tree order");
            return Err(TreeError::InvalidOrder(order));
        };
        debug!(order, max_keys = degree.max_keys, "created B-Tree");

        Ok(Self {
            root: None,
            degree,
            len: 0,
        })
    }

    /// The tree's order (minimum degree).
    pub fn order(&self) -> usize {
        self.degree.order
    }

    /// How many keys are stored in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of levels in the tree. An empty tree has height 0.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut node = self.root.as_deref();
        while let Some(n) = node {
            height += 1;
            node = n.children.first().map(Box::as_ref);
        }
        height
    }

    /// Looks for `key`, scanning each node's keys left to right and descending
    /// into the child before the first key greater than it.
    pub fn search(&self, key: &K) -> Option<Found<'_, K>>
    where
        K: Ord,
    {
        let mut node = self.root.as_deref()?;
        loop {
            let index = node.lower_bound(key);
            if node.keys.get(index) == Some(key) {
                return Some(Found { node, index });
            }
            node = node.children.get(index).map(Box::as_ref)?;
        }
    }

    /// Whether `key` is stored in the tree.
    pub fn contains(&self, key: &K) -> bool
    where
        K: Ord,
    {
        self.search(key).is_some()
    }

    /// Inserts `key`, returning `false` if it was already present.
    ///
    /// Full nodes are split on the way down so the leaf the key lands in is
    /// never full. A full root is split first, which is the only way the tree
    /// grows taller.
    pub fn insert(&mut self, key: K) -> bool
    where
        K: Ord,
    {
        if self.contains(&key) {
            return false;
        }

        let degree = self.degree;
        self.root = Some(match self.root.take() {
            None => Box::new(Node {
                keys: vec![key],
                children: Vec::new(),
            }),
            Some(root) if root.is_full(degree) => {
                trace!(order = degree.order, "splitting full B-Tree root");
                let mut new_root = Box::new(Node {
                    keys: Vec::new(),
                    children: vec![root],
                });
                new_root.split_child(0, degree);

                let half = usize::from(new_root.keys[0] < key);
                new_root.children[half].insert_non_full(key, degree);
                new_root
            }
            Some(mut root) => {
                root.insert_non_full(key, degree);
                root
            }
        });

        self.len += 1;
        true
    }

    /// Removes `key` from the tree, returning whether it was present.
    ///
    /// Every node the deletion descends into is first topped up to at least
    /// `t` keys, by borrowing a key through the parent from a sibling that can
    /// spare one or by merging with a sibling, so removing a key from a leaf
    /// never leaves it underfull. The tree gets shorter when the root loses its
    /// last key to a merge.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::btree::Tree;
    ///
    /// let mut tree = Tree::new(2).unwrap();
    /// tree.extend(1..=10);
    ///
    /// assert!(tree.delete(&4));
    /// assert!(!tree.delete(&4));
    /// assert!(!tree.contains(&4));
    /// assert!(tree.is_valid());
    /// ```
    pub fn delete(&mut self, key: &K) -> bool
    where
        K: Ord,
    {
        let degree = self.degree;
        let deleted = match self.root.as_mut() {
            None => return false,
            Some(root) => root.delete(key, degree),
        };

        if let Some(root) = self.root.take() {
            self.root = if root.keys.is_empty() {
                trace!(order = degree.order, "B-Tree root emptied, shrinking");
                root.children.into_iter().next()
            } else {
                Some(root)
            };
        }

        if deleted {
            self.len -= 1;
        }
        deleted
    }

    /// All keys in ascending order: for each node, the subtree left of each key,
    /// then the key, finishing with the rightmost subtree.
    pub fn traverse(&self) -> Iter<'_, K> {
        Iter::new(self)
    }

    /// Same as [`traverse`][Tree::traverse].
    pub fn iter(&self) -> Iter<'_, K> {
        self.traverse()
    }

    /// The smallest key.
    ///
    /// # Errors
    ///
    /// [`TreeError::Empty`] if the tree holds no keys.
    pub fn min_value(&self) -> TreeResult<&K> {
        let mut node = self.root.as_deref().ok_or(TreeError::Empty)?;
        while let Some(first) = node.children.first() {
            node = first.as_ref();
        }
        node.keys.first().ok_or(TreeError::Empty)
    }

    /// The largest key.
    ///
    /// # Errors
    ///
    /// [`TreeError::Empty`] if the tree holds no keys.
    pub fn max_value(&self) -> TreeResult<&K> {
        let mut node = self.root.as_deref().ok_or(TreeError::Empty)?;
        while let Some(last) = node.children.last() {
            node = last.as_ref();
        }
        node.keys.last().ok_or(TreeError::Empty)
    }

    /// Checks every B-Tree invariant: key counts within bounds for the order,
    /// one more child than keys in internal nodes, keys strictly increasing
    /// and separating the subtrees, and all leaves at the same depth. Always
    /// `true` between operations.
    ///
    /// This is a public diagnostic for tests and debugging. It walks the whole
    /// tree, so it isn't something to call on every operation in production.
    pub fn is_valid(&self) -> bool
    where
        K: Ord,
    {
        let Some(root) = self.root.as_deref() else {
            return self.len == 0;
        };
        let mut leaf_depth = None;
        let mut count = 0;
        !root.keys.is_empty()
            && root.is_valid(self.degree, true, None, None, 1, &mut leaf_depth, &mut count)
            && count == self.len
    }
}

impl<K> Node<K> {
    fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    fn is_full(&self, degree: Degree) -> bool {
        self.keys.len() == degree.max_keys
    }

    /// Index of the first key that is not less than `key`, which is also the
    /// index of the child to descend into when the key isn't in this node.
    fn lower_bound(&self, key: &K) -> usize
    where
        K: Ord,
    {
        self.keys.iter().take_while(|k| *k < key).count()
    }

    /// Inserts into the subtree rooted at this node, which must not be full.
    fn insert_non_full(&mut self, key: K, degree: Degree)
    where
        K: Ord,
    {
        let mut index = self.lower_bound(&key);
        if self.is_leaf() {
            self.keys.insert(index, key);
            return;
        }

        if self.children[index].is_full(degree) {
            self.split_child(index, degree);
            // The promoted median now sits at `index`; the key belongs to
            // whichever half it falls in.
            if self.keys[index] < key {
                index += 1;
            }
        }
        self.children[index].insert_non_full(key, degree);
    }

    /// Splits the full child at `index` in two around its median. The upper
    /// `t - 1` keys (and upper `t` children) move to a new sibling at
    /// `index + 1` and the median moves up into this node at `index`.
    ///
    /// ## Panics
    ///
    /// When the child at `index` isn't full.
    ///
    /// # Diagram
    ///
    /// With `t = 2`:
    ///
    /// ```text
    ///        [ .. p .. ]                 [ .. b p .. ]
    ///            |          split ->        /   \
    ///        [a b c]                      [a]   [c]
    /// ```
    fn split_child(&mut self, index: usize, degree: Degree) {
        let child = &mut self.children[index];
        assert!(
            child.is_full(degree),
            "split_child requires a full child ({} of {} keys)",
            child.keys.len(),
            degree.max_keys
        );

        let upper_keys = child.keys.split_off(degree.order);
        let upper_children = if child.is_leaf() {
            Vec::new()
        } else {
            child.children.split_off(degree.order)
        };
        let median = child.keys.pop().expect("Full child => median key");
        trace!(index, leaf = child.is_leaf(), "split B-Tree node");

        self.keys.insert(index, median);
        self.children.insert(
            index + 1,
            Box::new(Node {
                keys: upper_keys,
                children: upper_children,
            }),
        );
    }

    /// Deletes `key` from the subtree rooted at this node. Unless this node is
    /// the root, it holds at least `t` keys on entry.
    fn delete(&mut self, key: &K, degree: Degree) -> bool
    where
        K: Ord,
    {
        let index = self.lower_bound(key);
        let found = self.keys.get(index) == Some(key);

        if self.is_leaf() {
            if found {
                self.keys.remove(index);
            }
            return found;
        }

        if !found {
            let index = self.fill_child(index, degree);
            return self.children[index].delete(key, degree);
        }

        if self.children[index].keys.len() >= degree.order {
            self.keys[index] = self.children[index].pop_max(degree);
        } else if self.children[index + 1].keys.len() >= degree.order {
            self.keys[index] = self.children[index + 1].pop_min(degree);
        } else {
            // Both neighbours are minimal: fold the key down between them and
            // delete it from the merged node.
            self.merge_children(index);
            self.children[index].delete(key, degree);
        }
        true
    }

    /// Removes and returns the largest key of the subtree rooted at this node,
    /// which holds at least `t` keys.
    fn pop_max(&mut self, degree: Degree) -> K {
        if self.is_leaf() {
            return self.keys.pop().expect("Node with t keys => largest key");
        }
        let last = self.fill_child(self.children.len() - 1, degree);
        self.children[last].pop_max(degree)
    }

    /// Removes and returns the smallest key of the subtree rooted at this node,
    /// which holds at least `t` keys.
    fn pop_min(&mut self, degree: Degree) -> K {
        if self.is_leaf() {
            return self.keys.remove(0);
        }
        let first = self.fill_child(0, degree);
        self.children[first].pop_min(degree)
    }

    /// Makes sure the child at `index` has at least `t` keys so one can be
    /// deleted from its subtree. Returns the index of the child to descend
    /// into, which moves left when the child is merged into its left sibling.
    fn fill_child(&mut self, index: usize, degree: Degree) -> usize {
        if self.children[index].keys.len() >= degree.order {
            return index;
        }

        let has_right = index + 1 < self.children.len();
        if index > 0 && self.children[index - 1].keys.len() >= degree.order {
            self.borrow_from_left(index);
            index
        } else if has_right && self.children[index + 1].keys.len() >= degree.order {
            self.borrow_from_right(index);
            index
        } else if has_right {
            self.merge_children(index);
            index
        } else {
            self.merge_children(index - 1);
            index - 1
        }
    }

    /// Rotates the left sibling's largest key up into this node and the
    /// separating key down to the front of the child at `index`.
    fn borrow_from_left(&mut self, index: usize) {
        trace!(index, "B-Tree child borrowing from left sibling");
        let (before, after) = self.children.split_at_mut(index);
        let left = &mut before[index - 1];
        let child = &mut after[0];

        let lifted = left.keys.pop().expect("Borrow => left sibling has spare key");
        let separator = std::mem::replace(&mut self.keys[index - 1], lifted);
        child.keys.insert(0, separator);
        if let Some(grandchild) = left.children.pop() {
            child.children.insert(0, grandchild);
        }
    }

    /// Rotates the right sibling's smallest key up into this node and the
    /// separating key down to the back of the child at `index`.
    fn borrow_from_right(&mut self, index: usize) {
        trace!(index, "B-Tree child borrowing from right sibling");
        let (through, after) = self.children.split_at_mut(index + 1);
        let child = &mut through[index];
        let right = &mut after[0];

        let lifted = right.keys.remove(0);
        let separator = std::mem::replace(&mut self.keys[index], lifted);
        child.keys.push(separator);
        if !right.is_leaf() {
            child.children.push(right.children.remove(0));
        }
    }

    /// Merges the child at `index + 1` and the key separating it from the
    /// child at `index` into the child at `index`.
    fn merge_children(&mut self, index: usize) {
        trace!(index, "merging B-Tree siblings");
        let separator = self.keys.remove(index);
        let right = self.children.remove(index + 1);
        let left = &mut self.children[index];

        left.keys.push(separator);
        let Node { keys, children } = *right;
        left.keys.extend(keys);
        left.children.extend(children);
    }

    /// Recursively checks this subtree, keeping its keys strictly between
    /// `lower` and `upper`.
    #[allow(clippy::too_many_arguments)]
    fn is_valid<'a>(
        &'a self,
        degree: Degree,
        is_root: bool,
        lower: Option<&'a K>,
        upper: Option<&'a K>,
        depth: usize,
        leaf_depth: &mut Option<usize>,
        count: &mut usize,
    ) -> bool
    where
        K: Ord,
    {
        let min_keys = if is_root { 1 } else { degree.order - 1 };
        if self.keys.len() < min_keys || self.keys.len() > degree.max_keys {
            return false;
        }
        if !self.keys.windows(2).all(|pair| pair[0] < pair[1]) {
            return false;
        }
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return false;
        };
        if lower.map_or(false, |lower| first <= lower) || upper.map_or(false, |upper| last >= upper)
        {
            return false;
        }
        *count += self.keys.len();

        if self.is_leaf() {
            return *leaf_depth.get_or_insert(depth) == depth;
        }
        if self.children.len() != self.keys.len() + 1 {
            return false;
        }
        self.children.iter().enumerate().all(|(i, child)| {
            let lower = if i == 0 { lower } else { self.keys.get(i - 1) };
            let upper = self.keys.get(i).or(upper);
            child.is_valid(degree, false, lower, upper, depth + 1, leaf_depth, count)
        })
    }
}

/// Lazy in-order traversal of a [`Tree`].
pub struct Iter<'a, K> {
    /// Nodes still being walked, each with the index of the next key of it to
    /// yield. Every node's child before that key has already been walked.
    stack: Vec<(&'a Node<K>, usize)>,
    remaining: usize,
}

impl<'a, K> Iter<'a, K> {
    fn new(tree: &'a Tree<K>) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: tree.len,
        };
        iter.push_leftmost_path(tree.root.as_deref());
        iter
    }

    fn push_leftmost_path(&mut self, mut node: Option<&'a Node<K>>) {
        while let Some(current) = node {
            self.stack.push((current, 0));
            node = current.children.first().map(Box::as_ref);
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, index)) = self.stack.pop() {
            if index < node.keys.len() {
                self.stack.push((node, index + 1));
                self.push_leftmost_path(node.children.get(index + 1).map(Box::as_ref));
                self.remaining -= 1;
                return Some(&node.keys[index]);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

impl<K> FusedIterator for Iter<'_, K> {}

impl<'a, K> IntoIterator for &'a Tree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Ord> Extend<K> for Tree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for Tree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("order", &self.degree.order)
            .field("len", &self.len)
            .field("root", &self.root)
            .finish()
    }
}
