//! An unbalanced Binary Search Tree. It does nothing to limit its height so
//! inserting keys in sorted order degrades it into a linked list, but it is the
//! simplest correct tree and the one the structural predicates are most
//! interesting on.
//!
//! # Examples
//!
//! ```
//! use search_trees::bst::Tree;
//!
//! let mut tree: Tree<i32> = [10, 5, 15, 3, 7, 12, 17].into_iter().collect();
//!
//! assert!(tree.search(&12));
//! assert!(tree.is_bst());
//! assert!(tree.is_perfect());
//!
//! // Deleting the root promotes its in-order successor.
//! assert!(tree.delete(&10));
//! assert_eq!(tree.pre_order().next(), Some(&12));
//! assert!(!tree.is_perfect());
//! ```

use std::cmp::Ordering;

use crate::error::{TreeError, TreeResult};
use crate::shape;
use crate::traverse::{self, BinaryNode};

/// Lazy in-order traversal of a [`Tree`].
pub type InOrder<'a, K> = traverse::InOrder<'a, Node<K>>;
/// Lazy pre-order traversal of a [`Tree`].
pub type PreOrder<'a, K> = traverse::PreOrder<'a, Node<K>>;
/// Lazy post-order traversal of a [`Tree`].
pub type PostOrder<'a, K> = traverse::PostOrder<'a, Node<K>>;
/// Lazy level-order traversal of a [`Tree`].
pub type LevelOrder<'a, K> = traverse::LevelOrder<'a, Node<K>>;

type Link<K> = Option<Box<Node<K>>>;

/// A Binary Search Tree holding a set of keys. Inserting a key that is already
/// present leaves the tree unchanged.
///
/// Inserting, searching, deleting, measuring, and dropping work on trees of
/// any depth. The structural predicates (`is_bst` and friends) recurse once per
/// level, so on a degenerate tree of many keys they need a deep stack.
pub struct Tree<K> {
    root: Link<K>,
    len: usize,
}

/// A node of a [`Tree`]. It owns both of its children.
pub struct Node<K> {
    key: K,
    left: Link<K>,
    right: Link<K>,
}

impl<K> Node<K> {
    fn new_boxed(key: K) -> Box<Self> {
        Box::new(Self {
            key,
            left: None,
            right: None,
        })
    }
}

impl<K> BinaryNode for Node<K> {
    type Key = K;

    fn key(&self) -> &K {
        &self.key
    }

    fn left(&self) -> Option<&Self> {
        self.left.as_deref()
    }

    fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }
}

impl<K> Default for Tree<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Tree<K> {
    /// Generates a new, empty `Tree`.
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// How many keys are stored in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Inserts `key`, returning `false` if it was already present.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::bst::Tree;
    ///
    /// let mut tree = Tree::new();
    /// assert!(tree.insert(1));
    /// assert!(!tree.insert(1));
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K) -> bool
    where
        K: Ord,
    {
        let inserted = insert(&mut self.root, key);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Whether `key` is stored in the tree.
    pub fn search(&self, key: &K) -> bool
    where
        K: Ord,
    {
        let mut node = self.root.as_deref();
        while let Some(n) = node {
            node = match key.cmp(&n.key) {
                Ordering::Less => n.left.as_deref(),
                Ordering::Equal => return true,
                Ordering::Greater => n.right.as_deref(),
            };
        }
        false
    }

    /// Removes `key` from the tree, returning whether it was present. A node
    /// with two children takes the key of its in-order successor, which is
    /// then removed from the right subtree instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::bst::Tree;
    ///
    /// let mut tree: Tree<_> = [2, 1, 3].into_iter().collect();
    /// assert!(tree.delete(&2));
    /// assert!(!tree.delete(&2));
    /// assert_eq!(tree.in_order().collect::<Vec<_>>(), [&1, &3]);
    /// ```
    pub fn delete(&mut self, key: &K) -> bool
    where
        K: Ord,
    {
        let deleted = delete(&mut self.root, key);
        if deleted {
            self.len -= 1;
        }
        deleted
    }

    /// Keys in ascending order.
    pub fn in_order(&self) -> InOrder<'_, K> {
        InOrder::new(self.root.as_deref())
    }

    /// Keys with each node before its subtrees.
    pub fn pre_order(&self) -> PreOrder<'_, K> {
        PreOrder::new(self.root.as_deref())
    }

    /// Keys with each node after its subtrees.
    pub fn post_order(&self) -> PostOrder<'_, K> {
        PostOrder::new(self.root.as_deref())
    }

    /// Keys breadth first, one depth at a time.
    pub fn level_order(&self) -> LevelOrder<'_, K> {
        LevelOrder::new(self.root.as_deref())
    }

    /// Same as [`in_order`][Tree::in_order].
    pub fn iter(&self) -> InOrder<'_, K> {
        self.in_order()
    }

    /// Number of nodes on the longest root-to-leaf path. An empty tree has
    /// height 0.
    pub fn height(&self) -> usize {
        shape::height(self.root.as_deref())
    }

    /// The smallest key.
    ///
    /// # Errors
    ///
    /// [`TreeError::Empty`] if the tree holds no keys.
    pub fn min_value(&self) -> TreeResult<&K> {
        self.root
            .as_deref()
            .map(shape::min_key)
            .ok_or(TreeError::Empty)
    }

    /// The largest key.
    ///
    /// # Errors
    ///
    /// [`TreeError::Empty`] if the tree holds no keys.
    pub fn max_value(&self) -> TreeResult<&K> {
        self.root
            .as_deref()
            .map(shape::max_key)
            .ok_or(TreeError::Empty)
    }

    /// Counts the nodes by walking the whole tree.
    pub fn count_nodes(&self) -> usize {
        shape::count_nodes(self.root.as_deref())
    }

    /// Counts the nodes without children.
    pub fn count_leaves(&self) -> usize {
        shape::count_leaves(self.root.as_deref())
    }

    /// Whether every key lies strictly between the keys of the ancestors it
    /// hangs left and right of.
    pub fn is_bst(&self) -> bool
    where
        K: Ord,
    {
        shape::is_bst(self.root.as_deref())
    }

    /// Whether, at every node, the heights of the two subtrees differ by at
    /// most one.
    pub fn is_balanced(&self) -> bool {
        shape::is_balanced(self.root.as_deref())
    }

    /// Whether every level is full except possibly the last, which is filled
    /// from the left.
    pub fn is_complete(&self) -> bool {
        shape::is_complete(self.root.as_deref())
    }

    /// Whether every internal node has two children and all leaves share a
    /// depth.
    pub fn is_perfect(&self) -> bool {
        shape::is_perfect(self.root.as_deref())
    }

    /// Whether every node has either zero or two children.
    pub fn is_full(&self) -> bool {
        shape::is_full(self.root.as_deref())
    }
}

// Insert and delete walk a cursor down the tree instead of recursing, since a
// degenerate tree is as deep as it is long.

fn insert<K: Ord>(mut link: &mut Link<K>, key: K) -> bool {
    while let Some(node) = link {
        link = match key.cmp(&node.key) {
            Ordering::Less => &mut node.left,
            Ordering::Equal => return false,
            Ordering::Greater => &mut node.right,
        };
    }
    *link = Some(Node::new_boxed(key));
    true
}

fn delete<K: Ord>(mut link: &mut Link<K>, key: &K) -> bool {
    loop {
        let ord = match link {
            None => return false,
            Some(node) => key.cmp(&node.key),
        };
        match ord {
            Ordering::Less => link = &mut link.as_mut().unwrap().left,
            Ordering::Greater => link = &mut link.as_mut().unwrap().right,
            Ordering::Equal => {
                let node = link.as_mut().unwrap();
                if node.left.is_some() && node.right.is_some() {
                    node.key = pop_min(&mut node.right).expect("Two children => right child");
                } else {
                    let child = node.left.take().or_else(|| node.right.take());
                    *link = child;
                }
                return true;
            }
        }
    }
}

/// Removes the smallest node of the subtree at `link`, handing its right
/// subtree to its parent, and returns its key.
fn pop_min<K>(mut link: &mut Link<K>) -> Option<K> {
    loop {
        if link.as_ref().is_some_and(|node| node.left.is_some()) {
            link = &mut link.as_mut().unwrap().left;
        } else {
            let Node { key, right, .. } = *link.take()?;
            *link = right;
            return Some(key);
        }
    }
}

/// Tears the tree down one node at a time. The default drop would recurse
/// through every level.
impl<K> Drop for Tree<K> {
    fn drop(&mut self) {
        let mut stack: Vec<Box<Node<K>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

impl<'a, K> IntoIterator for &'a Tree<K> {
    type Item = &'a K;
    type IntoIter = InOrder<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.in_order()
    }
}

impl<K: Ord> Extend<K> for Tree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord> FromIterator<K> for Tree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}
