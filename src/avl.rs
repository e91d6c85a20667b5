//! A self-balancing Binary Search Tree (specifically, an AVL tree). Every node
//! tracks the height of its subtree and, whenever an insert or delete leaves a
//! node whose subtrees differ in height by more than one, the node is rotated
//! back into balance on the way back up to the root. This keeps the height of
//! the tree `O(lg N)`.
//!
//! # Examples
//!
//! ```
//! use search_trees::avl::Tree;
//!
//! let mut tree = Tree::new();
//!
//! // Inserting in sorted order would make a plain BST a linked list.
//! for key in 1..=7 {
//!     tree.insert(key);
//! }
//! assert_eq!(tree.height(), 3);
//! assert_eq!(tree.pre_order().next(), Some(&4));
//!
//! assert!(tree.delete(&4));
//! assert!(!tree.search(&4));
//! assert!(tree.is_balanced());
//! ```

use std::cmp::Ordering;
use std::fmt;

use tracing::trace;

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

/// An AVL tree holding a set of keys. Inserting a key that is already present
/// leaves the tree unchanged.
pub struct Tree<K> {
    root: Link<K>,
    len: usize,
}

/// A `Node` has a key and up to two children which it owns.
pub struct Node<K> {
    key: K,
    left: Link<K>,
    right: Link<K>,

    /// How many levels are in the subtree rooted at this node.
    /// A node with no children has a height of 1.
    height: usize,
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

fn height<K>(link: &Link<K>) -> usize {
    link.as_ref().map_or(0, |n| n.height)
}

impl<K> Node<K> {
    fn new_boxed(key: K) -> Box<Self> {
        Box::new(Self {
            key,
            left: None,
            right: None,
            height: 1,
        })
    }

    /// Adjusts the height of `self` to be the max of its children's heights + 1.
    fn fix_height(&mut self) {
        self.height = height(&self.left).max(height(&self.right)) + 1;
    }

    /// The height of the left subtree minus the height of the right subtree.
    /// See [the Wikipedia page][wiki] for more details.
    ///
    /// [wiki]: https://en.wikipedia.org/wiki/AVL_tree#Balance_factor
    fn balance_factor(&self) -> isize {
        height(&self.left) as isize - height(&self.right) as isize
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

    /// Number of levels in the tree. An empty tree has height 0.
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    /// Inserts `key`, returning `false` if it was already present. The tree is
    /// rebalanced along the path back to the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::avl::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(30);
    /// tree.insert(20);
    /// // This makes 30 left-heavy so 20 is rotated up to the root.
    /// tree.insert(10);
    ///
    /// assert_eq!(tree.pre_order().collect::<Vec<_>>(), [&20, &10, &30]);
    /// assert!(!tree.insert(10));
    /// ```
    pub fn insert(&mut self, key: K) -> bool
    where
        K: Ord,
    {
        let (root, inserted) = insert(self.root.take(), key);
        self.root = Some(root);
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

    /// Removes `key` from the tree, returning whether it was present. The tree
    /// is rebalanced along the path back to the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use search_trees::avl::Tree;
    ///
    /// let mut tree: Tree<_> = [2, 1, 3, 4].into_iter().collect();
    ///
    /// assert!(tree.delete(&1));
    /// assert!(!tree.delete(&1));
    /// // 2 became right-heavy so 3 was rotated up.
    /// assert_eq!(tree.pre_order().collect::<Vec<_>>(), [&3, &2, &4]);
    /// ```
    pub fn delete(&mut self, key: &K) -> bool
    where
        K: Ord,
    {
        let (root, deleted) = delete(self.root.take(), key);
        self.root = root;
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

    /// Checks the AVL invariant by measuring every subtree rather than
    /// trusting the stored heights. Always `true` between operations.
    pub fn is_balanced(&self) -> bool {
        shape::is_balanced(self.root.as_deref())
    }
}

/// Inserts `key` into the subtree rooted at `link` and returns the (possibly
/// new) root of the subtree and whether the key was added.
fn insert<K: Ord>(link: Link<K>, key: K) -> (Box<Node<K>>, bool) {
    let Some(mut node) = link else {
        return (Node::new_boxed(key), true);
    };

    // Which way the key goes at the child it descends into. Needed on the way
    // back up to tell the single rotations from the double ones.
    let toward_grandchild = match key.cmp(&node.key) {
        Ordering::Equal => return (node, false),
        Ordering::Less => {
            let toward = node.left.as_ref().map(|left| key.cmp(&left.key));
            let (left, inserted) = insert(node.left.take(), key);
            node.left = Some(left);
            if !inserted {
                return (node, false);
            }
            toward
        }
        Ordering::Greater => {
            let toward = node.right.as_ref().map(|right| key.cmp(&right.key));
            let (right, inserted) = insert(node.right.take(), key);
            node.right = Some(right);
            if !inserted {
                return (node, false);
            }
            toward
        }
    };

    (rebalance_after_insert(node, toward_grandchild), true)
}

/// A child subtree of `node` just grew by one key. Restores the AVL invariant
/// at `node`, choosing the rotation by where the inserted key went relative to
/// the child: the same side means a single rotation, the inner side a double.
fn rebalance_after_insert<K>(mut node: Box<Node<K>>, toward: Option<Ordering>) -> Box<Node<K>> {
    node.fix_height();
    let balance = node.balance_factor();

    let node = if balance > 1 {
        if toward == Some(Ordering::Less) {
            trace!(op = "insert", case = "LL", "rebalancing AVL subtree");
            rotate_right(node)
        } else {
            trace!(op = "insert", case = "LR", "rebalancing AVL subtree");
            rotate_left_right(node)
        }
    } else if balance < -1 {
        if toward == Some(Ordering::Greater) {
            trace!(op = "insert", case = "RR", "rebalancing AVL subtree");
            rotate_left(node)
        } else {
            trace!(op = "insert", case = "RL", "rebalancing AVL subtree");
            rotate_right_left(node)
        }
    } else {
        node
    };

    debug_assert_balanced(&node);
    node
}

/// Removes `key` from the subtree rooted at `link` and returns the (possibly
/// empty) new root of the subtree and whether the key was found.
fn delete<K: Ord>(link: Link<K>, key: &K) -> (Link<K>, bool) {
    let Some(mut node) = link else {
        return (None, false);
    };

    let deleted = match key.cmp(&node.key) {
        Ordering::Less => {
            let (left, deleted) = delete(node.left.take(), key);
            node.left = left;
            deleted
        }
        Ordering::Greater => {
            let (right, deleted) = delete(node.right.take(), key);
            node.right = right;
            deleted
        }
        Ordering::Equal => match (node.left.take(), node.right.take()) {
            // The surviving child is already a balanced subtree.
            (None, child) | (child, None) => return (child, true),
            (Some(left), Some(right)) => {
                let (right, successor) = remove_min(right);
                node.key = successor;
                node.left = Some(left);
                node.right = right;
                true
            }
        },
    };

    if !deleted {
        return (Some(node), false);
    }
    (Some(rebalance_after_delete(node)), true)
}

/// Removes the smallest node of the subtree rooted at `node`, rebalancing on
/// the way back up. Returns what is left of the subtree and the removed key.
fn remove_min<K>(mut node: Box<Node<K>>) -> (Link<K>, K) {
    match node.left.take() {
        Some(left) => {
            let (left, min) = remove_min(left);
            node.left = left;
            (Some(rebalance_after_delete(node)), min)
        }
        None => {
            let Node { key, right, .. } = *node;
            (right, key)
        }
    }
}

/// A child subtree of `node` just lost a key. Restores the AVL invariant at
/// `node`, choosing the rotation from the balance of the taller child.
fn rebalance_after_delete<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    node.fix_height();
    let balance = node.balance_factor();
    let child_balance = |child: &Link<K>| child.as_ref().map_or(0, |n| n.balance_factor());

    let node = if balance > 1 {
        if child_balance(&node.left) >= 0 {
            trace!(op = "delete", case = "LL", "rebalancing AVL subtree");
            rotate_right(node)
        } else {
            trace!(op = "delete", case = "LR", "rebalancing AVL subtree");
            rotate_left_right(node)
        }
    } else if balance < -1 {
        if child_balance(&node.right) <= 0 {
            trace!(op = "delete", case = "RR", "rebalancing AVL subtree");
            rotate_left(node)
        } else {
            trace!(op = "delete", case = "RL", "rebalancing AVL subtree");
            rotate_right_left(node)
        }
    } else {
        node
    };

    debug_assert_balanced(&node);
    node
}

/// In debug builds, after balancing, assert that we've restored/maintained the
/// AVL invariant at this node.
fn debug_assert_balanced<K>(node: &Node<K>) {
    if cfg!(debug_assertions) {
        let left_height = height(&node.left);
        let right_height = height(&node.right);
        assert_eq!(node.height, left_height.max(right_height) + 1);
        assert!(left_height.abs_diff(right_height) <= 1);
    }
}

/// Rotate `old_root` to the right. This moves the left child up vertically and
/// `old_root` down vertically. Used to rebalance the tree when the left child
/// is too tall. As such, it must only be called when there _is_ a left child.
///
/// ## Panics
///
/// When called on a node without a left child.
///
/// # Diagram
///
/// ```text
///       old_root                new_root
///        /     \                /     \
///   new_root    z   rotate ->  x    old_root
///    /  \                              /  \
///   x    y                            y    z
/// ```
///
/// Only `y` changes parents, and only `old_root` and `new_root` need their
/// heights recomputed (in that order, since `old_root` is now below).
fn rotate_right<K>(mut old_root: Box<Node<K>>) -> Box<Node<K>> {
    let mut new_root = old_root
        .left
        .take()
        .expect("Rotate right => left child");

    old_root.left = new_root.right.take();
    old_root.fix_height();

    new_root.right = Some(old_root);
    new_root.fix_height();
    new_root
}

/// The mirror image of [`rotate_right`]: the right child moves up and its left
/// subtree becomes `old_root`'s right subtree.
///
/// ## Panics
///
/// When called on a node without a right child.
fn rotate_left<K>(mut old_root: Box<Node<K>>) -> Box<Node<K>> {
    let mut new_root = old_root
        .right
        .take()
        .expect("Rotate left => right child");

    old_root.right = new_root.left.take();
    old_root.fix_height();

    new_root.left = Some(old_root);
    new_root.fix_height();
    new_root
}

fn rotate_left_right<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    node.left = node.left.take().map(rotate_left);
    rotate_right(node)
}

fn rotate_right_left<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    node.right = node.right.take().map(rotate_right);
    rotate_left(node)
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

/// Draws the tree sideways, one key per line, with the right subtree above the
/// left one.
///
/// ```
/// use search_trees::avl::Tree;
///
/// let tree: Tree<_> = [2, 1, 3].into_iter().collect();
/// assert_eq!(tree.to_string(), "└── 2\n    ├── 3\n    └── 1\n");
/// ```
impl<K: fmt::Display> fmt::Display for Tree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            Some(root) => draw(root, "", true, f),
            None => Ok(()),
        }
    }
}

fn draw<K: fmt::Display>(
    node: &Node<K>,
    prefix: &str,
    is_tail: bool,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    let (connector, indent) = if is_tail {
        ("└── ", "    ")
    } else {
        ("├── ", "│   ")
    };
    writeln!(f, "{}{}{}", prefix, connector, node.key)?;

    let prefix = format!("{}{}", prefix, indent);
    if let Some(right) = &node.right {
        draw(right, &prefix, node.left.is_none(), f)?;
    }
    if let Some(left) = &node.left {
        draw(left, &prefix, true, f)?;
    }
    Ok(())
}
