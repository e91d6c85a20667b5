//! Lazy traversals shared by the binary trees ([`bst`][crate::bst] and
//! [`avl`][crate::avl]).
//!
//! Every traversal borrows the tree and yields references to its keys. None of
//! them allocate more than one node reference per level of the tree (or per
//! node of the widest level, for [`LevelOrder`]), and calling the tree's
//! traversal method again starts a fresh walk from the root.

use std::collections::VecDeque;
use std::iter::FusedIterator;

/// Read access to a node of a binary tree. This is all the traversals and the
/// structural predicates need to know about a node, so the unbalanced and the
/// AVL trees can keep their own node layouts.
pub trait BinaryNode {
    /// The type of the key stored in each node.
    type Key;

    /// The key stored in this node.
    fn key(&self) -> &Self::Key;

    /// The root of the left subtree, if any.
    fn left(&self) -> Option<&Self>;

    /// The root of the right subtree, if any.
    fn right(&self) -> Option<&Self>;

    /// Whether this node has no children.
    fn is_leaf(&self) -> bool {
        self.left().is_none() && self.right().is_none()
    }
}

/// Visits the left subtree, then the node, then the right subtree. For a
/// search tree this yields the keys in ascending order.
pub struct InOrder<'a, N> {
    stack: Vec<&'a N>,
}

impl<'a, N: BinaryNode> InOrder<'a, N> {
    pub(crate) fn new(root: Option<&'a N>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_leftmost_path(root);
        iter
    }

    /// Pushes `node` and every left descendant along its leftmost path.
    fn push_leftmost_path(&mut self, mut node: Option<&'a N>) {
        while let Some(current) = node {
            self.stack.push(current);
            node = current.left();
        }
    }
}

impl<'a, N: BinaryNode> Iterator for InOrder<'a, N> {
    type Item = &'a N::Key;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_leftmost_path(node.right());
        Some(node.key())
    }
}

impl<N: BinaryNode> FusedIterator for InOrder<'_, N> {}

/// Visits the node, then the left subtree, then the right subtree.
pub struct PreOrder<'a, N> {
    stack: Vec<&'a N>,
}

impl<'a, N: BinaryNode> PreOrder<'a, N> {
    pub(crate) fn new(root: Option<&'a N>) -> Self {
        Self {
            stack: root.into_iter().collect(),
        }
    }
}

impl<'a, N: BinaryNode> Iterator for PreOrder<'a, N> {
    type Item = &'a N::Key;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Right goes on first so the left subtree is popped first.
        self.stack.extend(node.right());
        self.stack.extend(node.left());
        Some(node.key())
    }
}

impl<N: BinaryNode> FusedIterator for PreOrder<'_, N> {}

/// Visits the left subtree, then the right subtree, then the node.
pub struct PostOrder<'a, N> {
    /// Each node is pushed once unexpanded and, once its children are on the
    /// stack above it, once more as expanded.
    stack: Vec<(&'a N, bool)>,
}

impl<'a, N: BinaryNode> PostOrder<'a, N> {
    pub(crate) fn new(root: Option<&'a N>) -> Self {
        Self {
            stack: root.map(|n| (n, false)).into_iter().collect(),
        }
    }
}

impl<'a, N: BinaryNode> Iterator for PostOrder<'a, N> {
    type Item = &'a N::Key;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, expanded)) = self.stack.pop() {
            if expanded {
                return Some(node.key());
            }
            self.stack.push((node, true));
            self.stack.extend(node.right().map(|n| (n, false)));
            self.stack.extend(node.left().map(|n| (n, false)));
        }
        None
    }
}

impl<N: BinaryNode> FusedIterator for PostOrder<'_, N> {}

/// Visits nodes breadth first, one depth at a time, left to right.
pub struct LevelOrder<'a, N> {
    queue: VecDeque<&'a N>,
}

impl<'a, N: BinaryNode> LevelOrder<'a, N> {
    pub(crate) fn new(root: Option<&'a N>) -> Self {
        Self {
            queue: root.into_iter().collect(),
        }
    }
}

impl<'a, N: BinaryNode> Iterator for LevelOrder<'a, N> {
    type Item = &'a N::Key;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.queue.pop_front()?;
        self.queue.extend(node.left());
        self.queue.extend(node.right());
        Some(node.key())
    }
}

impl<N: BinaryNode> FusedIterator for LevelOrder<'_, N> {}
