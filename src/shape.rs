//! Whole-tree measurements and structural predicates over any [`BinaryNode`].
//!
//! These are pure functions of the tree's current shape. Each walks the whole
//! tree once (except `min_key`/`max_key`, which walk a single spine).
//!
//! The measurements keep their own stack and work on trees of any depth. The
//! predicates recurse once per level, so on a degenerate tree their stack
//! usage grows with the number of keys.

use crate::traverse::BinaryNode;

/// Every node of the tree, parents before children, without recursing.
fn nodes<'a, N: BinaryNode>(root: Option<&'a N>) -> impl Iterator<Item = &'a N> {
    let mut stack: Vec<&'a N> = root.into_iter().collect();
    std::iter::from_fn(move || {
        let node = stack.pop()?;
        stack.extend(node.right());
        stack.extend(node.left());
        Some(node)
    })
}

/// Number of nodes on the longest root-to-leaf path. An empty tree has height 0.
pub(crate) fn height<N: BinaryNode>(root: Option<&N>) -> usize {
    let mut height = 0;
    let mut stack: Vec<(&N, usize)> = root.map(|n| (n, 1)).into_iter().collect();
    while let Some((node, depth)) = stack.pop() {
        height = height.max(depth);
        stack.extend(node.left().map(|n| (n, depth + 1)));
        stack.extend(node.right().map(|n| (n, depth + 1)));
    }
    height
}

pub(crate) fn count_nodes<N: BinaryNode>(root: Option<&N>) -> usize {
    nodes(root).count()
}

pub(crate) fn count_leaves<N: BinaryNode>(root: Option<&N>) -> usize {
    nodes(root).filter(|n| n.is_leaf()).count()
}

pub(crate) fn min_key<N: BinaryNode>(mut node: &N) -> &N::Key {
    while let Some(left) = node.left() {
        node = left;
    }
    node.key()
}

pub(crate) fn max_key<N: BinaryNode>(mut node: &N) -> &N::Key {
    while let Some(right) = node.right() {
        node = right;
    }
    node.key()
}

/// Every key lies strictly inside the open interval inherited from its
/// ancestors.
pub(crate) fn is_bst<N>(node: Option<&N>) -> bool
where
    N: BinaryNode,
    N::Key: Ord,
{
    within(node, None, None)
}

fn within<'a, N>(node: Option<&'a N>, lower: Option<&'a N::Key>, upper: Option<&'a N::Key>) -> bool
where
    N: BinaryNode,
    N::Key: Ord,
{
    let Some(n) = node else {
        return true;
    };
    let key = n.key();
    if lower.map_or(false, |lower| key <= lower) || upper.map_or(false, |upper| key >= upper) {
        return false;
    }
    within(n.left(), lower, Some(key)) && within(n.right(), Some(key), upper)
}

/// The heights of the two subtrees of every node differ by at most one.
pub(crate) fn is_balanced<N: BinaryNode>(node: Option<&N>) -> bool {
    balanced_height(node).is_some()
}

/// The height of a balanced subtree, or `None` as soon as any node in it is
/// found to be unbalanced.
fn balanced_height<N: BinaryNode>(node: Option<&N>) -> Option<usize> {
    let Some(n) = node else {
        return Some(0);
    };
    let left = balanced_height(n.left())?;
    let right = balanced_height(n.right())?;
    if left.abs_diff(right) > 1 {
        return None;
    }
    Some(left.max(right) + 1)
}

/// Numbering the nodes as an implicit array (root 0, children of `i` at
/// `2i + 1` and `2i + 2`), no node's index reaches the node count.
pub(crate) fn is_complete<N: BinaryNode>(root: Option<&N>) -> bool {
    indexed_below(root, 0, count_nodes(root))
}

fn indexed_below<N: BinaryNode>(node: Option<&N>, index: usize, count: usize) -> bool {
    let Some(n) = node else {
        return true;
    };
    index < count
        && indexed_below(n.left(), 2 * index + 1, count)
        && indexed_below(n.right(), 2 * index + 2, count)
}

/// Every internal node has two children and every leaf sits at the depth of
/// the leftmost leaf.
pub(crate) fn is_perfect<N: BinaryNode>(root: Option<&N>) -> bool {
    let mut depth = 0;
    let mut node = root;
    while let Some(n) = node {
        depth += 1;
        node = n.left();
    }
    perfect_at(root, depth, 1)
}

fn perfect_at<N: BinaryNode>(node: Option<&N>, depth: usize, level: usize) -> bool {
    let Some(n) = node else {
        return true;
    };
    match (n.left(), n.right()) {
        (None, None) => level == depth,
        (Some(left), Some(right)) => {
            perfect_at(Some(left), depth, level + 1) && perfect_at(Some(right), depth, level + 1)
        }
        _ => false,
    }
}

/// Every node has either zero or two children.
pub(crate) fn is_full<N: BinaryNode>(node: Option<&N>) -> bool {
    let Some(n) = node else {
        return true;
    };
    match (n.left(), n.right()) {
        (None, None) => true,
        (Some(left), Some(right)) => is_full(Some(left)) && is_full(Some(right)),
        _ => false,
    }
}
