use search_trees::bst::Tree;

use std::collections::{BTreeSet, HashSet};

use crate::{init_logging, Op};

/// Applies a set of operations to a tree and a `BTreeSet`.
/// This way we can ensure that after a random smattering of inserts
/// and deletes we have the same set of keys in both, and that every
/// insert and delete reported the same outcome as the set's.
fn do_ops<K>(ops: &[Op<K>], bst: &mut Tree<K>, set: &mut BTreeSet<K>) -> bool
where
    K: Ord + Clone,
{
    ops.iter().all(|op| match op {
        Op::Insert(k) => bst.insert(k.clone()) == set.insert(k.clone()),
        Op::Remove(k) => bst.delete(k) == set.remove(k),
        Op::Iter => bst.iter().eq(set.iter()),
    })
}

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
    init_logging();
    let mut tree = Tree::new();
    let mut set = BTreeSet::new();

    do_ops(&ops, &mut tree, &mut set)
        && tree.is_bst()
        && tree.iter().eq(set.iter())
        && tree.len() == set.len()
}

#[quickcheck]
fn contains(xs: Vec<i8>) -> bool {
    let tree: Tree<_> = xs.iter().copied().collect();

    xs.iter().all(|x| tree.search(x))
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let tree: Tree<_> = xs.iter().copied().collect();
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| !tree.search(x))
}

#[quickcheck]
fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut tree: Tree<_> = xs.iter().copied().collect();
    for delete in &deletes {
        tree.delete(delete);
    }

    let mut still_present = xs;
    for delete in &deletes {
        // We may have inserted the same value multiple times - delete each one.
        while let Some(pos) = still_present.iter().position(|x| x == delete) {
            still_present.swap_remove(pos);
        }
    }

    deletes.iter().all(|x| !tree.search(x))
        && still_present.iter().all(|x| tree.search(x))
        && tree.is_bst()
}

#[quickcheck]
fn predicates_are_pure(xs: Vec<i8>) -> bool {
    let tree: Tree<_> = xs.into_iter().collect();
    let shape = |t: &Tree<i8>| {
        (
            t.is_bst(),
            t.is_balanced(),
            t.is_complete(),
            t.is_perfect(),
            t.is_full(),
        )
    };

    shape(&tree) == shape(&tree)
}

#[quickcheck]
fn perfect_implies_full_and_complete(xs: Vec<i8>) -> bool {
    let tree: Tree<_> = xs.into_iter().collect();

    !tree.is_perfect() || (tree.is_full() && tree.is_complete() && tree.is_balanced())
}

#[quickcheck]
fn counts_agree(xs: Vec<i8>) -> bool {
    let tree: Tree<_> = xs.iter().copied().collect();
    let distinct: HashSet<_> = xs.into_iter().collect();

    tree.len() == distinct.len()
        && tree.count_nodes() == distinct.len()
        && tree.count_leaves() <= tree.count_nodes()
        && tree.min_value().ok() == distinct.iter().min()
        && tree.max_value().ok() == distinct.iter().max()
}
