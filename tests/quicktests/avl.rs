use search_trees::avl::Tree;

use std::collections::{BTreeSet, HashSet};

use crate::{init_logging, Op};

/// Applies a set of operations to a tree and a `BTreeSet`, checking that both
/// report the same outcome and that the AVL invariant holds after every one.
fn do_ops<K>(ops: &[Op<K>], avl: &mut Tree<K>, set: &mut BTreeSet<K>) -> bool
where
    K: Ord + Clone,
{
    ops.iter().all(|op| {
        let agreed = match op {
            Op::Insert(k) => avl.insert(k.clone()) == set.insert(k.clone()),
            Op::Remove(k) => avl.delete(k) == set.remove(k),
            Op::Iter => avl.iter().eq(set.iter()),
        };
        agreed && avl.is_balanced()
    })
}

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
    init_logging();
    let mut tree = Tree::new();
    let mut set = BTreeSet::new();

    do_ops(&ops, &mut tree, &mut set) && tree.iter().eq(set.iter()) && tree.len() == set.len()
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

    let deleted: HashSet<_> = deletes.iter().collect();
    deletes.iter().all(|x| !tree.search(x))
        && xs
            .iter()
            .filter(|x| !deleted.contains(x))
            .all(|x| tree.search(x))
        && tree.is_balanced()
}

#[quickcheck]
fn in_order_matches_sorted_input(xs: Vec<i16>) -> bool {
    let tree: Tree<_> = xs.iter().copied().collect();
    let mut expected = xs;
    expected.sort_unstable();
    expected.dedup();

    tree.in_order().copied().eq(expected)
}
