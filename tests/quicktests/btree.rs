use search_trees::btree::{Tree, MIN_ORDER};

use std::collections::{BTreeSet, HashSet};

use crate::{init_logging, Op};

/// Picks a small order from an arbitrary byte so every quicktest covers the
/// 2-3-4 tree and a few wider ones.
fn order_from(seed: u8) -> usize {
    usize::from(seed % 4) + MIN_ORDER
}

/// Applies a set of operations to a tree and a `BTreeSet`, checking the B-Tree
/// invariants after every one.
fn do_ops<K>(ops: &[Op<K>], btree: &mut Tree<K>, set: &mut BTreeSet<K>) -> bool
where
    K: Ord + Clone,
{
    for op in ops {
        let agreed = match op {
            Op::Insert(k) => btree.insert(k.clone()) == set.insert(k.clone()),
            Op::Remove(k) => btree.delete(k) == set.remove(k),
            Op::Iter => btree.iter().eq(set.iter()),
        };
        if !agreed || !btree.is_valid() {
            return false;
        }
    }
    true
}

#[quickcheck]
fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>, seed: u8) -> bool {
    init_logging();
    let mut tree = Tree::new(order_from(seed)).unwrap();
    let mut set = BTreeSet::new();

    do_ops(&ops, &mut tree, &mut set) && tree.traverse().eq(set.iter())
}

#[quickcheck]
fn contains(xs: Vec<i8>, seed: u8) -> bool {
    let mut tree = Tree::new(order_from(seed)).unwrap();
    tree.extend(xs.iter().copied());

    xs.iter()
        .all(|x| tree.search(x).map(|found| found.key()) == Some(x))
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>, seed: u8) -> bool {
    let mut tree = Tree::new(order_from(seed)).unwrap();
    tree.extend(xs.iter().copied());
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| tree.search(x).is_none())
}

#[quickcheck]
fn traverse_is_sorted_and_deduplicated(xs: Vec<i16>, seed: u8) -> bool {
    let mut tree = Tree::new(order_from(seed)).unwrap();
    tree.extend(xs.iter().copied());
    let mut expected = xs;
    expected.sort_unstable();
    expected.dedup();

    tree.is_valid() && tree.len() == expected.len() && tree.traverse().copied().eq(expected)
}
