use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use search_trees::{avl, bst, btree};

enum TreeEnum<K> {
    Bst(bst::Tree<K>),
    Avl(avl::Tree<K>),
    BTree(btree::Tree<K>),
}

impl<K: Ord> TreeEnum<K> {
    fn search(&self, k: &K) -> bool {
        match self {
            Self::Bst(t) => t.search(k),
            Self::Avl(t) => t.search(k),
            Self::BTree(t) => t.contains(k),
        }
    }

    fn insert(&mut self, k: K) {
        match self {
            Self::Bst(t) => {
                t.insert(k);
            }
            Self::Avl(t) => {
                t.insert(k);
            }
            Self::BTree(t) => {
                t.insert(k);
            }
        }
    }

    fn delete(&mut self, k: &K) {
        match self {
            Self::Bst(t) => {
                t.delete(k);
            }
            Self::Avl(t) => {
                t.delete(k);
            }
            Self::BTree(t) => {
                t.delete(k);
            }
        }
    }
}

/// Inserts `xs` so that, without any self-balancing, the resultant tree is
/// still balanced: the middle key first, then each half recursively.
fn insert_balanced(tree: &mut TreeEnum<i32>, xs: &[i32]) {
    if !xs.is_empty() {
        let mid = xs.len() / 2;
        tree.insert(xs[mid]);
        insert_balanced(tree, &xs[..mid]);
        insert_balanced(tree, &xs[mid + 1..]);
    }
}

type Builder = Box<dyn Fn() -> TreeEnum<i32>>;

/// Builds each kind of tree holding `0..num_nodes`. The BST gets the keys in
/// balanced order so it isn't a linked list; the others get them sorted.
fn build_trees(num_nodes: usize) -> Vec<(&'static str, Builder)> {
    let xs: Vec<i32> = (0..num_nodes as i32).collect();

    let bst_keys = xs.clone();
    let bst: Builder = Box::new(move || {
        let mut tree = TreeEnum::Bst(bst::Tree::new());
        insert_balanced(&mut tree, &bst_keys);
        tree
    });

    let avl_keys = xs.clone();
    let avl: Builder = Box::new(move || TreeEnum::Avl(avl_keys.iter().copied().collect()));

    let btree_keys = xs;
    let btree: Builder = Box::new(move || {
        let mut tree = btree::Tree::default();
        tree.extend(btree_keys.iter().copied());
        TreeEnum::BTree(tree)
    });

    vec![("bst", bst), ("avl", avl), ("btree", btree)]
}

/// Helper to bench a function on a search tree.
/// It creates a group for the given name and closure and runs tests for various sizes and
/// implementations of search trees before finishing the group.
fn bench_helper(c: &mut Criterion, name: &str, f: impl Fn(&mut TreeEnum<i32>, i32)) {
    let mut group = c.benchmark_group(name);

    for num_levels in [3, 7, 11, 15] {
        let num_nodes = 2usize.pow(num_levels as u32) - 1;
        let largest_element_in_tree = num_nodes - 1;

        for (name, build) in build_trees(num_nodes) {
            let id = BenchmarkId::new(name, largest_element_in_tree);

            group.bench_function(id, |b| {
                b.iter_custom(|iters| {
                    let mut time = std::time::Duration::ZERO;
                    for _ in 0..iters {
                        let mut tree = black_box(build());
                        let instant = std::time::Instant::now();
                        f(&mut tree, black_box(largest_element_in_tree as i32));
                        let elapsed = instant.elapsed();
                        time += elapsed;
                    }
                    time
                })
            });
        }
    }

    group.finish();
}

pub fn criterion_benchmark(c: &mut Criterion) {
    bench_helper(c, "search", |tree, i| {
        let _found = black_box(tree.search(&i));
    });
    bench_helper(c, "delete", |tree, i| {
        tree.delete(&i);
    });

    bench_helper(c, "insert", |tree, i| {
        tree.insert(i + 1);
    });

    bench_helper(c, "search-miss", |tree, i| {
        let _found = black_box(tree.search(&(i + 1)));
    });
    bench_helper(c, "delete-miss", |tree, i| {
        tree.delete(&(i + 1));
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
