use ranged_tree::{Entry, RangedTree, RangedTreeError};

use crate::Op;

/// Applies every op, ignoring the ones the tree rejects.
fn build(ops: &[Op<i8>]) -> RangedTree<i8> {
    let mut tree = RangedTree::new();
    for Op(entry) in ops {
        let _ = tree.insert(*entry);
    }
    tree
}

fn snapshot(tree: &RangedTree<i8>) -> Vec<bool> {
    (i8::MIN..=i8::MAX).map(|x| tree.contains(&x)).collect()
}

/// Turns arbitrary widths into ranges that don't touch each other: each range is followed by a
/// gap of one value.
fn disjoint_ranges(widths: &[u8]) -> Vec<(i32, i32)> {
    let mut start = 0;
    widths
        .iter()
        .map(|width| {
            let end = start + i32::from(width % 8);
            let range = (start, end);
            start = end + 2;
            range
        })
        .collect()
}

quickcheck::quickcheck! {
    fn points_stay_contained(xs: Vec<i8>, ops: Vec<Op<i8>>) -> bool {
        let mut tree = RangedTree::new();
        for x in &xs {
            tree.insert_point(*x).unwrap();
        }
        // Later inserts may fail but never hide an existing point.
        for Op(entry) in &ops {
            let _ = tree.insert(*entry);
        }

        xs.iter().all(|x| tree.contains(x))
    }
}

quickcheck::quickcheck! {
    fn disjoint_ranges_cover_exactly_their_values(widths: Vec<u8>) -> bool {
        let ranges = disjoint_ranges(&widths);
        // Insert in a scrambled order so the tree has to rotate.
        let mut shuffled = ranges.clone();
        shuffled.sort_by_key(|(start, _)| (start * 7919) % 1009);

        let tree = RangedTree::from_entries(
            shuffled.iter().map(|&(start, end)| Entry::range(start, end)),
        )
        .unwrap();

        let inside = ranges
            .iter()
            .all(|&(start, end)| (start..=end).all(|x| tree.contains(&x)));
        let gaps = ranges.iter().all(|&(_, end)| !tree.contains(&(end + 1)));
        inside && gaps && !tree.contains(&-1)
    }
}

quickcheck::quickcheck! {
    fn invalid_range_changes_nothing(ops: Vec<Op<i8>>, a: i8, b: i8) -> bool {
        let (start, end) = if a > b { (a, b) } else if a < b { (b, a) } else { return true };
        let mut tree = build(&ops);
        let before = snapshot(&tree);

        let result = tree.insert_range(start, end);

        result == Err(RangedTreeError::InvalidRange { start, end }) && snapshot(&tree) == before
    }
}

quickcheck::quickcheck! {
    fn mutating_a_clone_leaves_the_original_alone(ops: Vec<Op<i8>>, more: Vec<Op<i8>>) -> bool {
        let tree = build(&ops);
        let before = snapshot(&tree);

        let mut copy = tree.clone();
        for Op(entry) in &more {
            let _ = copy.insert(*entry);
        }

        snapshot(&tree) == before
    }
}

quickcheck::quickcheck! {
    fn take_moves_everything(ops: Vec<Op<i8>>) -> bool {
        let mut source = build(&ops);
        let before = snapshot(&source);

        let target = source.take();

        snapshot(&target) == before && snapshot(&source).iter().all(|hit| !hit)
    }
}

quickcheck::quickcheck! {
    fn keys_come_out_sorted(ops: Vec<Op<i8>>) -> bool {
        let tree = build(&ops);
        let keys: Vec<_> = tree.iter().map(|(key, _)| *key).collect();

        keys.len() == tree.len() && keys.windows(2).all(|w| w[0] < w[1])
    }
}

quickcheck::quickcheck! {
    fn height_is_logarithmic(xs: Vec<i8>) -> bool {
        let mut tree = RangedTree::new();
        for x in &xs {
            tree.insert_point(*x).unwrap();
        }

        // An AVL tree with N nodes is at most ~1.44 * lg(N + 2) tall.
        let bound = 1.45 * ((tree.len() + 2) as f64).log2();
        tree.height() as f64 <= bound
    }
}

#[test]
fn character_class() {
    // [a-z0-9_]
    let class = RangedTree::from_entries([
        Entry::range('a', 'z'),
        Entry::range('0', '9'),
        Entry::point('_'),
    ])
    .unwrap();

    for c in "abcxyz0189_".chars() {
        assert!(class[c], "{c}");
    }
    for c in "ABZ-/:`{ ".chars() {
        assert!(!class[c], "{c}");
    }
}
