use std::cell::Cell;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};

use kuro_tree::RBTreeMultiset;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

/// A small value range, so runs of equal values are common.
fn value_strategy() -> impl Strategy<Value = i32> {
    -50i32..50i32
}

fn contents(set: &RBTreeMultiset<i32>) -> Vec<i32> {
    set.iter().copied().collect()
}

/// Orders by `key` only; `tag` tells equal keys apart.
#[derive(Debug, Clone, Copy)]
struct Tagged {
    key: i32,
    tag: usize,
}

impl PartialEq for Tagged {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Tagged {}

impl PartialOrd for Tagged {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tagged {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

// ─── Core operations ─────────────────────────────────────────────────────────

#[test]
fn erase_one_of_a_run() {
    let mut set = RBTreeMultiset::from([1, 2, 2, 3, 4]);
    let position = set.find(&2).position();
    assert_eq!(set.erase(position), Some(2));
    assert_eq!(set.len(), 4);
    assert_eq!(set.count(&2), 1);
    assert_eq!(contents(&set), [1, 2, 3, 4]);
}

#[test]
fn insert_always_succeeds() {
    let mut set = RBTreeMultiset::new();
    for _ in 0..5 {
        let (cursor, inserted) = set.insert(7);
        assert!(inserted);
        assert_eq!(cursor.get(), Some(&7));
    }
    assert_eq!(set.count(&7), 5);
    assert_eq!(set.len(), 5);
}

#[test]
fn equal_elements_keep_insertion_order() {
    let mut set = RBTreeMultiset::new();
    for (tag, key) in [2, 1, 2, 3, 2, 1].into_iter().enumerate() {
        set.insert(Tagged { key, tag });
    }
    let tags: Vec<usize> = set.iter().map(|t| t.tag).collect();
    assert_eq!(tags, [1, 5, 0, 2, 4, 3]);

    // The cursor returned by insert points at the new element, the last of its run.
    let (cursor, _) = set.insert(Tagged { key: 2, tag: 9 });
    assert_eq!(cursor.get().map(|t| t.tag), Some(9));
    assert_eq!(cursor.peek_next().map(|t| t.key), Some(3));
}

#[test]
fn large_with_duplicates() {
    let mut set = RBTreeMultiset::new();
    for i in 0..1000 {
        set.insert(i);
        set.insert(i);
    }
    assert_eq!(set.len(), 2000);
    assert_eq!(set.count(&500), 2);
    assert!(set.iter().copied().eq((0..1000).flat_map(|i| [i, i])));
}

#[rstest]
#[case::middle_run(2, 1, 3)]
#[case::single(3, 3, 1)]
#[case::absent_between(5, 7, 0)]
#[case::absent_below(0, 1, 0)]
fn bounds_and_count(#[case] key: i32, #[case] lower: i32, #[case] count: usize) {
    let set = RBTreeMultiset::from([1, 2, 2, 2, 3, 4, 7]);
    assert_eq!(set.lower_bound(&key).get(), Some(&lower));
    assert_eq!(set.count(&key), count);

    let (lo, hi) = set.equal_range(&key);
    assert_eq!(lo, set.lower_bound(&key));
    assert_eq!(hi, set.upper_bound(&key));
    assert_eq!(lo == hi, count == 0);
}

#[test]
fn bounds_past_the_end() {
    let set = RBTreeMultiset::from([1, 2, 2, 3, 4]);
    assert_eq!(set.upper_bound(&2).get(), Some(&3));
    assert!(set.lower_bound(&5).is_end());
    assert!(set.upper_bound(&4).is_end());

    let (lo, hi) = set.equal_range(&9);
    assert!(lo.is_end() && hi.is_end());
}

#[test]
fn remove_and_remove_all() {
    let mut set = RBTreeMultiset::from([1, 2, 2, 2, 3]);
    assert!(set.remove(&2));
    assert_eq!(set.count(&2), 2);
    assert_eq!(set.remove_all(&2), 2);
    assert!(!set.remove(&2));
    assert_eq!(contents(&set), [1, 3]);
}

#[test]
fn insert_many_with_duplicates() {
    let mut set = RBTreeMultiset::from([2]);
    let results = set.insert_many([1, 2, 2, 3]);
    assert!(results.iter().all(|&(_, inserted)| inserted));
    let keys: Vec<i32> = results.iter().filter_map(|(c, _)| c.get().copied()).collect();
    assert_eq!(keys, [1, 2, 2, 3]);
    assert_eq!(set.len(), 5);
    assert_eq!(set.count(&2), 3);
}

// ─── Merge ───────────────────────────────────────────────────────────────────

#[rstest]
#[case::overlapping(&[1, 2, 3], &[3, 4, 4], &[1, 2, 3, 3, 4, 4])]
#[case::into_empty(&[], &[4, 5, 6], &[4, 5, 6])]
#[case::from_empty(&[1, 1], &[], &[1, 1])]
fn merge_moves_everything(#[case] left: &[i32], #[case] right: &[i32], #[case] merged: &[i32]) {
    let mut a: RBTreeMultiset<i32> = left.iter().copied().collect();
    let mut b: RBTreeMultiset<i32> = right.iter().copied().collect();
    a.merge(&mut b);
    assert_eq!(contents(&a), merged);
    assert!(b.is_empty());
}

#[test]
fn merged_elements_follow_existing_equals() {
    let mut a = RBTreeMultiset::from([Tagged { key: 1, tag: 0 }, Tagged { key: 1, tag: 1 }]);
    let mut b = RBTreeMultiset::from([Tagged { key: 1, tag: 2 }, Tagged { key: 1, tag: 3 }]);
    a.merge(&mut b);
    let tags: Vec<usize> = a.iter().map(|t| t.tag).collect();
    assert_eq!(tags, [0, 1, 2, 3]);
}

thread_local! {
    static COMPARISONS_LEFT: Cell<usize> = const { Cell::new(usize::MAX) };
}

/// Orders like `i32`, but panics once this thread's comparison budget is spent.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Brittle(i32);

impl PartialOrd for Brittle {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Brittle {
    fn cmp(&self, other: &Self) -> Ordering {
        COMPARISONS_LEFT.with(|left| {
            let budget = left.get();
            assert!(budget > 0, "comparison budget spent");
            left.set(budget - 1);
        });
        self.0.cmp(&other.0)
    }
}

#[test]
fn merge_interrupted_by_ord_panic_keeps_every_element() {
    let mut a: RBTreeMultiset<Brittle> = [1, 2, 3].into_iter().map(Brittle).collect();
    let mut b: RBTreeMultiset<Brittle> = [10, 11, 12, 13].into_iter().map(Brittle).collect();
    let last = b.find(&Brittle(13)).position();

    COMPARISONS_LEFT.with(|left| left.set(3));
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| a.merge(&mut b)));
    COMPARISONS_LEFT.with(|left| left.set(usize::MAX));

    assert!(outcome.is_err());
    assert_eq!(a.len() + b.len(), 7);
    let mut all: Vec<i32> = a.iter().chain(b.iter()).map(|k| k.0).collect();
    all.sort_unstable();
    assert_eq!(all, [1, 2, 3, 10, 11, 12, 13]);
    assert_eq!(b.cursor_at(last).and_then(|c| c.get()), Some(&Brittle(13)));

    // Both sides are still usable and the merge can be finished.
    a.merge(&mut b);
    assert!(b.is_empty());
    assert_eq!(a.iter().map(|k| k.0).collect::<Vec<_>>(), [1, 2, 3, 10, 11, 12, 13]);
}

// ─── Traits ──────────────────────────────────────────────────────────────────

#[test]
fn equality_counts_multiplicity() {
    let a = RBTreeMultiset::from([1, 1, 2]);
    let b = RBTreeMultiset::from([2, 1, 1]);
    let c = RBTreeMultiset::from([1, 2]);
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert!(a < c);
    assert_eq!(format!("{a:?}"), "{1, 1, 2}");
}

#[test]
fn into_iter_and_capacity() {
    let mut set = RBTreeMultiset::with_capacity(4);
    set.extend([3, 1, 3]);
    assert!(set.capacity() >= 4);
    assert!(set.max_size() > 0);
    assert_eq!(set.into_iter().rev().collect::<Vec<_>>(), [3, 3, 1]);
}

// ─── Randomized comparison against a counting BTreeMap ───────────────────────

#[derive(Debug, Clone)]
enum MultisetOp {
    Insert(i32),
    Remove(i32),
    RemoveAll(i32),
    EraseFound(i32),
    Count(i32),
    PopFirst,
    PopLast,
}

fn multiset_op_strategy() -> impl Strategy<Value = MultisetOp> {
    prop_oneof![
        6 => value_strategy().prop_map(MultisetOp::Insert),
        2 => value_strategy().prop_map(MultisetOp::Remove),
        1 => value_strategy().prop_map(MultisetOp::RemoveAll),
        2 => value_strategy().prop_map(MultisetOp::EraseFound),
        2 => value_strategy().prop_map(MultisetOp::Count),
        1 => Just(MultisetOp::PopFirst),
        1 => Just(MultisetOp::PopLast),
    ]
}

fn take_one(model: &mut BTreeMap<i32, usize>, key: i32) -> bool {
    match model.get_mut(&key) {
        Some(n) if *n > 1 => {
            *n -= 1;
            true
        }
        Some(_) => model.remove(&key).is_some(),
        None => false,
    }
}

fn expand(model: &BTreeMap<i32, usize>) -> Vec<i32> {
    model.iter().flat_map(|(&k, &n)| std::iter::repeat_n(k, n)).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays random operations on RBTreeMultiset and a key-to-count BTreeMap.
    #[test]
    fn multiset_ops_match_counting_map(ops in proptest::collection::vec(multiset_op_strategy(), TEST_SIZE)) {
        let mut set: RBTreeMultiset<i32> = RBTreeMultiset::new();
        let mut model: BTreeMap<i32, usize> = BTreeMap::new();
        let mut len = 0usize;

        for op in &ops {
            match *op {
                MultisetOp::Insert(v) => {
                    prop_assert!(set.insert(v).1);
                    *model.entry(v).or_default() += 1;
                    len += 1;
                }
                MultisetOp::Remove(v) => {
                    let expected = take_one(&mut model, v);
                    prop_assert_eq!(set.remove(&v), expected, "remove({})", v);
                    len -= usize::from(expected);
                }
                MultisetOp::RemoveAll(v) => {
                    let expected = model.remove(&v).unwrap_or(0);
                    prop_assert_eq!(set.remove_all(&v), expected, "remove_all({})", v);
                    len -= expected;
                }
                MultisetOp::EraseFound(v) => {
                    let expected = take_one(&mut model, v).then_some(v);
                    let position = set.find(&v).position();
                    prop_assert_eq!(set.erase(position), expected, "erase(find({}))", v);
                    len -= usize::from(expected.is_some());
                }
                MultisetOp::Count(v) => {
                    let expected = model.get(&v).copied().unwrap_or(0);
                    prop_assert_eq!(set.count(&v), expected, "count({})", v);
                    prop_assert_eq!(set.contains(&v), expected > 0);
                }
                MultisetOp::PopFirst => {
                    let expected = model.keys().next().copied();
                    if let Some(k) = expected {
                        take_one(&mut model, k);
                        len -= 1;
                    }
                    prop_assert_eq!(set.pop_first(), expected);
                }
                MultisetOp::PopLast => {
                    let expected = model.keys().next_back().copied();
                    if let Some(k) = expected {
                        take_one(&mut model, k);
                        len -= 1;
                    }
                    prop_assert_eq!(set.pop_last(), expected);
                }
            }
            prop_assert_eq!(set.len(), len, "len mismatch after {:?}", op);
        }

        prop_assert_eq!(contents(&set), expand(&model));
    }

    /// The distance between the ends of `equal_range` is the count, and the run holds only equal values.
    #[test]
    fn equal_range_brackets_the_run(values in proptest::collection::vec(value_strategy(), 0..400), key in value_strategy()) {
        let set: RBTreeMultiset<i32> = values.iter().copied().collect();
        let (mut lo, hi) = set.equal_range(&key);
        let mut run = 0;
        while lo != hi {
            prop_assert_eq!(lo.get(), Some(&key));
            lo.move_next();
            run += 1;
        }
        prop_assert_eq!(run, values.iter().filter(|&&v| v == key).count());
        prop_assert_eq!(run, set.count(&key));
    }

    /// Range iteration agrees with filtering the sorted values.
    #[test]
    fn range_matches_filter(values in proptest::collection::vec(value_strategy(), 0..400), a in value_strategy(), b in value_strategy()) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let set: RBTreeMultiset<i32> = values.iter().copied().collect();
        let mut sorted = values.clone();
        sorted.sort_unstable();

        let expected: Vec<i32> = sorted.iter().copied().filter(|v| (lo..=hi).contains(v)).collect();
        prop_assert_eq!(set.range(lo..=hi).copied().collect::<Vec<_>>(), expected.clone());
        prop_assert!(set.range(lo..=hi).rev().copied().eq(expected.into_iter().rev()));
    }
}
