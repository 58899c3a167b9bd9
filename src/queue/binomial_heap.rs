//! A mergeable min-priority queue, represented as a forest of heap-ordered
//! binomial trees with at most one tree per rank.  The forest mirrors the
//! binary representation of the element count, which bounds every operation
//! at `O(log n)`.
//!
//! The heap has value semantics: every operation consumes the heap and
//! returns its successor, and no operation mutates shared structure.  This
//! is what lets the simulation driver fold a batch of freshly scheduled
//! events into the live queue each dispatch cycle with a single meld, while
//! callers that want a snapshot simply clone first.

use crate::utils::errors::SimulationError;

/// A heap-ordered binomial tree.  A rank-`r` tree has exactly `2^r` nodes
/// and `r` children, stored in ascending rank order (`0..r`).  Ascending
/// child order means a removed root's children already form a valid forest,
/// so `delete_min` needs no reversal pass.
#[derive(Debug, Clone)]
struct BinomialTree<T> {
    value: T,
    rank: u32,
    children: Vec<BinomialTree<T>>,
}

impl<T: Ord> BinomialTree<T> {
    fn singleton(value: T) -> Self {
        Self {
            value,
            rank: 0,
            children: Vec::new(),
        }
    }

    /// Link two trees of equal rank into one tree of the next rank up.  The
    /// tree with the smaller root becomes the parent; on equal roots the
    /// left operand wins, keeping links deterministic.
    fn link(left: Self, right: Self) -> Self {
        debug_assert_eq!(left.rank, right.rank);
        let (mut parent, child) = if left.value <= right.value {
            (left, right)
        } else {
            (right, left)
        };
        parent.children.push(child);
        parent.rank += 1;
        parent
    }

    fn node_count(&self) -> usize {
        1usize << self.rank
    }
}

/// An immutable min-priority queue over a totally-ordered element type.
///
/// Invariants: trees are stored in strictly ascending rank order, at most
/// one per rank, and every tree satisfies heap order.  The element count is
/// cached, so `len` is `O(1)`.
#[derive(Debug, Clone)]
pub struct BinomialHeap<T> {
    trees: Vec<BinomialTree<T>>,
    len: usize,
}

impl<T: Ord> BinomialHeap<T> {
    /// An empty heap.
    pub fn new() -> Self {
        Self {
            trees: Vec::new(),
            len: 0,
        }
    }

    /// A heap containing exactly one element.
    pub fn singleton(value: T) -> Self {
        Self {
            trees: vec![BinomialTree::singleton(value)],
            len: 1,
        }
    }

    /// The number of elements in the heap.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Return a heap containing `value` plus all of this heap's elements.
    pub fn insert(self, value: T) -> Self {
        self.meld(Self::singleton(value))
    }

    /// The globally-smallest element, found by scanning the tree roots.
    /// `None` iff the heap is empty.  On duplicate minima the first minimal
    /// root wins, matching `delete_min`.
    pub fn find_min(&self) -> Option<&T> {
        self.trees
            .iter()
            .map(|tree| &tree.value)
            .min_by(|left, right| left.cmp(right))
    }

    /// Remove and return the globally-smallest element along with the
    /// successor heap.  The minimal root's tree is removed from the forest
    /// and its children, themselves a valid forest, are melded back into
    /// the remainder.
    pub fn delete_min(self) -> Result<(T, Self), SimulationError> {
        let Self { mut trees, len } = self;
        let index = trees
            .iter()
            .enumerate()
            .min_by(|(_, left), (_, right)| left.value.cmp(&right.value))
            .map(|(index, _)| index)
            .ok_or(SimulationError::EmptyHeap)?;
        let tree = trees.remove(index);
        let node_count = tree.node_count();
        let remainder = Self {
            trees,
            len: len - node_count,
        };
        let BinomialTree { value, children, .. } = tree;
        let child_forest = Self {
            trees: children,
            len: node_count - 1,
        };
        Ok((value, remainder.meld(child_forest)))
    }

    /// Merge two heaps into one.  The forests are combined rank-by-rank,
    /// exactly like binary addition: trees of equal rank are linked into a
    /// carry, which may itself collide with the next rank up.
    pub fn meld(self, other: Self) -> Self {
        let len = self.len + other.len;
        let trees = meld_forests(self.trees, other.trees);
        debug_assert!(trees.windows(2).all(|pair| pair[0].rank < pair[1].rank));
        Self { trees, len }
    }

    /// Drain the heap through repeated `delete_min`, yielding its elements
    /// in ascending order.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.len);
        while let Ok((value, remainder)) = self.delete_min() {
            sorted.push(value);
            self = remainder;
        }
        sorted
    }
}

impl<T: Ord> Default for BinomialHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> std::iter::FromIterator<T> for BinomialHeap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), BinomialHeap::insert)
    }
}

/// Merge two forests in ascending rank order, linking equal-rank collisions
/// into a carry tree.  The carry's rank never exceeds the rank of either
/// remaining front, so emitted ranks are strictly ascending.
fn meld_forests<T: Ord>(
    lhs: Vec<BinomialTree<T>>,
    rhs: Vec<BinomialTree<T>>,
) -> Vec<BinomialTree<T>> {
    if lhs.is_empty() {
        return rhs;
    }
    if rhs.is_empty() {
        return lhs;
    }
    let mut forest = Vec::with_capacity(lhs.len().max(rhs.len()) + 1);
    let mut lhs = lhs.into_iter().peekable();
    let mut rhs = rhs.into_iter().peekable();
    let mut carry: Option<BinomialTree<T>> = None;
    loop {
        let lhs_rank = lhs.peek().map(|tree| tree.rank);
        let rhs_rank = rhs.peek().map(|tree| tree.rank);
        match (carry.take(), lhs_rank, rhs_rank) {
            (None, None, None) => break,
            (Some(tree), lhs_rank, rhs_rank) => {
                let lhs_collides = lhs_rank == Some(tree.rank);
                let rhs_collides = rhs_rank == Some(tree.rank);
                if lhs_collides && rhs_collides {
                    // Three trees of one rank: one stays at this rank, the
                    // other two carry into the next
                    forest.push(tree);
                    carry = Some(BinomialTree::link(lhs.next().unwrap(), rhs.next().unwrap()));
                } else if lhs_collides {
                    carry = Some(BinomialTree::link(tree, lhs.next().unwrap()));
                } else if rhs_collides {
                    carry = Some(BinomialTree::link(tree, rhs.next().unwrap()));
                } else {
                    forest.push(tree);
                }
            }
            (None, Some(lhs_rank), Some(rhs_rank)) => {
                if lhs_rank == rhs_rank {
                    carry = Some(BinomialTree::link(lhs.next().unwrap(), rhs.next().unwrap()));
                } else if lhs_rank < rhs_rank {
                    forest.push(lhs.next().unwrap());
                } else {
                    forest.push(rhs.next().unwrap());
                }
            }
            (None, Some(_), None) => forest.push(lhs.next().unwrap()),
            (None, None, Some(_)) => forest.push(rhs.next().unwrap()),
        }
    }
    forest
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64;

    use super::*;

    #[test]
    fn empty_heap_basics() {
        let heap: BinomialHeap<u32> = BinomialHeap::new();
        assert!(heap.is_empty());
        assert_eq!(heap.len(), 0);
        assert_eq!(heap.find_min(), None);
        assert!(matches!(
            heap.delete_min(),
            Err(SimulationError::EmptyHeap)
        ));
    }

    #[test]
    fn singleton_heap_basics() {
        let heap = BinomialHeap::singleton(7u32);
        assert_eq!(heap.len(), 1);
        assert_eq!(heap.find_min(), Some(&7));
    }

    #[test]
    fn insert_tracks_size_and_minimum() {
        let mut rng = Pcg64::seed_from_u64(987654321);
        let mut heap = BinomialHeap::new();
        let mut minimum = u32::MAX;
        for count in 1..=500u32 {
            let value = rng.gen_range(0..10_000u32);
            minimum = minimum.min(value);
            heap = heap.insert(value);
            assert_eq!(heap.len(), count as usize);
            assert_eq!(heap.find_min(), Some(&minimum));
        }
    }

    #[test]
    fn drains_in_sorted_order() {
        let mut rng = Pcg64::seed_from_u64(24601);
        let values: Vec<u32> = (0..700).map(|_| rng.gen_range(0..5_000)).collect();
        let heap: BinomialHeap<u32> = values.iter().copied().collect();
        let mut expected = values;
        expected.sort_unstable();
        assert_eq!(heap.into_sorted_vec(), expected);
    }

    #[test]
    fn interleaved_inserts_and_deletes_preserve_heap_order() {
        let mut rng = Pcg64::seed_from_u64(31337);
        let mut heap = BinomialHeap::new();
        let mut shadow: Vec<u32> = Vec::new();
        for _ in 0..2_000 {
            if shadow.is_empty() || rng.gen_bool(0.6) {
                let value = rng.gen_range(0..1_000u32);
                heap = heap.insert(value);
                shadow.push(value);
            } else {
                let (value, remainder) = heap.delete_min().unwrap();
                heap = remainder;
                let minimum = *shadow.iter().min().unwrap();
                assert_eq!(value, minimum);
                let position = shadow.iter().position(|&entry| entry == minimum).unwrap();
                shadow.swap_remove(position);
            }
            assert_eq!(heap.len(), shadow.len());
        }
    }

    #[test]
    fn meld_drains_as_the_sorted_merge() {
        let mut rng = Pcg64::seed_from_u64(8675309);
        for _ in 0..20 {
            let left: Vec<u32> = (0..rng.gen_range(0..100))
                .map(|_| rng.gen_range(0..1_000))
                .collect();
            let right: Vec<u32> = (0..rng.gen_range(0..100))
                .map(|_| rng.gen_range(0..1_000))
                .collect();
            let left_heap: BinomialHeap<u32> = left.iter().copied().collect();
            let right_heap: BinomialHeap<u32> = right.iter().copied().collect();
            let melded = left_heap.meld(right_heap);
            assert_eq!(melded.len(), left.len() + right.len());
            let mut expected = [left, right].concat();
            expected.sort_unstable();
            assert_eq!(melded.into_sorted_vec(), expected);
        }
    }

    #[test]
    fn cloned_snapshot_is_unaffected_by_later_operations() {
        let heap: BinomialHeap<u32> = vec![5, 3, 9, 1].into_iter().collect();
        let snapshot = heap.clone();
        let (minimum, _rest) = heap.delete_min().unwrap();
        assert_eq!(minimum, 1);
        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot.find_min(), Some(&1));
    }

    #[test]
    fn duplicate_minima_resolve_consistently() {
        let heap: BinomialHeap<u32> = vec![2, 2, 2, 5].into_iter().collect();
        assert_eq!(heap.find_min(), Some(&2));
        assert_eq!(heap.into_sorted_vec(), vec![2, 2, 2, 5]);
    }
}
