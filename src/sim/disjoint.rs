//! Disjoint-set forest over a flat index space
//!
//! Used to count connected regions of a tile map. Maps are at most a few
//! thousand cells, so neither path compression nor union-by-rank is needed.

use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct DisjointSet {
    /// `None` marks a root
    parent: Vec<Option<usize>>,
}

impl DisjointSet {
    /// `len` singleton sets
    pub fn new(len: usize) -> Self {
        Self {
            parent: vec![None; len],
        }
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    /// Root of the set containing `i`
    pub fn find(&self, mut i: usize) -> usize {
        while let Some(next) = self.parent[i] {
            i = next;
        }
        i
    }

    /// Merge the sets of `i` and `j`; returns both roots afterwards (equal)
    pub fn union(&mut self, i: usize, j: usize) -> (usize, usize) {
        let x = self.find(i);
        let y = self.find(j);
        if x != y {
            self.parent[x] = Some(y);
        }
        (self.find(i), self.find(j))
    }

    /// Every distinct root
    pub fn roots(&self) -> BTreeSet<usize> {
        (0..self.parent.len()).map(|i| self.find(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_singletons() {
        let set = DisjointSet::new(5);
        assert_eq!(set.roots().len(), 5);
        assert_eq!(set.find(3), 3);
    }

    #[test]
    fn test_union_returns_shared_root() {
        let mut set = DisjointSet::new(4);
        let (a, b) = set.union(0, 1);
        assert_eq!(a, b);
        let (c, d) = set.union(1, 1);
        assert_eq!(c, d);
        assert_eq!(set.roots().len(), 3);
    }

    #[test]
    fn test_empty() {
        let set = DisjointSet::new(0);
        assert!(set.is_empty());
        assert!(set.roots().is_empty());
    }

    proptest! {
        #[test]
        fn chain_union_leaves_one_root(n in 1usize..300) {
            let mut set = DisjointSet::new(n);
            prop_assert_eq!(set.roots().len(), n);
            for i in 1..n {
                set.union(i - 1, i);
            }
            prop_assert_eq!(set.roots().len(), 1);
        }

        #[test]
        fn find_is_idempotent(
            n in 1usize..100,
            pairs in proptest::collection::vec((0usize..100, 0usize..100), 0..200),
        ) {
            let mut set = DisjointSet::new(n);
            for (a, b) in pairs {
                set.union(a % n, b % n);
            }
            for i in 0..n {
                let root = set.find(i);
                prop_assert_eq!(set.find(root), root);
            }
        }

        #[test]
        fn union_makes_members_share_root(
            n in 2usize..100,
            a in 0usize..100,
            b in 0usize..100,
        ) {
            let mut set = DisjointSet::new(n);
            let (ra, rb) = set.union(a % n, b % n);
            prop_assert_eq!(ra, rb);
            prop_assert_eq!(set.find(a % n), set.find(b % n));
        }
    }
}
