//! Union-find over dense indices, used for orbit bookkeeping.

use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<u32>,
    rank: Vec<u8>,
}

impl UnionFind {
    /// `n` singleton classes.
    ///
    /// # Panics
    ///
    /// Panics if `n` exceeds `u32::MAX`.
    #[must_use]
    pub fn new(n: usize) -> Self {
        let n32 = u32::try_from(n).expect("union-find size exceeds u32");
        Self {
            parent: (0..n32).collect(),
            rank: vec![0; n],
        }
    }

    pub fn find(&mut self, mut x: u32) -> u32 {
        while self.parent[x as usize] != x {
            let grand = self.parent[self.parent[x as usize] as usize];
            self.parent[x as usize] = grand;
            x = grand;
        }
        x
    }

    /// Merge the classes of `a` and `b`. Returns `false` if already merged.
    pub fn union(&mut self, a: u32, b: u32) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        let (hi, lo) = match self.rank[ra as usize].cmp(&self.rank[rb as usize]) {
            std::cmp::Ordering::Less => (rb, ra),
            std::cmp::Ordering::Greater => (ra, rb),
            std::cmp::Ordering::Equal => {
                self.rank[ra as usize] += 1;
                (ra, rb)
            }
        };
        self.parent[lo as usize] = hi;
        true
    }

    pub fn same(&mut self, a: u32, b: u32) -> bool {
        self.find(a) == self.find(b)
    }

    /// All classes with more than one member, each sorted, ordered by their
    /// smallest member.
    pub fn nontrivial_classes(&mut self) -> Vec<Vec<u32>> {
        let n = u32::try_from(self.parent.len()).unwrap_or(u32::MAX);
        let mut by_root: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
        for x in 0..n {
            let r = self.find(x);
            by_root.entry(r).or_default().push(x);
        }
        let mut classes: Vec<Vec<u32>> = by_root.into_values().filter(|c| c.len() > 1).collect();
        classes.sort_unstable_by_key(|c| c[0]);
        classes
    }
}
