/// Disjoint sets over cell indices, used while carving a maze.
///
/// Union relabels every member of the absorbed set, so each cell always points straight at
/// its representative and `find` is a single lookup.
pub struct UnionFind {
    representative: Vec<usize>,
    components: usize,
}

impl UnionFind {
    pub fn new(size: usize) -> Self {
        UnionFind {
            representative: (0..size).collect(),
            components: size,
        }
    }

    pub fn find(&self, x: usize) -> usize {
        let mut root = x;
        while self.representative[root] != root {
            root = self.representative[root];
        }
        root
    }

    pub fn connected(&self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }

    /// Moves every cell of `a`'s set into `b`'s set.
    /// Returns `false` if they were already in the same set.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return false;
        }
        self.representative
            .iter_mut()
            .filter(|rep| **rep == root_a)
            .for_each(|rep| *rep = root_b);
        self.components -= 1;
        true
    }

    /// Number of disjoint sets left.
    pub fn components(&self) -> usize {
        self.components
    }

    pub fn all_connected(&self) -> bool {
        self.components <= 1
    }
}
