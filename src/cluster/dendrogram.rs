//! Merge history of agglomerative clustering.

use super::assignment::ClusterAssignment;

/// A dendrogram representing hierarchical cluster merges.
///
/// Ids follow the SciPy convention: leaves are `0..n`, and merge `i`
/// creates cluster `n + i`.
#[derive(Debug, Clone)]
pub struct Dendrogram {
    merges: Vec<Merge>,
    n_items: usize,
}

/// A single merge operation in the dendrogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Merge {
    /// First cluster being merged (id).
    pub cluster_a: usize,
    /// Second cluster being merged (id).
    pub cluster_b: usize,
    /// Average-linkage distance at which the merge occurred.
    pub distance: f64,
    /// Size of resulting cluster.
    pub size: usize,
}

impl Dendrogram {
    /// Create an empty dendrogram over `n_items` leaves.
    pub fn new(n_items: usize) -> Self {
        Self {
            merges: Vec::with_capacity(n_items.saturating_sub(1)),
            n_items,
        }
    }

    /// Record a merge operation.
    pub fn add_merge(&mut self, cluster_a: usize, cluster_b: usize, distance: f64, size: usize) {
        self.merges.push(Merge {
            cluster_a,
            cluster_b,
            distance,
            size,
        });
    }

    /// Cluster assignments at a distance threshold.
    ///
    /// Merges are applied in order while their distance is `<= threshold`;
    /// the first merge above it and everything after are cut.
    pub fn cut_at_distance(&self, threshold: f64) -> ClusterAssignment {
        let n = self.n_items;
        let mut parent: Vec<usize> = (0..n + self.merges.len()).collect();

        for (i, merge) in self.merges.iter().enumerate() {
            if merge.distance > threshold {
                break;
            }
            parent[merge.cluster_a] = n + i;
            parent[merge.cluster_b] = n + i;
        }

        let roots = (0..n).map(|item| find_root(&mut parent, item)).collect();
        ClusterAssignment::from_labels(roots)
    }

    /// Number of original items.
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Number of merges recorded.
    pub fn n_merges(&self) -> usize {
        self.merges.len()
    }

    /// Iterate over merges.
    pub fn merges(&self) -> impl Iterator<Item = &Merge> {
        self.merges.iter()
    }

    /// Merge distances, in merge order.
    pub fn distances(&self) -> Vec<f64> {
        self.merges.iter().map(|m| m.distance).collect()
    }
}

fn find_root(parent: &mut [usize], mut id: usize) -> usize {
    let mut root = id;
    while parent[root] != root {
        root = parent[root];
    }
    // Path compression.
    while parent[id] != root {
        let next = parent[id];
        parent[id] = root;
        id = next;
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dendrogram_creation() {
        let dendro = Dendrogram::new(5);
        assert_eq!(dendro.n_items(), 5);
        assert_eq!(dendro.n_merges(), 0);
        assert_eq!(dendro.cut_at_distance(1.0).n_clusters(), 5);
    }

    #[test]
    fn test_cut_heights() {
        // ((0,1) @ 0.2, (2,3) @ 0.4) @ 0.9
        let mut dendro = Dendrogram::new(4);
        dendro.add_merge(0, 1, 0.2, 2);
        dendro.add_merge(2, 3, 0.4, 2);
        dendro.add_merge(4, 5, 0.9, 4);

        assert_eq!(dendro.cut_at_distance(0.1).labels(), &[0, 1, 2, 3]);
        assert_eq!(dendro.cut_at_distance(0.2).labels(), &[0, 0, 1, 2]);
        assert_eq!(dendro.cut_at_distance(0.5).labels(), &[0, 0, 1, 1]);
        assert_eq!(dendro.cut_at_distance(0.9).labels(), &[0, 0, 0, 0]);
        assert_eq!(dendro.distances(), vec![0.2, 0.4, 0.9]);
    }
}
