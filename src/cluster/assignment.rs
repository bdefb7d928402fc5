//! Story → cluster partition.

/// A partition of `n` stories into dense, first-appearance-numbered clusters.
///
/// Story 0 is always in cluster 0; the next story not in cluster 0 opens
/// cluster 1, and so on. Ids carry no meaning across runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClusterAssignment {
    labels: Vec<usize>,
    n_clusters: usize,
}

impl ClusterAssignment {
    /// Renumber arbitrary labels by first appearance.
    pub fn from_labels(raw: Vec<usize>) -> Self {
        let mut seen: std::collections::HashMap<usize, usize> = std::collections::HashMap::new();
        let labels: Vec<usize> = raw
            .into_iter()
            .map(|l| {
                let next = seen.len();
                *seen.entry(l).or_insert(next)
            })
            .collect();
        Self {
            n_clusters: seen.len(),
            labels,
        }
    }

    /// Every story in its own cluster.
    pub fn singletons(n: usize) -> Self {
        Self {
            labels: (0..n).collect(),
            n_clusters: n,
        }
    }

    /// Cluster id per story, in story order.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Consume into the raw label vector.
    pub fn into_labels(self) -> Vec<usize> {
        self.labels
    }

    /// Cluster id of story `i`.
    pub fn cluster_of(&self, i: usize) -> Option<usize> {
        self.labels.get(i).copied()
    }

    /// Number of stories covered.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True when no stories were clustered.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of distinct clusters.
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// Story indices per cluster, indexed by cluster id, each in ascending order.
    pub fn members(&self) -> Vec<Vec<usize>> {
        let mut out = vec![Vec::new(); self.n_clusters];
        for (story, &c) in self.labels.iter().enumerate() {
            out[c].push(story);
        }
        out
    }

    /// Cluster sizes, indexed by cluster id.
    pub fn sizes(&self) -> Vec<usize> {
        let mut out = vec![0; self.n_clusters];
        for &c in &self.labels {
            out[c] += 1;
        }
        out
    }
}
