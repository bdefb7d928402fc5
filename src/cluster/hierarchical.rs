//! Average-linkage agglomerative clustering over a precomputed distance matrix.
//!
//! Bottom-up: every story starts alone, and the two closest clusters merge
//! until the closest remaining pair is farther apart than the threshold.
//! There is no target cluster count.
//!
//! # Average linkage (UPGMA)
//!
//! ```text
//! d(A, B) = (1 / |A||B|) × Σ_{a∈A, b∈B} d(a, b)
//! ```
//!
//! After merging A and B, the distance to any other cluster K follows the
//! Lance–Williams update:
//!
//! ```text
//! d(A∪B, K) = (|A| d(A,K) + |B| d(B,K)) / (|A| + |B|)
//! ```
//!
//! UPGMA is monotone (merge heights never decrease), so stopping at the
//! threshold gives the same partition as building the whole dendrogram and
//! cutting it.
//!
//! # Determinism
//!
//! Each active cluster lives in the slot of its smallest member. Among equally
//! close pairs the lexicographically smallest `(slot_a, slot_b)` merges first,
//! i.e. the pair with the lowest original story indices.
//!
//! # Cost
//!
//! O(N²) memory for the condensed `f64` working copy. Each active cluster
//! caches its nearest higher-slot neighbour, so a typical run costs O(N²)
//! time, with an O(N³) worst case when many caches are invalidated together.

use super::assignment::ClusterAssignment;
use super::dendrogram::Dendrogram;
use crate::error::{Error, Result};
use crate::similarity::DistanceMatrix;

/// Distance-threshold average-linkage clustering.
#[derive(Debug, Clone)]
pub struct AverageLinkage {
    /// Clusters merge while their linkage distance is `<=` this.
    distance_threshold: f64,
}

impl AverageLinkage {
    /// Create a clusterer cutting at `distance_threshold`.
    pub fn new(distance_threshold: f64) -> Self {
        Self { distance_threshold }
    }

    /// The cut height.
    pub fn distance_threshold(&self) -> f64 {
        self.distance_threshold
    }

    /// Partition the stories behind `distances`.
    ///
    /// An empty matrix yields an empty assignment; one story yields one cluster.
    pub fn fit(&self, distances: &DistanceMatrix) -> Result<ClusterAssignment> {
        self.check_threshold()?;
        let dendro = self.agglomerate(distances, Some(self.distance_threshold));
        Ok(dendro.cut_at_distance(self.distance_threshold))
    }

    /// Build the full merge history, ignoring the threshold.
    pub fn fit_dendrogram(&self, distances: &DistanceMatrix) -> Result<Dendrogram> {
        if distances.is_empty() {
            return Err(Error::EmptyInput);
        }
        Ok(self.agglomerate(distances, None))
    }

    fn check_threshold(&self) -> Result<()> {
        if self.distance_threshold.is_nan() {
            return Err(Error::InvalidParameter {
                name: "distance_threshold",
                message: "must not be NaN",
            });
        }
        Ok(())
    }

    fn agglomerate(&self, distances: &DistanceMatrix, stop_above: Option<f64>) -> Dendrogram {
        let n = distances.len();
        let mut dendro = Dendrogram::new(n);
        if n < 2 {
            return dendro;
        }

        let mut work = Condensed {
            n,
            dist: distances.condensed(),
        };
        let mut active = vec![true; n];
        let mut size = vec![1usize; n];
        let mut node_id: Vec<usize> = (0..n).collect();
        let mut nearest: Vec<Option<(f64, usize)>> =
            (0..n).map(|i| work.nearest_after(i, &active)).collect();

        for step in 0..(n - 1) {
            // Strict `<` while scanning ascending slots keeps the lowest pair on ties.
            let mut best: Option<(f64, usize)> = None;
            for (slot, cached) in nearest.iter().enumerate() {
                if !active[slot] {
                    continue;
                }
                if let Some((d, _)) = *cached {
                    if best.map_or(true, |(bd, _)| d < bd) {
                        best = Some((d, slot));
                    }
                }
            }

            let Some((d, a)) = best else { break };
            if stop_above.is_some_and(|t| d > t) {
                break;
            }
            let Some((_, b)) = nearest[a] else { break };

            dendro.add_merge(node_id[a], node_id[b], d, size[a] + size[b]);

            let (wa, wb) = (size[a] as f64, size[b] as f64);
            for k in 0..n {
                if !active[k] || k == a || k == b {
                    continue;
                }
                let merged = (wa * work.get(a, k) + wb * work.get(b, k)) / (wa + wb);
                work.set(a, k, merged);
            }

            active[b] = false;
            size[a] += size[b];
            node_id[a] = n + step;
            nearest[b] = None;

            for i in 0..n {
                if !active[i] {
                    continue;
                }
                let stale = matches!(nearest[i], Some((_, j)) if j == a || j == b);
                if i == a || stale {
                    nearest[i] = work.nearest_after(i, &active);
                } else if i < a {
                    let d_ia = work.get(i, a);
                    let closer = match nearest[i] {
                        Some((d, j)) => d_ia < d || (d_ia == d && a < j),
                        None => true,
                    };
                    if closer {
                        nearest[i] = Some((d_ia, a));
                    }
                }
            }
        }

        tracing::debug!(
            stories = n,
            merges = dendro.n_merges(),
            "average linkage finished"
        );
        dendro
    }
}

/// Upper-triangle working copy of the distance matrix.
struct Condensed {
    n: usize,
    dist: Vec<f64>,
}

impl Condensed {
    #[inline]
    fn index(&self, i: usize, j: usize) -> usize {
        let (i, j) = if i < j { (i, j) } else { (j, i) };
        self.n * i - i * (i + 1) / 2 + (j - i - 1)
    }

    #[inline]
    fn get(&self, i: usize, j: usize) -> f64 {
        self.dist[self.index(i, j)]
    }

    #[inline]
    fn set(&mut self, i: usize, j: usize, value: f64) {
        let idx = self.index(i, j);
        self.dist[idx] = value;
    }

    /// Closest active slot above `i`; ties go to the lower slot.
    fn nearest_after(&self, i: usize, active: &[bool]) -> Option<(f64, usize)> {
        let mut best: Option<(f64, usize)> = None;
        for j in (i + 1)..self.n {
            if !active[j] {
                continue;
            }
            let d = self.get(i, j);
            if best.map_or(true, |(bd, _)| d < bd) {
                best = Some((d, j));
            }
        }
        best
    }
}
