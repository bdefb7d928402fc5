//! Label propagation for community detection.
//!
//! Very fast O(E) algorithm where nodes adopt the label carrying the most
//! edge weight among their neighbors.

use super::renumber;
use super::traits::CommunityDetection;
use crate::error::{Error, Result};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use rand::prelude::*;
use std::collections::BTreeMap;

/// Label propagation community detection.
#[derive(Debug, Clone)]
pub struct LabelPropagation {
    /// Maximum iterations.
    max_iter: usize,
    /// Random seed.
    seed: u64,
}

impl LabelPropagation {
    /// Create a new label propagation detector with seed 0.
    pub fn new() -> Self {
        Self {
            max_iter: 100,
            seed: 0,
        }
    }

    /// Set maximum iterations.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl Default for LabelPropagation {
    fn default() -> Self {
        Self::new()
    }
}

impl CommunityDetection for LabelPropagation {
    fn detect<N, E>(&self, graph: &UnGraph<N, E>) -> Result<Vec<usize>>
    where
        E: Copy + Into<f64>,
    {
        let n = graph.node_count();
        if n == 0 {
            return Err(Error::EmptyInput);
        }

        let mut labels: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(self.seed);

        for _iter in 0..self.max_iter {
            let mut changed = false;

            let mut order: Vec<usize> = (0..n).collect();
            order.shuffle(&mut rng);

            for &node in &order {
                let mut label_weights: BTreeMap<usize, f64> = BTreeMap::new();
                for edge in graph.edges(NodeIndex::new(node)) {
                    let neighbor = if edge.source().index() == node {
                        edge.target().index()
                    } else {
                        edge.source().index()
                    };
                    if neighbor == node {
                        continue;
                    }
                    let w: f64 = (*edge.weight()).into();
                    *label_weights.entry(labels[neighbor]).or_insert(0.0) += w;
                }

                let Some(max_weight) = label_weights.values().copied().reduce(f64::max) else {
                    continue;
                };
                let candidates: Vec<usize> = label_weights
                    .iter()
                    .filter(|(_, &w)| w == max_weight)
                    .map(|(&label, _)| label)
                    .collect();

                // Keep the current label when it is among the best, so runs settle.
                let new_label = if candidates.contains(&labels[node]) {
                    labels[node]
                } else if candidates.len() == 1 {
                    candidates[0]
                } else {
                    candidates[rng.random_range(0..candidates.len())]
                };

                if labels[node] != new_label {
                    labels[node] = new_label;
                    changed = true;
                }
            }

            if !changed {
                break;
            }
        }

        Ok(renumber(&labels))
    }
}
