//! Louvain algorithm for community detection.
//!
//! Fast modularity optimization through local node moves and graph aggregation.
//!
//! ## The Algorithm (Blondel et al. 2008)
//!
//! 1. **Phase 1 (Local Moving)**: Start with each node in its own community.
//!    Repeatedly move nodes to the neighboring community with the highest
//!    modularity gain until no move improves it.
//!
//! 2. **Phase 2 (Aggregation)**: Build a meta-graph where communities become
//!    single nodes. Edge weights are sums of edges between communities.
//!    Self-loops carry the internal weight.
//!
//! 3. **Iterate** on the meta-graph until modularity stops improving.
//!
//! Edge weights are honored, so a strong co-coverage tie pulls harder than a
//! weak one. Nodes are visited in index order and candidate communities in id
//! order, and a move needs a strictly positive improvement. The result is a
//! pure function of the graph.
//!
//! Disconnected components never share a community: a node only ever moves
//! into a community one of its neighbours belongs to.
//!
//! ## References
//!
//! Blondel et al. (2008). "Fast unfolding of communities in large networks."
//! Journal of Statistical Mechanics: Theory and Experiment, P10008.

use super::modularity::{modularity_of, weighted_edges};
use super::renumber;
use super::traits::CommunityDetection;
use crate::error::{Error, Result};
use petgraph::graph::UnGraph;
use std::collections::BTreeMap;

/// Louvain community detection algorithm.
#[derive(Debug, Clone)]
pub struct Louvain {
    /// Resolution parameter (gamma).
    resolution: f64,
    /// Maximum sweeps per level.
    max_iter: usize,
    /// Maximum levels of aggregation.
    max_levels: usize,
    /// Minimum modularity improvement to continue.
    min_modularity_gain: f64,
}

impl Louvain {
    /// Create a new Louvain detector with default settings.
    pub fn new() -> Self {
        Self {
            resolution: 1.0,
            max_iter: 100,
            max_levels: 10,
            min_modularity_gain: 1e-7,
        }
    }

    /// Set resolution parameter.
    ///
    /// Higher values produce smaller communities.
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set maximum sweeps per level.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set maximum aggregation levels.
    pub fn with_max_levels(mut self, levels: usize) -> Self {
        self.max_levels = levels;
        self
    }

    /// Phase 1: Local moving on a weighted graph.
    /// Returns (communities, improved).
    fn local_moving(
        &self,
        n: usize,
        edges: &[(usize, usize, f64)],
        self_loops: &[f64],
    ) -> (Vec<usize>, bool) {
        let mut adj: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); n];
        for &(i, j, w) in edges {
            *adj[i].entry(j).or_insert(0.0) += w;
            *adj[j].entry(i).or_insert(0.0) += w;
        }

        let m: f64 = edges.iter().map(|(_, _, w)| w).sum::<f64>() + self_loops.iter().sum::<f64>();
        if m <= 0.0 {
            return ((0..n).collect(), false);
        }

        let mut degrees = vec![0.0; n];
        for &(i, j, w) in edges {
            degrees[i] += w;
            degrees[j] += w;
        }
        for (i, &sl) in self_loops.iter().enumerate() {
            degrees[i] += 2.0 * sl;
        }

        let mut communities: Vec<usize> = (0..n).collect();
        let mut community_degrees = degrees.clone();
        let mut any_improved = false;

        let gain = |ki_in: f64, sigma_tot: f64, ki: f64| {
            ki_in / m - self.resolution * sigma_tot * ki / (2.0 * m * m)
        };

        for _iter in 0..self.max_iter {
            let mut improved = false;

            for node in 0..n {
                let current = communities[node];
                let ki = degrees[node];

                // Take the node out of its community.
                community_degrees[current] -= ki;

                let mut community_weights: BTreeMap<usize, f64> = BTreeMap::new();
                for (&neighbor, &w) in &adj[node] {
                    *community_weights.entry(communities[neighbor]).or_insert(0.0) += w;
                }

                let mut best_community = current;
                let mut best_gain = gain(
                    community_weights.get(&current).copied().unwrap_or(0.0),
                    community_degrees[current],
                    ki,
                );

                for (&target, &ki_in) in &community_weights {
                    let g = gain(ki_in, community_degrees[target], ki);
                    if g > best_gain + f64::EPSILON {
                        best_gain = g;
                        best_community = target;
                    }
                }

                communities[node] = best_community;
                community_degrees[best_community] += ki;
                if best_community != current {
                    improved = true;
                    any_improved = true;
                }
            }

            if !improved {
                break;
            }
        }

        (communities, any_improved)
    }

    /// Phase 2: Aggregate graph based on communities.
    /// Returns (new_edges, new_self_loops, new_node -> old nodes).
    fn aggregate(
        edges: &[(usize, usize, f64)],
        self_loops: &[f64],
        communities: &[usize],
    ) -> (Vec<(usize, usize, f64)>, Vec<f64>, Vec<Vec<usize>>) {
        let dense = renumber(communities);
        let n_new = dense.iter().copied().max().map_or(0, |c| c + 1);

        let mut new_to_old: Vec<Vec<usize>> = vec![Vec::new(); n_new];
        for (node, &comm) in dense.iter().enumerate() {
            new_to_old[comm].push(node);
        }

        let mut new_edge_weights: BTreeMap<(usize, usize), f64> = BTreeMap::new();
        let mut new_self_loops = vec![0.0; n_new];
        for (i, &sl) in self_loops.iter().enumerate() {
            new_self_loops[dense[i]] += sl;
        }
        for &(i, j, w) in edges {
            let (ci, cj) = (dense[i], dense[j]);
            if ci == cj {
                new_self_loops[ci] += w;
            } else {
                let key = if ci < cj { (ci, cj) } else { (cj, ci) };
                *new_edge_weights.entry(key).or_insert(0.0) += w;
            }
        }

        let new_edges = new_edge_weights
            .into_iter()
            .map(|((i, j), w)| (i, j, w))
            .collect();

        (new_edges, new_self_loops, new_to_old)
    }

    /// Expand partition from aggregated level to the level below.
    fn expand_partition(partition: &[usize], node_mapping: &[Vec<usize>]) -> Vec<usize> {
        let n_below = node_mapping.iter().map(Vec::len).sum();
        let mut result = vec![0; n_below];
        for (agg_node, original_nodes) in node_mapping.iter().enumerate() {
            for &orig in original_nodes {
                result[orig] = partition[agg_node];
            }
        }
        result
    }
}

impl Default for Louvain {
    fn default() -> Self {
        Self::new()
    }
}

impl CommunityDetection for Louvain {
    fn detect<N, E>(&self, graph: &UnGraph<N, E>) -> Result<Vec<usize>>
    where
        E: Copy + Into<f64>,
    {
        let n = graph.node_count();
        if n == 0 {
            return Err(Error::EmptyInput);
        }

        let (edges, self_loops) = weighted_edges(graph);
        if let Some(&(_, _, w)) = edges.iter().find(|(_, _, w)| !w.is_finite() || *w < 0.0) {
            return Err(Error::Community(format!(
                "edge weights must be finite and non-negative, found {w}"
            )));
        }

        if edges.is_empty() {
            // No edges: each node is its own community
            return Ok((0..n).collect());
        }

        let mut current_n = n;
        let mut current_edges = edges;
        let mut current_self_loops = self_loops;
        let mut mapping_stack: Vec<Vec<Vec<usize>>> = Vec::new();
        let mut prev_modularity = f64::NEG_INFINITY;

        for _level in 0..self.max_levels {
            let (partition, improved) =
                self.local_moving(current_n, &current_edges, &current_self_loops);
            if !improved {
                break;
            }

            let mod_now = modularity_of(
                current_n,
                &current_edges,
                &current_self_loops,
                &partition,
                self.resolution,
            );
            if mod_now - prev_modularity < self.min_modularity_gain {
                break;
            }
            prev_modularity = mod_now;

            let (new_edges, new_self_loops, node_mapping) =
                Self::aggregate(&current_edges, &current_self_loops, &partition);

            if node_mapping.len() == current_n {
                break;
            }

            current_n = node_mapping.len();
            mapping_stack.push(node_mapping);
            current_edges = new_edges;
            current_self_loops = new_self_loops;
        }

        let mut result: Vec<usize> = (0..current_n).collect();
        while let Some(mapping) = mapping_stack.pop() {
            result = Self::expand_partition(&result, &mapping);
        }

        Ok(renumber(&result))
    }
}
