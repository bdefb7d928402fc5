//! Community detection on the co-coverage graph.
//!
//! Groups outlets whose coverage overlaps more than chance would predict,
//! a proxy for echo chambers.
//!
//! ## The Modularity Objective
//!
//! Algorithms here optimize **modularity** Q, which compares the weight
//! inside communities to the weight expected in a random graph with the same
//! degree sequence:
//!
//! ```text
//! Q = Σ_c [ L_c / m - γ (d_c / 2m)² ]
//! ```
//!
//! Where:
//! - m = total edge weight
//! - L_c = edge weight inside community c
//! - d_c = summed weighted degree of c's nodes
//! - γ = resolution parameter
//!
//! ## Algorithms
//!
//! - [`Louvain`]: multi-level greedy modularity optimization (default)
//! - [`LabelPropagation`]: O(E) weighted label spreading, seeded
//!
//! Both implement [`CommunityDetection`], so callers can swap one for the
//! other, or supply their own.
//!
//! ## Failure handling
//!
//! [`detect_or_fallback`] never fails. If the detector returns an error, or a
//! mapping of the wrong length, every node is put in community 0 and a
//! warning is logged.
//!
//! ## Usage
//!
//! ```rust
//! use petgraph::graph::UnGraph;
//! use storymesh::community::{detect_or_fallback, Louvain};
//!
//! let mut graph = UnGraph::<&str, f64>::new_undirected();
//! let a = graph.add_node("A");
//! let b = graph.add_node("B");
//! let c = graph.add_node("C");
//! graph.add_edge(a, b, 0.6);
//!
//! let communities = detect_or_fallback(&Louvain::new(), &graph);
//! assert_eq!(communities, vec![0, 0, 1]);
//! ```
//!
//! ## References
//!
//! - Blondel et al. (2008). "Fast unfolding of communities in large networks."
//! - Newman & Girvan (2004). "Finding and evaluating community structure in networks."
//! - Raghavan, Albert, Kumara (2007). "Near linear time algorithm to detect
//!   community structures in large-scale networks."

mod label_prop;
mod louvain;
mod modularity;
mod traits;

pub use label_prop::LabelPropagation;
pub use louvain::Louvain;
pub use modularity::modularity;
pub use traits::CommunityDetection;

use petgraph::graph::UnGraph;
use std::collections::HashMap;

/// Run `detector`, degrading to a single community on failure.
///
/// A graph with no nodes maps to an empty vector without calling the detector.
pub fn detect_or_fallback<D, N, E>(detector: &D, graph: &UnGraph<N, E>) -> Vec<usize>
where
    D: CommunityDetection,
    E: Copy + Into<f64>,
{
    let n = graph.node_count();
    if n == 0 {
        return Vec::new();
    }
    match detector.detect(graph) {
        Ok(communities) if communities.len() == n => communities,
        Ok(communities) => {
            tracing::warn!(
                nodes = n,
                returned = communities.len(),
                "community detection returned a partial mapping; using a single community"
            );
            vec![0; n]
        }
        Err(err) => {
            tracing::warn!(
                nodes = n,
                error = %err,
                "community detection failed; using a single community"
            );
            vec![0; n]
        }
    }
}

/// Relabel to dense ids in order of first appearance.
pub(crate) fn renumber(labels: &[usize]) -> Vec<usize> {
    let mut seen: HashMap<usize, usize> = HashMap::new();
    labels
        .iter()
        .map(|&l| {
            let next = seen.len();
            *seen.entry(l).or_insert(next)
        })
        .collect()
}
