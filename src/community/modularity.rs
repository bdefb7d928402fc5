//! Weighted modularity.

use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;
use std::collections::BTreeMap;

/// Modularity of `communities` (indexed by node) on a weighted graph.
///
/// Returns 0 for a graph with no edge weight.
pub fn modularity<N, E>(graph: &UnGraph<N, E>, communities: &[usize], resolution: f64) -> f64
where
    E: Copy + Into<f64>,
{
    let (edges, self_loops) = weighted_edges(graph);
    modularity_of(graph.node_count(), &edges, &self_loops, communities, resolution)
}

/// Split a graph into `(i < j)` weighted edges and per-node self-loop weight.
pub(crate) fn weighted_edges<N, E>(graph: &UnGraph<N, E>) -> (Vec<(usize, usize, f64)>, Vec<f64>)
where
    E: Copy + Into<f64>,
{
    let mut edges = Vec::with_capacity(graph.edge_count());
    let mut self_loops = vec![0.0; graph.node_count()];
    for edge in graph.edge_references() {
        let (i, j) = (edge.source().index(), edge.target().index());
        let w: f64 = (*edge.weight()).into();
        match i.cmp(&j) {
            std::cmp::Ordering::Less => edges.push((i, j, w)),
            std::cmp::Ordering::Greater => edges.push((j, i, w)),
            std::cmp::Ordering::Equal => self_loops[i] += w,
        }
    }
    (edges, self_loops)
}

/// `Q = Σ_c [ L_c / m - γ (d_c / 2m)² ]`
///
/// `L_c` is the weight inside community c (self-loops counted once),
/// `d_c` the summed weighted degree of its nodes.
pub(crate) fn modularity_of(
    n: usize,
    edges: &[(usize, usize, f64)],
    self_loops: &[f64],
    communities: &[usize],
    resolution: f64,
) -> f64 {
    let m: f64 = edges.iter().map(|(_, _, w)| w).sum::<f64>() + self_loops.iter().sum::<f64>();
    if m <= 0.0 || communities.len() < n {
        return 0.0;
    }

    let mut internal: BTreeMap<usize, f64> = BTreeMap::new();
    let mut degree: BTreeMap<usize, f64> = BTreeMap::new();
    for &(i, j, w) in edges {
        *degree.entry(communities[i]).or_insert(0.0) += w;
        *degree.entry(communities[j]).or_insert(0.0) += w;
        if communities[i] == communities[j] {
            *internal.entry(communities[i]).or_insert(0.0) += w;
        }
    }
    for (i, &sl) in self_loops.iter().enumerate() {
        if sl > 0.0 {
            *degree.entry(communities[i]).or_insert(0.0) += 2.0 * sl;
            *internal.entry(communities[i]).or_insert(0.0) += sl;
        }
    }

    degree
        .iter()
        .map(|(c, &d)| {
            let l = internal.get(c).copied().unwrap_or(0.0);
            l / m - resolution * (d / (2.0 * m)).powi(2)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_disjoint_edges() {
        // Q = 2 × (1/2 - (2/4)²) = 0.5
        let mut g = UnGraph::<(), f64>::new_undirected();
        let n: Vec<_> = (0..4).map(|_| g.add_node(())).collect();
        let _ = g.add_edge(n[0], n[1], 1.0);
        let _ = g.add_edge(n[2], n[3], 1.0);

        assert!((modularity(&g, &[0, 0, 1, 1], 1.0) - 0.5).abs() < 1e-12);
        assert!(modularity(&g, &[0, 0, 0, 0], 1.0).abs() < 1e-12);
        assert!(modularity(&g, &[0, 1, 2, 3], 1.0) < 0.0);
    }

    #[test]
    fn test_weights_scale_out() {
        let mut g = UnGraph::<(), f64>::new_undirected();
        let n: Vec<_> = (0..3).map(|_| g.add_node(())).collect();
        let _ = g.add_edge(n[0], n[1], 0.4);
        let _ = g.add_edge(n[1], n[2], 0.2);
        let q = modularity(&g, &[0, 0, 1], 1.0);

        let mut h = UnGraph::<(), f64>::new_undirected();
        let n: Vec<_> = (0..3).map(|_| h.add_node(())).collect();
        let _ = h.add_edge(n[0], n[1], 4.0);
        let _ = h.add_edge(n[1], n[2], 2.0);
        assert!((q - modularity(&h, &[0, 0, 1], 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_edgeless_graph_is_zero() {
        let mut g = UnGraph::<(), f64>::new_undirected();
        let _ = g.add_node(());
        assert_eq!(modularity(&g, &[0], 1.0), 0.0);
    }
}
