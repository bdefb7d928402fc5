//! Co-coverage graph construction.

use super::sources::{jaccard, SourceClusterSets};
use crate::community::modularity;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::BTreeMap;

/// Nodes are outlet names, edge weights are Jaccard similarities.
pub type CoverageGraph = UnGraph<String, f64>;

/// Build the co-coverage graph over already-selected sources.
///
/// Nodes follow the ranking of `sources`. An edge joins two sources iff their
/// Jaccard similarity is strictly greater than `jaccard_threshold`. Fewer
/// than two sources yield a graph with no nodes at all.
pub fn build_coverage_graph(sources: &SourceClusterSets, jaccard_threshold: f64) -> CoverageGraph {
    let mut graph = CoverageGraph::new_undirected();
    if sources.len() < 2 {
        return graph;
    }

    let entries = sources.entries();
    let nodes: Vec<NodeIndex> = entries
        .iter()
        .map(|e| graph.add_node(e.name.clone()))
        .collect();

    for i in 0..entries.len() {
        for j in (i + 1)..entries.len() {
            let weight = jaccard(&entries[i].clusters, &entries[j].clusters);
            if weight > jaccard_threshold {
                let _ = graph.add_edge(nodes[i], nodes[j], weight);
            }
        }
    }
    graph
}

/// A co-coverage graph together with its community partition.
#[derive(Debug, Clone)]
pub struct CoverageNetwork {
    /// The weighted source graph.
    pub graph: CoverageGraph,
    /// Community id per node, indexed by `NodeIndex::index()`.
    pub communities: Vec<usize>,
}

impl CoverageNetwork {
    /// A network with no nodes.
    pub fn empty() -> Self {
        Self {
            graph: CoverageGraph::new_undirected(),
            communities: Vec::new(),
        }
    }

    /// True when the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    fn node(&self, name: &str) -> Option<NodeIndex> {
        self.graph.node_indices().find(|&n| self.graph[n] == name)
    }

    /// Community of a named source.
    pub fn community_of(&self, name: &str) -> Option<usize> {
        self.node(name)
            .and_then(|n| self.communities.get(n.index()).copied())
    }

    /// Number of edges touching a named source.
    pub fn degree(&self, name: &str) -> Option<usize> {
        self.node(name).map(|n| self.graph.edges(n).count())
    }

    /// Number of distinct communities.
    pub fn n_communities(&self) -> usize {
        let mut ids = self.communities.clone();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }

    /// Sources in a community, in node order.
    pub fn members(&self, community: usize) -> Vec<&str> {
        self.graph
            .node_indices()
            .filter(|n| self.communities.get(n.index()) == Some(&community))
            .map(|n| self.graph[n].as_str())
            .collect()
    }

    /// Source name → community id.
    pub fn community_map(&self) -> BTreeMap<String, usize> {
        self.graph
            .node_indices()
            .filter_map(|n| {
                self.communities
                    .get(n.index())
                    .map(|&c| (self.graph[n].clone(), c))
            })
            .collect()
    }

    /// `(source, source, weight)` for every edge.
    pub fn edges(&self) -> Vec<(&str, &str, f64)> {
        self.graph
            .edge_references()
            .map(|e| {
                (
                    self.graph[e.source()].as_str(),
                    self.graph[e.target()].as_str(),
                    *e.weight(),
                )
            })
            .collect()
    }

    /// Weighted modularity of the stored partition.
    pub fn modularity(&self, resolution: f64) -> f64 {
        modularity(&self.graph, &self.communities, resolution)
    }
}
