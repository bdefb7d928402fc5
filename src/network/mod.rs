//! Source co-coverage networks.
//!
//! Two outlets are linked when they cover the same events. Each outlet is
//! reduced to the set of event clusters it published into, and each pair is
//! weighted by the Jaccard similarity of those sets:
//!
//! ```text
//! J(A, B) = |C_A ∩ C_B| / |C_A ∪ C_B|
//! ```
//!
//! Only the top-K outlets by story count enter the graph. Outlets outside
//! the top-K are dropped entirely, not kept as isolated nodes. Pairs need
//! `J > threshold` (strict) for an edge.

mod graph;
mod sources;

pub use graph::{build_coverage_graph, CoverageGraph, CoverageNetwork};
pub use sources::{jaccard, SourceClusterSets, SourceEntry};
