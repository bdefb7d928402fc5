//! # storymesh
//!
//! Groups news stories into events and maps which outlets cover the same events.
//!
//! Each topic is one batch pass:
//!
//! 1. [`embed`]: titles → vectors, through an injected [`Embedder`]
//! 2. [`similarity`]: content similarity × temporal decay → [`DistanceMatrix`]
//! 3. [`cluster`]: average-linkage agglomeration cut at a distance threshold
//! 4. [`network`]: Jaccard co-coverage graph over the top-K outlets
//! 5. [`community`]: modularity communities on that graph, with a
//!    single-community fallback
//!
//! [`EventPipeline`] wires the stages together and runs topics one at a time.
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use storymesh::{EventPipeline, HashingEmbedder, PipelineConfig, Story};
//!
//! let day = |d| Utc.with_ymd_and_hms(2024, 5, d, 9, 0, 0).unwrap();
//! let stories = vec![
//!     Story::new(0, "Counting day: results declared", day(1), "Ledger"),
//!     Story::new(1, "Results declared on counting day", day(1), "Herald"),
//!     Story::new(2, "Heatwave alert issued", day(20), "Ledger"),
//! ];
//!
//! let pipeline = EventPipeline::new(HashingEmbedder::new(128)?, PipelineConfig::default())?;
//! let outcome = pipeline.run_topic("Elections", stories)?;
//! assert_eq!(outcome.stories[0].cluster_id, outcome.stories[1].cluster_id);
//! assert_ne!(outcome.stories[0].cluster_id, outcome.stories[2].cluster_id);
//! # Ok::<(), storymesh::Error>(())
//! ```

pub mod cluster;
pub mod community;
pub mod config;
pub mod embed;
/// Error types used across `storymesh`.
pub mod error;
pub mod network;
pub mod pipeline;
pub mod similarity;
pub mod story;
pub mod summary;

#[cfg(test)]
mod pipeline_tests;

pub use cluster::{AverageLinkage, ClusterAssignment, Dendrogram};
pub use community::{detect_or_fallback, CommunityDetection, LabelPropagation, Louvain};
pub use config::PipelineConfig;
pub use embed::{Embedder, HashingEmbedder};
pub use error::{Error, Result};
pub use network::{build_coverage_graph, jaccard, CoverageGraph, CoverageNetwork, SourceClusterSets};
pub use pipeline::{EventPipeline, TopicOutcome};
pub use similarity::DistanceMatrix;
pub use story::{ClusteredStory, Story};
pub use summary::TopicSummary;
