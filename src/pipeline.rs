//! Per-topic batch pipeline.
//!
//! ```text
//! stories → embeddings → distance matrix → cluster ids
//!         → per-source cluster sets → co-coverage graph → communities
//! ```
//!
//! Topics run one after another with nothing shared between them. The N×N
//! matrix is scoped to [`EventPipeline::cluster_stories`] and freed before
//! the function returns, so peak memory is set by the largest topic alone.

use crate::cluster::{AverageLinkage, ClusterAssignment};
use crate::community::{detect_or_fallback, CommunityDetection, Louvain};
use crate::config::PipelineConfig;
use crate::embed::{checked_embed, Embedder};
use crate::error::Result;
use crate::network::{build_coverage_graph, CoverageNetwork, SourceClusterSets};
use crate::similarity::DistanceMatrix;
use crate::story::{ClusteredStory, Story};
use tracing::{debug, error, info, warn};

/// Result of one topic pass.
#[derive(Debug, Clone)]
pub struct TopicOutcome {
    /// Topic name.
    pub topic: String,
    /// Input stories with their cluster ids, in input order.
    pub stories: Vec<ClusteredStory>,
    /// Number of distinct clusters.
    pub n_clusters: usize,
    /// Co-coverage graph and its communities. Empty when fewer than two
    /// sources were selected.
    pub network: CoverageNetwork,
}

/// Event clustering and source-network builder.
///
/// The embedder and community detector are injected; the default detector
/// is [`Louvain`] at the configured resolution.
#[derive(Debug, Clone)]
pub struct EventPipeline<E, C = Louvain> {
    config: PipelineConfig,
    embedder: E,
    detector: C,
}

impl<E: Embedder> EventPipeline<E, Louvain> {
    /// Create a pipeline, validating the configuration.
    pub fn new(embedder: E, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let detector = Louvain::new().with_resolution(config.resolution);
        Ok(Self {
            config,
            embedder,
            detector,
        })
    }
}

impl<E: Embedder, C: CommunityDetection> EventPipeline<E, C> {
    /// Swap in another community detector.
    pub fn with_detector<D: CommunityDetection>(self, detector: D) -> EventPipeline<E, D> {
        EventPipeline {
            config: self.config,
            embedder: self.embedder,
            detector,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Embed titles, build the distance matrix, and cut the dendrogram.
    pub fn cluster_stories(&self, stories: &[Story]) -> Result<ClusterAssignment> {
        if stories.is_empty() {
            return Ok(ClusterAssignment::default());
        }

        let titles: Vec<&str> = stories.iter().map(|s| s.title.as_str()).collect();
        let dates: Vec<_> = stories.iter().map(|s| s.publish_date).collect();

        let distances = {
            let embeddings = checked_embed(&self.embedder, &titles)?;
            DistanceMatrix::build(&embeddings, &dates, self.config.decay_rate)?
        };
        debug!(stories = distances.len(), "distance matrix built");

        AverageLinkage::new(self.config.distance_threshold).fit(&distances)
    }

    /// Build the co-coverage network and partition it into communities.
    pub fn build_network(
        &self,
        stories: &[Story],
        assignment: &ClusterAssignment,
    ) -> Result<CoverageNetwork> {
        let sources = SourceClusterSets::from_stories(stories, assignment)?
            .top_k(self.config.top_k_sources);
        let graph = build_coverage_graph(&sources, self.config.jaccard_threshold);
        if graph.node_count() < 2 {
            debug!(sources = sources.len(), "too few sources for a network");
            return Ok(CoverageNetwork::empty());
        }

        let communities = detect_or_fallback(&self.detector, &graph);
        Ok(CoverageNetwork { graph, communities })
    }

    /// Run one topic end to end.
    ///
    /// An empty story list is not an error: it yields an empty outcome.
    pub fn run_topic(&self, topic: &str, stories: Vec<Story>) -> Result<TopicOutcome> {
        info!(topic, stories = stories.len(), "processing topic");

        let assignment = self.cluster_stories(&stories)?;
        let network = self.build_network(&stories, &assignment)?;
        let n_clusters = assignment.n_clusters();

        info!(
            topic,
            clusters = n_clusters,
            sources = network.graph.node_count(),
            edges = network.graph.edge_count(),
            communities = network.n_communities(),
            "topic complete"
        );

        let stories = stories
            .into_iter()
            .zip(assignment.into_labels())
            .map(|(story, cluster_id)| ClusteredStory { story, cluster_id })
            .collect();

        Ok(TopicOutcome {
            topic: topic.to_string(),
            stories,
            n_clusters,
            network,
        })
    }

    /// Run topics sequentially.
    ///
    /// Topics with no stories are skipped. A topic that fails is logged and
    /// skipped; the remaining topics still run. Outcomes keep input order.
    pub fn run_topics<I, S>(&self, topics: I) -> Vec<TopicOutcome>
    where
        I: IntoIterator<Item = (S, Vec<Story>)>,
        S: AsRef<str>,
    {
        let mut outcomes = Vec::new();
        for (topic, stories) in topics {
            let topic = topic.as_ref();
            if stories.is_empty() {
                warn!(topic, "no stories for topic; skipping");
                continue;
            }
            match self.run_topic(topic, stories) {
                Ok(outcome) => outcomes.push(outcome),
                Err(err) => error!(topic, error = %err, "topic failed; continuing"),
            }
        }
        outcomes
    }
}
