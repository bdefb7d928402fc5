//! Serializable per-topic summaries for reporting and export.
//!
//! Nothing here touches the filesystem; callers decide where JSON goes.

use crate::network::CoverageNetwork;
use crate::pipeline::TopicOutcome;
use crate::story::Story;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

const TITLE_LIMIT: usize = 60;

/// One event cluster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterSummary {
    /// Cluster id within the topic.
    pub cluster_id: usize,
    /// Number of stories.
    pub size: usize,
    /// Most frequent title, shortened to 60 characters.
    pub representative_title: String,
    /// Earliest publish date in the cluster.
    pub first_published: DateTime<Utc>,
    /// Latest publish date in the cluster.
    pub last_published: DateTime<Utc>,
    /// Distinct outlets, sorted.
    pub sources: Vec<String>,
    /// Member stories in input order.
    pub stories: Vec<Story>,
}

/// A node of the exported network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSummary {
    /// Outlet name.
    pub name: String,
    /// Community id.
    pub community: usize,
    /// Number of co-coverage edges.
    pub degree: usize,
}

/// An edge of the exported network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeSummary {
    /// One endpoint.
    pub source: String,
    /// Other endpoint.
    pub target: String,
    /// Jaccard similarity.
    pub weight: f64,
}

/// The co-coverage network in export form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkSummary {
    /// Nodes in graph order.
    pub nodes: Vec<NodeSummary>,
    /// Edges in insertion order.
    pub edges: Vec<EdgeSummary>,
    /// Number of distinct communities.
    pub n_communities: usize,
    /// Modularity of the partition at the given resolution.
    pub modularity: f64,
}

/// Everything downstream reporting needs about one topic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopicSummary {
    /// Topic name.
    pub topic: String,
    /// Stories clustered.
    pub total_stories: usize,
    /// Distinct clusters.
    pub total_clusters: usize,
    /// Clusters, largest first (ties by id).
    pub clusters: Vec<ClusterSummary>,
    /// Source network.
    pub network: NetworkSummary,
}

impl TopicSummary {
    /// Summarize a finished topic.
    pub fn from_outcome(outcome: &TopicOutcome, resolution: f64) -> Self {
        let mut grouped: Vec<Vec<&Story>> = vec![Vec::new(); outcome.n_clusters];
        for clustered in &outcome.stories {
            if let Some(bucket) = grouped.get_mut(clustered.cluster_id) {
                bucket.push(&clustered.story);
            }
        }

        let mut clusters: Vec<ClusterSummary> = grouped
            .into_iter()
            .enumerate()
            .filter_map(|(id, members)| summarize_cluster(id, &members))
            .collect();
        clusters.sort_by(|a, b| b.size.cmp(&a.size).then(a.cluster_id.cmp(&b.cluster_id)));

        Self {
            topic: outcome.topic.clone(),
            total_stories: outcome.stories.len(),
            total_clusters: clusters.len(),
            clusters,
            network: summarize_network(&outcome.network, resolution),
        }
    }

    /// The `n` largest clusters.
    pub fn top_clusters(&self, n: usize) -> &[ClusterSummary] {
        &self.clusters[..n.min(self.clusters.len())]
    }

    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn summarize_cluster(cluster_id: usize, members: &[&Story]) -> Option<ClusterSummary> {
    let first_published = members.iter().map(|s| s.publish_date).min()?;
    let last_published = members.iter().map(|s| s.publish_date).max()?;
    let sources: BTreeSet<&str> = members.iter().map(|s| s.media_name.as_str()).collect();

    Some(ClusterSummary {
        cluster_id,
        size: members.len(),
        representative_title: shorten(&most_frequent_title(members)),
        first_published,
        last_published,
        sources: sources.into_iter().map(str::to_string).collect(),
        stories: members.iter().map(|s| (*s).clone()).collect(),
    })
}

fn summarize_network(network: &CoverageNetwork, resolution: f64) -> NetworkSummary {
    let graph = &network.graph;
    let nodes = graph
        .node_indices()
        .map(|n| NodeSummary {
            name: graph[n].clone(),
            community: network.communities.get(n.index()).copied().unwrap_or(0),
            degree: graph.edges(n).count(),
        })
        .collect();
    let edges = network
        .edges()
        .into_iter()
        .map(|(s, t, w)| EdgeSummary {
            source: s.to_string(),
            target: t.to_string(),
            weight: w,
        })
        .collect();

    NetworkSummary {
        nodes,
        edges,
        n_communities: network.n_communities(),
        modularity: network.modularity(resolution),
    }
}

/// Most frequent title; ties go to the one seen first.
fn most_frequent_title(members: &[&Story]) -> String {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (pos, story) in members.iter().enumerate() {
        counts.entry(story.title.as_str()).or_insert((0, pos)).0 += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (ca, pa)), (_, (cb, pb))| ca.cmp(cb).then(pb.cmp(pa)))
        .map(|(title, _)| title.to_string())
        .unwrap_or_default()
}

fn shorten(title: &str) -> String {
    if title.chars().count() <= TITLE_LIMIT {
        return title.to_string();
    }
    let head: String = title.chars().take(TITLE_LIMIT - 3).collect();
    format!("{head}...")
}
