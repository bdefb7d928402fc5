//! Per-source cluster membership.

use crate::cluster::ClusterAssignment;
use crate::error::{Error, Result};
use crate::story::Story;
use std::collections::{BTreeSet, HashMap};

/// One outlet and the events it covered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Outlet name.
    pub name: String,
    /// Stories the outlet published in this topic.
    pub story_count: usize,
    /// Distinct cluster ids the outlet published into.
    pub clusters: BTreeSet<usize>,
}

/// Sources ranked by story count (descending), ties by name (ascending).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceClusterSets {
    entries: Vec<SourceEntry>,
}

impl SourceClusterSets {
    /// Collect `(source, cluster_id)` memberships, one pair per story.
    pub fn from_memberships<'a, I>(memberships: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, usize)>,
    {
        let mut by_name: HashMap<&'a str, SourceEntry> = HashMap::new();
        for (name, cluster) in memberships {
            let entry = by_name.entry(name).or_insert_with(|| SourceEntry {
                name: name.to_string(),
                story_count: 0,
                clusters: BTreeSet::new(),
            });
            entry.story_count += 1;
            let _ = entry.clusters.insert(cluster);
        }

        let mut entries: Vec<SourceEntry> = by_name.into_values().collect();
        entries.sort_by(|a, b| {
            b.story_count
                .cmp(&a.story_count)
                .then_with(|| a.name.cmp(&b.name))
        });
        Self { entries }
    }

    /// Pair each story's outlet with its cluster id.
    pub fn from_stories(stories: &[Story], assignment: &ClusterAssignment) -> Result<Self> {
        if stories.len() != assignment.len() {
            return Err(Error::LengthMismatch {
                what: "cluster assignment",
                expected: stories.len(),
                found: assignment.len(),
            });
        }
        Ok(Self::from_memberships(
            stories
                .iter()
                .map(|s| s.media_name.as_str())
                .zip(assignment.labels().iter().copied()),
        ))
    }

    /// Keep only the `k` highest-ranked sources.
    pub fn top_k(mut self, k: usize) -> Self {
        self.entries.truncate(k);
        self
    }

    /// Ranked entries.
    pub fn entries(&self) -> &[SourceEntry] {
        &self.entries
    }

    /// Cluster set of a named source.
    pub fn get(&self, name: &str) -> Option<&BTreeSet<usize>> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| &e.clusters)
    }

    /// Number of sources.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no sources.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `|A ∩ B| / |A ∪ B|`, defined as 0 when both sets are empty.
pub fn jaccard(a: &BTreeSet<usize>, b: &BTreeSet<usize>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}
