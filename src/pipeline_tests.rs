#[cfg(test)]
mod tests {
    use crate::community::{CommunityDetection, LabelPropagation};
    use crate::embed::{Embedder, HashingEmbedder};
    use crate::error::{Error, Result};
    use crate::pipeline::EventPipeline;
    use crate::story::Story;
    use crate::summary::TopicSummary;
    use crate::{ClusterAssignment, PipelineConfig};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use petgraph::graph::UnGraph;
    use proptest::prelude::*;
    use std::collections::HashMap;

    /// Looks titles up in a fixed table; unknown titles are an embedding failure.
    struct TableEmbedder(HashMap<&'static str, Vec<f32>>);

    impl TableEmbedder {
        fn new(rows: &[(&'static str, [f32; 3])]) -> Self {
            Self(rows.iter().map(|(t, v)| (*t, v.to_vec())).collect())
        }
    }

    impl Embedder for TableEmbedder {
        fn embed(&self, titles: &[&str]) -> Result<Vec<Vec<f32>>> {
            titles
                .iter()
                .map(|t| {
                    self.0
                        .get(t)
                        .cloned()
                        .ok_or_else(|| Error::Embedding(format!("no vector for {t:?}")))
                })
                .collect()
        }
    }

    struct Failing;

    impl CommunityDetection for Failing {
        fn detect<N, E>(&self, _graph: &UnGraph<N, E>) -> Result<Vec<usize>>
        where
            E: Copy + Into<f64>,
        {
            Err(Error::Community("partitioner unavailable".into()))
        }
    }

    fn day(offset: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 4, 7, 30, 0).unwrap() + Duration::days(offset)
    }

    fn same_title_at(offsets: &[i64]) -> Vec<Story> {
        offsets
            .iter()
            .enumerate()
            .map(|(i, &d)| Story::new(i, "Results declared", day(d), format!("Outlet {i}")))
            .collect()
    }

    fn constant_embedder() -> TableEmbedder {
        TableEmbedder::new(&[("Results declared", [0.2, 0.5, 0.1])])
    }

    fn pipeline() -> EventPipeline<TableEmbedder> {
        EventPipeline::new(constant_embedder(), PipelineConfig::default()).unwrap()
    }

    fn clusters_for(offsets: &[i64]) -> Vec<usize> {
        pipeline()
            .cluster_stories(&same_title_at(offsets))
            .unwrap()
            .into_labels()
    }

    #[test]
    fn identical_titles_split_by_publication_gap() {
        assert_eq!(clusters_for(&[0, 1, 2, 10, 11]), vec![0, 0, 0, 1, 1]);
    }

    #[test]
    fn event_window_holds_at_four_days_and_breaks_at_five() {
        assert_eq!(clusters_for(&[0, 4]), vec![0, 0]);
        assert_eq!(clusters_for(&[0, 5]), vec![0, 1]);
        assert_eq!(clusters_for(&[0, 1, 2, 3, 4]), vec![0, 0, 0, 0, 0]);
        // A tight day-0 group still cannot pull in a story five days out.
        assert_eq!(clusters_for(&[0, 0, 0, 0, 5]), vec![0, 0, 0, 0, 1]);
    }

    #[test]
    fn identical_stories_same_day_form_one_cluster() {
        assert_eq!(clusters_for(&[3, 3, 3, 3]), vec![0, 0, 0, 0]);
    }

    #[test]
    fn empty_and_single_inputs() -> Result<()> {
        let p = pipeline();
        let empty = p.run_topic("Budget", Vec::new())?;
        assert!(empty.stories.is_empty());
        assert_eq!(empty.n_clusters, 0);
        assert!(empty.network.is_empty());

        let single = p.run_topic("Budget", same_title_at(&[0]))?;
        assert_eq!(single.n_clusters, 1);
        assert_eq!(single.stories[0].cluster_id, 0);
        assert!(single.network.is_empty());
        Ok(())
    }

    #[test]
    fn co_coverage_edge_from_shared_cluster() -> Result<()> {
        // A covers events {1, 2}, B covers {1, 3}, C covers {4}.
        let names = ["A", "A", "B", "B", "C"];
        let stories: Vec<Story> = names
            .iter()
            .enumerate()
            .map(|(i, m)| Story::new(i, "Results declared", day(0), *m))
            .collect();
        let assignment = ClusterAssignment::from_labels(vec![1, 2, 1, 3, 4]);

        let network = pipeline().build_network(&stories, &assignment)?;
        assert_eq!(network.graph.node_count(), 3);
        assert_eq!(network.edges().len(), 1);
        let (s, t, w) = network.edges()[0];
        assert_eq!((s, t), ("A", "B"));
        assert!((w - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(network.community_of("A"), network.community_of("B"));
        assert_ne!(network.community_of("A"), network.community_of("C"));
        Ok(())
    }

    #[test]
    fn sources_outside_top_k_are_dropped() -> Result<()> {
        let names = ["A", "A", "A", "B", "B", "C"];
        let stories: Vec<Story> = names
            .iter()
            .enumerate()
            .map(|(i, m)| Story::new(i, "Results declared", day(0), *m))
            .collect();
        let assignment = ClusterAssignment::from_labels(vec![0; 6]);

        let p = EventPipeline::new(
            constant_embedder(),
            PipelineConfig::default().with_top_k_sources(2),
        )?;
        let network = p.build_network(&stories, &assignment)?;
        assert_eq!(network.graph.node_count(), 2);
        assert_eq!(network.community_of("C"), None);
        assert_eq!(network.edges(), vec![("A", "B", 1.0)]);
        Ok(())
    }

    #[test]
    fn failing_partitioner_degrades_to_one_community() -> Result<()> {
        let stories = vec![
            Story::new(0, "Results declared", day(0), "A"),
            Story::new(1, "Results declared", day(0), "B"),
            Story::new(2, "Results declared", day(20), "C"),
        ];
        let p = pipeline().with_detector(Failing);
        let outcome = p.run_topic("Elections", stories)?;
        assert_eq!(outcome.network.graph.node_count(), 3);
        assert_eq!(outcome.network.communities, vec![0, 0, 0]);
        Ok(())
    }

    #[test]
    fn label_propagation_is_a_drop_in_detector() -> Result<()> {
        let stories = same_title_at(&[0, 0, 0]);
        let p = pipeline().with_detector(LabelPropagation::new().with_seed(3));
        let outcome = p.run_topic("Elections", stories)?;
        assert_eq!(outcome.network.communities.len(), 3);
        assert_eq!(outcome.network.n_communities(), 1);
        Ok(())
    }

    #[test]
    fn failed_topic_does_not_stop_the_run() {
        let p = pipeline();
        let bad = vec![Story::new(0, "Unembeddable", day(0), "A")];
        let outcomes = p.run_topics(vec![
            ("Budget", same_title_at(&[0, 1])),
            ("Military", bad),
            ("Foreign Policy", Vec::new()),
            ("Elections", same_title_at(&[0, 9])),
        ]);
        let topics: Vec<&str> = outcomes.iter().map(|o| o.topic.as_str()).collect();
        assert_eq!(topics, vec!["Budget", "Elections"]);
        assert_eq!(outcomes[1].n_clusters, 2);
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = PipelineConfig::default().with_jaccard_threshold(-0.5);
        assert!(EventPipeline::new(constant_embedder(), config).is_err());
    }

    #[test]
    fn hashing_embedder_end_to_end() -> Result<()> {
        let rows = [
            ("Lok Sabha phase one polling ends", 0, "Ledger"),
            ("Phase one polling ends for Lok Sabha", 0, "Herald"),
            ("Lok Sabha phase one polling ends peacefully", 1, "Courier"),
            ("Union budget raises capex target", 30, "Ledger"),
            ("Budget raises capex target, union finance minister says", 30, "Courier"),
        ];
        let stories: Vec<Story> = rows
            .iter()
            .enumerate()
            .map(|(i, (t, d, m))| Story::new(i, *t, day(*d), *m))
            .collect();

        let p = EventPipeline::new(HashingEmbedder::new(256)?, PipelineConfig::default())?;
        let outcome = p.run_topic("Elections", stories)?;
        let labels: Vec<usize> = outcome.stories.iter().map(|s| s.cluster_id).collect();
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[1], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_ne!(labels[0], labels[3]);

        let summary = TopicSummary::from_outcome(&outcome, 1.0);
        assert_eq!(summary.total_clusters, outcome.n_clusters);
        assert_eq!(summary.clusters[0].size, 3);
        Ok(())
    }

    proptest! {
        #[test]
        fn every_story_gets_exactly_one_cluster(
            rows in proptest::collection::vec((0usize..4, 0i64..15), 0..30),
        ) {
            let titles = ["alpha", "beta", "gamma", "delta"];
            let embedder = |batch: &[&str]| -> Result<Vec<Vec<f32>>> {
                Ok(batch
                    .iter()
                    .map(|t| {
                        let k = titles.iter().position(|x| x == t).unwrap_or(0);
                        let mut v = vec![0.1f32; 4];
                        v[k] = 1.0;
                        v
                    })
                    .collect())
            };
            let stories: Vec<Story> = rows
                .iter()
                .enumerate()
                .map(|(i, &(t, d))| Story::new(i, titles[t], day(d), "Wire"))
                .collect();

            let p = EventPipeline::new(embedder, PipelineConfig::default()).unwrap();
            let assignment = p.cluster_stories(&stories).unwrap();
            prop_assert_eq!(assignment.len(), stories.len());
            let total: usize = assignment.sizes().iter().sum();
            prop_assert_eq!(total, stories.len());
            prop_assert!(assignment.sizes().iter().all(|&s| s > 0));
        }
    }
}
