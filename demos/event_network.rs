use chrono::{Duration, TimeZone, Utc};
use storymesh::{EventPipeline, HashingEmbedder, PipelineConfig, Story, TopicSummary};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Minimal end-to-end: synthetic stories -> event clusters -> source network.
    //
    // The hashing embedder stands in for a sentence-embedding model; set
    // RUST_LOG=storymesh=debug to see per-stage sizes.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let start = Utc.with_ymd_and_hms(2024, 6, 1, 6, 0, 0).single().ok_or("bad start date")?;
    let rows: &[(&str, i64, &str)] = &[
        ("Counting begins for Lok Sabha polls", 3, "National Ledger"),
        ("Lok Sabha polls: counting begins across states", 3, "Morning Herald"),
        ("Counting of votes begins for Lok Sabha", 3, "City Courier"),
        ("Lok Sabha results: ruling alliance retains majority", 4, "National Ledger"),
        ("Ruling alliance retains majority in Lok Sabha results", 4, "Morning Herald"),
        ("Election commission announces bypoll schedule", 12, "City Courier"),
        ("Bypoll schedule announced by election commission", 12, "Valley Times"),
        ("Election commission announces bypoll schedule for six seats", 13, "National Ledger"),
        ("Turnout record in final phase", 0, "Valley Times"),
        ("Final phase sees record turnout", 0, "Morning Herald"),
    ];
    let stories: Vec<Story> = rows
        .iter()
        .enumerate()
        .map(|(i, (title, day, media))| Story::new(i, *title, start + Duration::days(*day), *media))
        .collect();

    let config = PipelineConfig::default().with_top_k_sources(10);
    let pipeline = EventPipeline::new(HashingEmbedder::new(256)?, config.clone())?;

    let outcomes = pipeline.run_topics([("Elections", stories), ("Budget", Vec::new())]);

    for outcome in &outcomes {
        let summary = TopicSummary::from_outcome(outcome, config.resolution);
        println!(
            "topic={} stories={} clusters={}",
            summary.topic, summary.total_stories, summary.total_clusters
        );
        for cluster in summary.top_clusters(5) {
            println!(
                "  cluster {} ({} stories, {} sources): {}",
                cluster.cluster_id,
                cluster.size,
                cluster.sources.len(),
                cluster.representative_title
            );
        }
        for (name, community) in outcome.network.community_map() {
            println!("  {name} -> community {community}");
        }
        println!("{}", summary.to_json_pretty()?);
    }

    Ok(())
}
