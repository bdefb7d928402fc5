//! Story records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single news story. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    /// Ordinal index within the topic batch.
    pub id: usize,
    /// Headline; may be empty.
    pub title: String,
    /// Publication timestamp.
    pub publish_date: DateTime<Utc>,
    /// Outlet that published the story.
    pub media_name: String,
}

impl Story {
    /// Create a story.
    pub fn new(
        id: usize,
        title: impl Into<String>,
        publish_date: DateTime<Utc>,
        media_name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            publish_date,
            media_name: media_name.into(),
        }
    }
}

/// A story together with the event cluster it was assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusteredStory {
    /// The original story.
    #[serde(flatten)]
    pub story: Story,
    /// Dense cluster id, only meaningful within one topic run.
    pub cluster_id: usize,
}

/// Whole days elapsed since the earliest timestamp in the batch.
///
/// Sub-day resolution is truncated: 23 hours after the earliest story is day 0.
pub fn day_indices(dates: &[DateTime<Utc>]) -> Vec<i64> {
    let Some(earliest) = dates.iter().min() else {
        return Vec::new();
    };
    dates
        .iter()
        .map(|d| (*d - *earliest).num_days())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_day_indices_truncate() {
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let dates = vec![
            base + chrono::Duration::hours(30),
            base,
            base + chrono::Duration::hours(23),
            base + chrono::Duration::days(10),
        ];
        assert_eq!(day_indices(&dates), vec![1, 0, 0, 10]);
    }

    #[test]
    fn test_day_indices_empty() {
        assert!(day_indices(&[]).is_empty());
    }

    #[test]
    fn test_clustered_story_serializes_flat() {
        let date = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let clustered = ClusteredStory {
            story: Story::new(0, "Budget tabled", date, "Daily Ledger"),
            cluster_id: 3,
        };
        let json = serde_json::to_value(&clustered).unwrap();
        assert_eq!(json["title"], "Budget tabled");
        assert_eq!(json["cluster_id"], 3);
        assert_eq!(json["media_name"], "Daily Ledger");
    }
}
