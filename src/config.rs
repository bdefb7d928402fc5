//! Pipeline configuration.
//!
//! Every threshold the pipeline uses lives here. The defaults reproduce the
//! reference behavior:
//!
//! | Field | Default | Effect |
//! |-------|---------|--------|
//! | `decay_rate` | 0.15 | similarity halves every `ln 2 / 0.15 ≈ 4.62` days |
//! | `distance_threshold` | 0.5 | average-linkage cut height |
//! | `top_k_sources` | 20 | outlets kept in the co-coverage graph |
//! | `jaccard_threshold` | 0.1 | edge iff Jaccard is strictly greater |
//! | `resolution` | 1.0 | Louvain γ |
//!
//! ```rust
//! use storymesh::PipelineConfig;
//!
//! let config = PipelineConfig::from_json(r#"{ "top_k_sources": 10 }"#).unwrap();
//! assert_eq!(config.top_k_sources, 10);
//! assert_eq!(config.distance_threshold, 0.5);
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default temporal decay rate (per day).
pub const DEFAULT_DECAY_RATE: f64 = 0.15;
/// Default average-linkage distance threshold.
pub const DEFAULT_DISTANCE_THRESHOLD: f64 = 0.5;
/// Default number of sources kept in the co-coverage graph.
pub const DEFAULT_TOP_K_SOURCES: usize = 20;
/// Default Jaccard edge threshold (exclusive).
pub const DEFAULT_JACCARD_THRESHOLD: f64 = 0.1;

/// Tunable constants for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// ALPHA in `exp(-ALPHA * Δdays)`.
    pub decay_rate: f64,
    /// Clusters merge while their average linkage is `<=` this value.
    pub distance_threshold: f64,
    /// Number of sources (by story count) kept in the graph.
    pub top_k_sources: usize,
    /// Source pairs need a Jaccard strictly above this to get an edge.
    pub jaccard_threshold: f64,
    /// Louvain resolution parameter.
    pub resolution: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            decay_rate: DEFAULT_DECAY_RATE,
            distance_threshold: DEFAULT_DISTANCE_THRESHOLD,
            top_k_sources: DEFAULT_TOP_K_SOURCES,
            jaccard_threshold: DEFAULT_JACCARD_THRESHOLD,
            resolution: 1.0,
        }
    }
}

impl PipelineConfig {
    /// Create a configuration with the default constants.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) JSON document; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the temporal decay rate.
    pub fn with_decay_rate(mut self, decay_rate: f64) -> Self {
        self.decay_rate = decay_rate;
        self
    }

    /// Set the clustering distance threshold.
    pub fn with_distance_threshold(mut self, threshold: f64) -> Self {
        self.distance_threshold = threshold;
        self
    }

    /// Set how many sources enter the co-coverage graph.
    pub fn with_top_k_sources(mut self, k: usize) -> Self {
        self.top_k_sources = k;
        self
    }

    /// Set the Jaccard edge threshold.
    pub fn with_jaccard_threshold(mut self, threshold: f64) -> Self {
        self.jaccard_threshold = threshold;
        self
    }

    /// Set the Louvain resolution.
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    /// Check every field is in its admissible range.
    pub fn validate(&self) -> Result<()> {
        if !self.decay_rate.is_finite() || self.decay_rate < 0.0 {
            return Err(Error::InvalidParameter {
                name: "decay_rate",
                message: "must be finite and non-negative",
            });
        }
        if !(0.0..=1.0).contains(&self.distance_threshold) {
            return Err(Error::InvalidParameter {
                name: "distance_threshold",
                message: "must be in [0, 1]",
            });
        }
        if self.top_k_sources == 0 {
            return Err(Error::InvalidParameter {
                name: "top_k_sources",
                message: "must be at least 1",
            });
        }
        if !(0.0..1.0).contains(&self.jaccard_threshold) {
            return Err(Error::InvalidParameter {
                name: "jaccard_threshold",
                message: "must be in [0, 1)",
            });
        }
        if !(self.resolution.is_finite() && self.resolution > 0.0) {
            return Err(Error::InvalidParameter {
                name: "resolution",
                message: "must be finite and positive",
            });
        }
        Ok(())
    }
}
