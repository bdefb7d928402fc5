//! Event clustering.
//!
//! Groups stories into events by agglomerative clustering over the
//! content × time [`DistanceMatrix`](crate::similarity::DistanceMatrix).
//!
//! ## Linkage
//!
//! | Linkage | Distance | Effect |
//! |---------|----------|--------|
//! | Single | min(pairwise) | Chaining; one bridging story joins two events |
//! | Complete | max(pairwise) | Compact, but one outlier splits an event |
//! | Average | mean(pairwise) | Balanced compromise |
//!
//! Only average linkage is provided. Single linkage would let a daily
//! follow-up chain an event across weeks, which defeats the temporal decay.
//!
//! ## Usage
//!
//! ```rust
//! use storymesh::cluster::AverageLinkage;
//! use storymesh::similarity::DistanceMatrix;
//! use ndarray::array;
//!
//! let d = DistanceMatrix::from_array(array![
//!     [0.0f32, 0.1, 0.9],
//!     [0.1, 0.0, 0.8],
//!     [0.9, 0.8, 0.0],
//! ]).unwrap();
//!
//! let clusters = AverageLinkage::new(0.5).fit(&d).unwrap();
//! assert_eq!(clusters.labels(), &[0, 0, 1]);
//! ```

mod assignment;
mod dendrogram;
mod hierarchical;

pub use assignment::ClusterAssignment;
pub use dendrogram::{Dendrogram, Merge};
pub use hierarchical::AverageLinkage;
