//! Content × time distance matrix.
//!
//! Two stories cover the same event when their titles say similar things
//! *and* they were published close together. The builder folds both signals
//! into one dissimilarity:
//!
//! ```text
//! S_c(i,j)   = clamp(cos(e_i, e_j), 0, 1)
//! decay(i,j) = exp(-α × |day_i - day_j|)
//! D(i,j)     = clamp(1 - S_c(i,j) × decay(i,j), 0, 1)
//! ```
//!
//! Negative cosine is clamped to 0. Anti-correlated titles count as
//! "unrelated", not as "more distant than unrelated".
//!
//! With α = 0.15 two identical titles fall below similarity 0.5 once they are
//! more than `ln 2 / α ≈ 4.62` days apart. That is the event window.
//!
//! # Precision
//!
//! Every entry is computed in `f64` in the order above and rounded to `f32`
//! once, for storage. The matrix is N×N so storage dominates memory; the
//! clustering step widens back to `f64` for its own arithmetic.

use crate::error::{Error, Result};
use crate::story::day_indices;
use chrono::{DateTime, Utc};
use ndarray::Array2;

/// Symmetric N×N story distance matrix with a zero diagonal and entries in [0, 1].
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Array2<f32>,
}

/// Check that every embedding has the same dimension and only finite components.
pub(crate) fn check_embeddings(embeddings: &[Vec<f32>]) -> Result<()> {
    let Some(first) = embeddings.first() else {
        return Ok(());
    };
    let d = first.len();
    if let Some(bad) = embeddings.iter().find(|e| e.len() != d) {
        return Err(Error::DimensionMismatch {
            expected: d,
            found: bad.len(),
        });
    }
    if embeddings.iter().flatten().any(|x| !x.is_finite()) {
        return Err(Error::Embedding("non-finite component in embedding".into()));
    }
    Ok(())
}

impl DistanceMatrix {
    /// Build the matrix from per-story embeddings and publish dates.
    ///
    /// `embeddings` and `dates` are parallel. An empty batch yields a 0×0 matrix.
    pub fn build(
        embeddings: &[Vec<f32>],
        dates: &[DateTime<Utc>],
        decay_rate: f64,
    ) -> Result<Self> {
        if embeddings.len() != dates.len() {
            return Err(Error::LengthMismatch {
                what: "publish dates",
                expected: embeddings.len(),
                found: dates.len(),
            });
        }
        if !decay_rate.is_finite() || decay_rate < 0.0 {
            return Err(Error::InvalidParameter {
                name: "decay_rate",
                message: "must be finite and non-negative",
            });
        }

        check_embeddings(embeddings)?;
        let n = embeddings.len();

        let days = day_indices(dates);
        let norms: Vec<f64> = embeddings.iter().map(|e| norm(e)).collect();

        let mut data = Array2::<f32>::zeros((n, n));
        for i in 0..n {
            for j in (i + 1)..n {
                let content = clamp_unit(cosine_with_norms(
                    &embeddings[i],
                    &embeddings[j],
                    norms[i],
                    norms[j],
                ));
                let gap = (days[i] - days[j]).unsigned_abs();
                let sim = content * temporal_decay(gap, decay_rate);
                let dist = clamp_unit(1.0 - sim) as f32;
                data[[i, j]] = dist;
                data[[j, i]] = dist;
            }
        }

        Ok(Self { data })
    }

    /// Wrap an existing square matrix, checking the distance invariants.
    pub fn from_array(data: Array2<f32>) -> Result<Self> {
        let (rows, cols) = data.dim();
        if rows != cols {
            return Err(Error::DimensionMismatch {
                expected: rows,
                found: cols,
            });
        }
        for i in 0..rows {
            if data[[i, i]] != 0.0 {
                return Err(Error::InvalidParameter {
                    name: "distance matrix",
                    message: "diagonal must be zero",
                });
            }
            for j in (i + 1)..rows {
                let d = data[[i, j]];
                if d != data[[j, i]] {
                    return Err(Error::InvalidParameter {
                        name: "distance matrix",
                        message: "must be symmetric",
                    });
                }
                if !(0.0..=1.0).contains(&d) {
                    return Err(Error::InvalidParameter {
                        name: "distance matrix",
                        message: "entries must be in [0, 1]",
                    });
                }
            }
        }
        Ok(Self { data })
    }

    /// Number of stories.
    pub fn len(&self) -> usize {
        self.data.nrows()
    }

    /// True for a 0×0 matrix.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Distance between stories `i` and `j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.data[[i, j]]
    }

    /// Borrow the underlying array.
    pub fn as_array(&self) -> &Array2<f32> {
        &self.data
    }

    /// Upper triangle, row-major, widened to `f64`. Length is N-choose-2.
    pub fn condensed(&self) -> Vec<f64> {
        let n = self.len();
        let mut out = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                out.push(self.data[[i, j]] as f64);
            }
        }
        out
    }
}

/// Cosine similarity, with a zero vector similar to nothing.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    cosine_with_norms(a, b, norm(a), norm(b))
}

/// Content similarity as used by the builder: cosine clamped to [0, 1].
pub fn content_similarity(a: &[f32], b: &[f32]) -> f64 {
    clamp_unit(cosine_similarity(a, b))
}

/// `exp(-rate × days)`.
#[inline]
pub fn temporal_decay(days: u64, rate: f64) -> f64 {
    (-rate * days as f64).exp()
}

#[inline]
fn norm(v: &[f32]) -> f64 {
    v.iter().map(|&x| (x as f64) * (x as f64)).sum::<f64>().sqrt()
}

#[inline]
fn cosine_with_norms(a: &[f32], b: &[f32], na: f64, nb: f64) -> f64 {
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    let dot: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(&x, &y)| x as f64 * y as f64)
        .sum();
    dot / (na * nb)
}

#[inline]
fn clamp_unit(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use proptest::prelude::*;

    fn day(offset: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap() + Duration::days(offset)
    }

    #[test]
    fn test_non_finite_components_rejected() {
        for bad in [f32::INFINITY, f32::NEG_INFINITY, f32::NAN] {
            let e = vec![vec![bad, 0.0], vec![1.0, 0.0]];
            let err = DistanceMatrix::build(&e, &[day(0), day(0)], 0.15).unwrap_err();
            assert!(matches!(err, Error::Embedding(_)), "{bad}: {err:?}");
        }
    }

    #[test]
    fn test_identical_same_day_is_zero() {
        let e = vec![vec![0.6, 0.8], vec![0.6, 0.8]];
        let m = DistanceMatrix::build(&e, &[day(0), day(0)], 0.15).unwrap();
        assert_eq!(m.get(0, 1), 0.0);
        assert_eq!(m.get(1, 0), 0.0);
    }

    #[test]
    fn test_negative_cosine_is_clamped() {
        let e = vec![vec![1.0, 0.0], vec![-1.0, 0.0]];
        assert_eq!(content_similarity(&e[0], &e[1]), 0.0);
        let m = DistanceMatrix::build(&e, &[day(0), day(0)], 0.15).unwrap();
        assert_eq!(m.get(0, 1), 1.0);
    }

    #[test]
    fn test_decay_law() {
        let e = vec![vec![1.0, 0.0], vec![1.0, 1.0]];
        let c = content_similarity(&e[0], &e[1]);
        let mut prev = f64::INFINITY;
        for gap in 0..12 {
            let m = DistanceMatrix::build(&e, &[day(0), day(gap)], 0.15).unwrap();
            let sim = 1.0 - m.get(0, 1) as f64;
            let expected = c * (-0.15 * gap as f64).exp();
            assert!((sim - expected).abs() < 1e-6, "gap {gap}: {sim} vs {expected}");
            assert!(sim < prev);
            prev = sim;
        }
    }

    #[test]
    fn test_event_window_boundary() {
        let e = vec![vec![1.0, 0.0], vec![1.0, 0.0]];
        let four = DistanceMatrix::build(&e, &[day(0), day(4)], 0.15).unwrap();
        let five = DistanceMatrix::build(&e, &[day(0), day(5)], 0.15).unwrap();
        assert!(four.get(0, 1) < 0.5);
        assert!(five.get(0, 1) > 0.5);
    }

    #[test]
    fn test_zero_vector_diagonal_stays_zero() {
        let e = vec![vec![0.0, 0.0], vec![1.0, 0.0]];
        let m = DistanceMatrix::build(&e, &[day(0), day(0)], 0.15).unwrap();
        assert_eq!(m.get(0, 0), 0.0);
        assert_eq!(m.get(0, 1), 1.0);
    }

    #[test]
    fn test_empty_batch() {
        let m = DistanceMatrix::build(&[], &[], 0.15).unwrap();
        assert!(m.is_empty());
        assert!(m.condensed().is_empty());
    }

    #[test]
    fn test_mismatched_inputs() {
        let e = vec![vec![1.0, 0.0], vec![1.0]];
        assert!(matches!(
            DistanceMatrix::build(&e, &[day(0), day(0)], 0.15),
            Err(Error::DimensionMismatch { .. })
        ));
        assert!(matches!(
            DistanceMatrix::build(&e[..1], &[day(0), day(0)], 0.15),
            Err(Error::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_from_array_rejects_asymmetry() {
        let a = ndarray::array![[0.0f32, 0.2], [0.3, 0.0]];
        assert!(DistanceMatrix::from_array(a).is_err());
        let ok = ndarray::array![[0.0f32, 0.2], [0.2, 0.0]];
        assert_eq!(DistanceMatrix::from_array(ok).unwrap().condensed(), vec![0.2f32 as f64]);
    }

    proptest! {
        #[test]
        fn matrix_is_symmetric_with_zero_diagonal_and_unit_range(
            rows in proptest::collection::vec(
                (proptest::collection::vec(-1.0f32..1.0, 4), 0i64..30),
                0..24,
            ),
        ) {
            let embeddings: Vec<Vec<f32>> = rows.iter().map(|(e, _)| e.clone()).collect();
            let dates: Vec<DateTime<Utc>> = rows.iter().map(|(_, d)| day(*d)).collect();
            let m = DistanceMatrix::build(&embeddings, &dates, 0.15).unwrap();
            for i in 0..m.len() {
                prop_assert_eq!(m.get(i, i), 0.0);
                for j in 0..m.len() {
                    prop_assert_eq!(m.get(i, j), m.get(j, i));
                    prop_assert!((0.0..=1.0).contains(&m.get(i, j)));
                }
            }
        }
    }
}
