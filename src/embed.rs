//! Title embedding.
//!
//! The pipeline never owns a model. Callers inject anything implementing
//! [`Embedder`], which keeps the clustering core testable with fixed vectors.
//! Closures of the right shape implement the trait directly:
//!
//! ```rust
//! use storymesh::embed::Embedder;
//!
//! let fixed = |titles: &[&str]| -> storymesh::Result<Vec<Vec<f32>>> {
//!     Ok(titles.iter().map(|_| vec![1.0, 0.0]).collect())
//! };
//! assert_eq!(fixed.embed(&["a", "b"]).unwrap().len(), 2);
//! ```

use crate::error::{Error, Result};
use crate::similarity::check_embeddings;

/// Maps titles to fixed-dimension vectors.
///
/// Implementations must return exactly one vector per title, in input order,
/// all of the same dimension, and must be deterministic for a fixed model.
pub trait Embedder {
    /// Embed a batch of titles.
    fn embed(&self, titles: &[&str]) -> Result<Vec<Vec<f32>>>;
}

impl<F> Embedder for F
where
    F: Fn(&[&str]) -> Result<Vec<Vec<f32>>>,
{
    fn embed(&self, titles: &[&str]) -> Result<Vec<Vec<f32>>> {
        self(titles)
    }
}

/// Check an embedder's output against its input before it reaches the matrix builder.
pub(crate) fn checked_embed<E: Embedder + ?Sized>(
    embedder: &E,
    titles: &[&str],
) -> Result<Vec<Vec<f32>>> {
    let vectors = embedder.embed(titles)?;
    if vectors.len() != titles.len() {
        return Err(Error::LengthMismatch {
            what: "embeddings",
            expected: titles.len(),
            found: vectors.len(),
        });
    }
    check_embeddings(&vectors)?;
    Ok(vectors)
}

/// Feature-hashing bag-of-words embedder.
///
/// Lowercases, splits on anything that is not alphanumeric, hashes each token
/// with FNV-1a into `dim` buckets, then L2-normalizes. Titles with no tokens
/// map to the zero vector. Deterministic across runs and platforms.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dim: usize,
}

impl HashingEmbedder {
    /// Create an embedder producing `dim`-dimensional vectors.
    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(Error::InvalidParameter {
                name: "dim",
                message: "must be at least 1",
            });
        }
        Ok(Self { dim })
    }

    /// Output dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    fn embed_one(&self, title: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.dim];
        for token in title
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
        {
            let bucket = (fnv1a(&token.to_lowercase()) % self.dim as u64) as usize;
            v[bucket] += 1.0;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            v.iter_mut().for_each(|x| *x /= norm);
        }
        v
    }
}

impl Embedder for HashingEmbedder {
    fn embed(&self, titles: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(titles.iter().map(|t| self.embed_one(t)).collect())
    }
}

fn fnv1a(s: &str) -> u64 {
    s.bytes().fold(0xcbf2_9ce4_8422_2325_u64, |h, b| {
        (h ^ b as u64).wrapping_mul(0x0000_0100_0000_01b3)
    })
}
