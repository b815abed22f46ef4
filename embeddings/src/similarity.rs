//! Similarity computation and norm handling for embeddings.

use serde::{Deserialize, Serialize};

use crate::error::{EmbeddingError, Result};
use crate::{Embedding, NORM_TOLERANCE};

/// Compute the dot product of two embeddings.
///
/// When both vectors are unit-normalized this equals their cosine
/// similarity, bounded in [-1.0, 1.0].
pub fn dot(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    Ok(a.iter().zip(b.iter()).map(|(x, y)| x * y).sum())
}

/// Compute the cosine similarity between two embeddings.
///
/// Divides out both magnitudes, so the inputs do not have to be
/// normalized. A zero-magnitude input scores 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    let dot_product = dot(a, b)?;
    let magnitude_a = l2_norm(a);
    let magnitude_b = l2_norm(b);

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return Ok(0.0);
    }

    Ok(dot_product / (magnitude_a * magnitude_b))
}

/// Euclidean norm of a vector.
pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Whether a vector's norm is within [`NORM_TOLERANCE`] of 1.0.
pub fn is_normalized(v: &[f32]) -> bool {
    (l2_norm(v) - 1.0).abs() <= NORM_TOLERANCE
}

/// Rescale an embedding to unit length. Zero vectors are left unchanged.
pub fn normalize(embedding: &mut Embedding) {
    let magnitude = l2_norm(embedding);
    if magnitude > 0.0 {
        for x in embedding.iter_mut() {
            *x /= magnitude;
        }
    }
}

/// What to do with a vector that violates the unit-norm invariant.
///
/// Every ranking downstream assumes dot product == cosine similarity,
/// which only holds for unit vectors; a denormalized vector corrupts
/// every score it touches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormPolicy {
    /// Reject the vector with [`EmbeddingError::Unnormalized`].
    #[default]
    Strict,

    /// Rescale the vector to unit length and continue.
    Renormalize,
}

/// Enforce the unit-norm invariant on a vector according to `policy`.
pub fn enforce_norm(vector: &mut Embedding, policy: NormPolicy) -> Result<()> {
    if is_normalized(vector) {
        return Ok(());
    }

    match policy {
        NormPolicy::Strict => Err(EmbeddingError::Unnormalized {
            norm: l2_norm(vector),
        }),
        NormPolicy::Renormalize => {
            let norm = l2_norm(vector);
            normalize(vector);
            tracing::warn!("Renormalized vector with norm {norm}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dot_identical() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        let score = dot(&a, &b).unwrap();
        assert!((score - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_dot_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        let score = dot(&a, &b).unwrap();
        assert!(score.abs() < 1e-6);
    }

    #[test]
    fn test_dot_opposite() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![-1.0, 0.0, 0.0];
        let score = dot(&a, &b).unwrap();
        assert!((score + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_dot_dimension_mismatch() {
        let a = vec![1.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!(matches!(
            dot(&a, &b),
            Err(EmbeddingError::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_dot_equals_cosine_for_unit_vectors() {
        let mut a = vec![3.0, 4.0, 0.0];
        let mut b = vec![0.5, 0.5, 0.7];
        normalize(&mut a);
        normalize(&mut b);

        let d = dot(&a, &b).unwrap();
        let c = cosine_similarity(&a, &b).unwrap();
        assert!((d - c).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_vector() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 0.0];
        assert_eq!(cosine_similarity(&a, &b).unwrap(), 0.0);
    }

    #[test]
    fn test_normalize() {
        let mut v = vec![3.0, 4.0];
        normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
        assert!(is_normalized(&v));
    }

    #[test]
    fn test_is_normalized_tolerance() {
        // 1e-3 tolerance: norm 1.0005 passes, norm 1.01 does not.
        assert!(is_normalized(&[1.0005, 0.0]));
        assert!(!is_normalized(&[1.01, 0.0]));
    }

    #[test]
    fn test_enforce_norm_strict_rejects() {
        let mut v = vec![2.0, 0.0];
        let err = enforce_norm(&mut v, NormPolicy::Strict).unwrap_err();
        assert!(matches!(err, EmbeddingError::Unnormalized { norm } if (norm - 2.0).abs() < 1e-6));
        // Vector untouched on rejection.
        assert_eq!(v, vec![2.0, 0.0]);
    }

    #[test]
    fn test_enforce_norm_renormalizes() {
        let mut v = vec![2.0, 0.0];
        enforce_norm(&mut v, NormPolicy::Renormalize).unwrap();
        assert_eq!(v, vec![1.0, 0.0]);
    }

    #[test]
    fn test_enforce_norm_accepts_unit_vector() {
        let mut v = vec![0.0, 1.0];
        enforce_norm(&mut v, NormPolicy::Strict).unwrap();
        assert_eq!(v, vec![0.0, 1.0]);
    }
}
