//! Vector math over embeddings.
//!
//! Accumulation happens in `f64` so that long (1536-dim) vectors don't drift;
//! the public surface stays `f32` like the rest of the crate.

use serde::{Deserialize, Serialize};

use crate::SemanticError;

/// Cosine similarity between two equal-length vectors.
///
/// Returns `0.0` when either vector has zero norm. Vectors of unequal length
/// are rejected with [`SemanticError::DimensionMismatch`]; nothing is
/// truncated or padded.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, SemanticError> {
    if a.len() != b.len() {
        return Err(SemanticError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let mut dot = 0f64;
    let mut norm_a = 0f64;
    let mut norm_b = 0f64;
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    Ok((dot / (norm_a.sqrt() * norm_b.sqrt())) as f32)
}

/// In-place L2 normalization. Zero vectors are left untouched.
pub(crate) fn l2_normalize_in_place(v: &mut [f32]) {
    let norm_sq: f32 = v.iter().map(|x| x * x).sum();
    if norm_sq > 0.0 {
        let inv_norm = norm_sq.sqrt().recip();
        v.iter_mut().for_each(|x| *x *= inv_norm);
    }
}

/// One candidate's similarity to an ideal-customer embedding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedProfile {
    pub id: String,
    pub score: f32,
}

/// Score every candidate embedding against `ideal` and sort best-first.
///
/// Fails on the first candidate whose dimension differs from `ideal`.
pub fn rank_profiles<'a, I>(profiles: I, ideal: &[f32]) -> Result<Vec<RankedProfile>, SemanticError>
where
    I: IntoIterator<Item = (&'a str, &'a [f32])>,
{
    let mut ranked = profiles
        .into_iter()
        .map(|(id, embedding)| {
            cosine_similarity(embedding, ideal).map(|score| RankedProfile {
                id: id.to_owned(),
                score,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    Ok(ranked)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-6;

    #[test]
    fn cosine_is_symmetric() {
        let a = [0.3f32, -1.2, 4.0, 0.5];
        let b = [1.0f32, 0.25, -0.7, 2.0];
        let ab = cosine_similarity(&a, &b).unwrap();
        let ba = cosine_similarity(&b, &a).unwrap();
        assert_eq!(ab, ba);
    }

    #[test]
    fn cosine_of_vector_with_itself_is_one() {
        let a: Vec<f32> = (1..=1536).map(|i| (i as f32 * 0.37).sin()).collect();
        let s = cosine_similarity(&a, &a).unwrap();
        assert!((s - 1.0).abs() < EPS, "got {s}");
    }

    #[test]
    fn zero_vector_yields_zero() {
        let z = [0.0f32; 4];
        let b = [1.0f32, 2.0, 3.0, 4.0];
        assert_eq!(cosine_similarity(&z, &b).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&b, &z).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&z, &z).unwrap(), 0.0);
    }

    #[test]
    fn unequal_lengths_are_rejected() {
        let err = cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(err, SemanticError::DimensionMismatch { left: 2, right: 3 });
    }

    #[test]
    fn empty_vectors_have_zero_similarity() {
        assert_eq!(cosine_similarity(&[], &[]).unwrap(), 0.0);
    }

    #[test]
    fn orthogonal_and_opposite_vectors() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap().abs() < EPS);
        let s = cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]).unwrap();
        assert!((s + 1.0).abs() < EPS);
    }

    #[test]
    fn known_angle() {
        // [0.82, sqrt(1 - 0.82^2)] against the x axis.
        let y = (1.0f32 - 0.82 * 0.82).sqrt();
        let s = cosine_similarity(&[0.82, y], &[1.0, 0.0]).unwrap();
        assert!((s - 0.82).abs() < 1e-5);
    }

    #[test]
    fn normalize_gives_unit_length_and_skips_zero() {
        let mut v = vec![3.0f32, 4.0];
        l2_normalize_in_place(&mut v);
        assert!((v[0] - 0.6).abs() < EPS);
        assert!((v[1] - 0.8).abs() < EPS);

        let mut z = vec![0.0f32; 3];
        l2_normalize_in_place(&mut z);
        assert_eq!(z, vec![0.0; 3]);
    }

    #[test]
    fn rank_profiles_sorts_best_first() {
        let ideal = [1.0f32, 0.0];
        let close = [0.9f32, 0.1];
        let far = [0.1f32, 0.9];
        let middle = [0.5f32, 0.5];
        let ranked = rank_profiles(
            [
                ("far", &far[..]),
                ("close", &close[..]),
                ("middle", &middle[..]),
            ],
            &ideal,
        )
        .unwrap();

        let ids: Vec<&str> = ranked.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["close", "middle", "far"]);
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn rank_profiles_propagates_dimension_mismatch() {
        let ideal = [1.0f32, 0.0];
        let bad = [1.0f32, 0.0, 0.0];
        let err = rank_profiles([("bad", &bad[..])], &ideal).unwrap_err();
        assert!(matches!(err, SemanticError::DimensionMismatch { .. }));
    }
}
