//! Cosine similarity and top-k ranking.
//!
//! Sums are accumulated in `f64` and the final score narrowed to `f32`, so
//! identical inputs always give bit-identical scores.

use std::cmp::Ordering;

/// Dot product of two vectors (extra components of the longer one are ignored).
#[inline]
pub fn dot_product(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| f64::from(*x) * f64::from(*y))
        .sum()
}

/// L2 norm (magnitude) of a vector.
#[inline]
pub fn l2_norm(v: &[f32]) -> f64 {
    v.iter().map(|x| f64::from(*x) * f64::from(*x)).sum::<f64>().sqrt()
}

/// Cosine similarity, in `[-1, 1]`.
///
/// Defined as 0 when either vector has zero norm.
#[inline]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot_product(a, b) / (norm_a * norm_b)) as f32
}

/// Rank `candidates` against `query`.
///
/// Returns `(index, score)` pairs with `score >= min_score`, sorted by score
/// descending, at most `top_k` long. Equal scores keep candidate order.
/// NaN scores never pass the floor.
pub fn rank<V: AsRef<[f32]>>(
    query: &[f32],
    candidates: &[V],
    top_k: usize,
    min_score: f32,
) -> Vec<(usize, f32)> {
    if top_k == 0 {
        return Vec::new();
    }

    let mut scored: Vec<(usize, f32)> = candidates
        .iter()
        .enumerate()
        .map(|(idx, v)| (idx, cosine_similarity(query, v.as_ref())))
        .filter(|(_, score)| *score >= min_score)
        .collect();

    // `sort_by` is stable: ties stay in catalog order.
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.truncate(top_k);
    scored
}
