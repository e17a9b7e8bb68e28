use crate::models::{ProfileVector, UserProfile, UserSimilarity};

/// Largest possible distance between two valid profiles: sqrt(5 * 100^2)
pub const MAX_DISTANCE: f64 = 223.606_797_749_978_97;

/// Euclidean distance across the five axes
#[inline]
pub fn euclidean_distance(a: &ProfileVector, b: &ProfileVector) -> f64 {
    a.to_array()
        .iter()
        .zip(b.to_array().iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Similarity percentage (0-100) between two profiles
///
/// similarity = (1 - distance / MAX_DISTANCE) * 100
///
/// Symmetric, and 100 exactly when both vectors are identical.
#[inline]
pub fn similarity(a: &ProfileVector, b: &ProfileVector) -> f64 {
    let distance = euclidean_distance(a, b);
    ((1.0 - distance / MAX_DISTANCE) * 100.0).clamp(0.0, 100.0)
}

/// Rank candidates by similarity to `reference`
///
/// Keeps candidates at or above `threshold`, excluding the reference user, sorted by
/// descending similarity. The sort is stable so equal scores keep candidate order.
pub fn rank_similar(
    reference: &UserProfile,
    candidates: &[UserProfile],
    threshold: f64,
    limit: usize,
) -> Vec<UserSimilarity> {
    let mut ranked: Vec<UserSimilarity> = candidates
        .iter()
        .filter(|candidate| candidate.user_id != reference.user_id)
        .map(|candidate| UserSimilarity {
            user_id: candidate.user_id,
            similarity: similarity(&reference.scores, &candidate.scores),
        })
        .filter(|s| s.similarity >= threshold)
        .collect();

    ranked.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    ranked.truncate(limit);
    ranked
}
