//! Distance metrics for vector comparison

use serde::{Deserialize, Serialize};

/// Distance metric used to build and query an index
///
/// The metric is fixed at build time and persisted with the index, so
/// queries are always scored the same way the index was built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Cosine similarity (default for text embeddings)
    #[default]
    Cosine,
    /// Euclidean (L2) distance
    Euclidean,
}

impl DistanceMetric {
    /// Score a candidate vector against a query vector
    ///
    /// Higher is closer under both metrics: cosine returns the similarity
    /// directly, Euclidean returns the negated distance.
    pub fn score(&self, query: &[f32], candidate: &[f32]) -> f32 {
        match self {
            Self::Cosine => cosine_similarity(query, candidate),
            Self::Euclidean => -euclidean_distance(query, candidate),
        }
    }
}

/// Cosine similarity between two vectors
///
/// Returns 0.0 when either vector has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Euclidean (L2) distance between two vectors
pub fn euclidean_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}
