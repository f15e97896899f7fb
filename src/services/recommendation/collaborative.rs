//! User-based collaborative filtering over the centered rating matrix.

use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

use super::rating_matrix::RatingMatrix;

/// Predicts ratings for dishes the target user has not rated, as a
/// similarity-weighted average of other users' centered ratings added
/// back onto the target's mean.
#[derive(Debug, Clone, Copy)]
pub struct CollaborativePredictor {
    /// Shrinkage constant: similarities built on `o` shared dishes get
    /// damped by `o / (o + shrinkage)`.
    shrinkage: f64,
}

impl CollaborativePredictor {
    pub fn new(shrinkage: f64) -> Self {
        Self { shrinkage }
    }

    pub fn predict(&self, user_id: Uuid, matrix: &RatingMatrix) -> HashMap<Uuid, f64> {
        let empty = HashMap::new();
        let target = matrix.user(user_id).unwrap_or(&empty);
        let target_mean = matrix.mean(user_id);

        let mut score_sums: HashMap<Uuid, f64> = HashMap::new();
        let mut similarity_sums: HashMap<Uuid, f64> = HashMap::new();
        for (other_id, other) in &matrix.entries {
            if *other_id == user_id {
                continue;
            }
            let overlap = target.keys().filter(|d| other.contains_key(d)).count();
            if overlap == 0 {
                continue;
            }
            let sim = cosine_similarity(target, other) * overlap as f64
                / (overlap as f64 + self.shrinkage);
            if sim <= 0.0 {
                continue;
            }
            for (dish_id, rating) in other {
                if target.contains_key(dish_id) {
                    continue;
                }
                *score_sums.entry(*dish_id).or_insert(0.0) += sim * rating;
                *similarity_sums.entry(*dish_id).or_insert(0.0) += sim;
            }
        }

        let predictions: HashMap<Uuid, f64> = score_sums
            .into_iter()
            .map(|(dish_id, score)| {
                let norm = similarity_sums.get(&dish_id).copied().unwrap_or(1.0);
                (dish_id, target_mean + score / norm)
            })
            .collect();
        debug!(
            user = %user_id,
            dishes = predictions.len(),
            "collaborative predictions computed"
        );
        predictions
    }
}

/// Cosine similarity restricted to the dishes present in both vectors for
/// the dot product, with norms over each full vector.
fn cosine_similarity(a: &HashMap<Uuid, f64>, b: &HashMap<Uuid, f64>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    for (dish, ra) in a {
        norm_a += ra * ra;
        if let Some(rb) = b.get(dish) {
            dot += ra * rb;
        }
    }
    let norm_b: f64 = b.values().map(|rb| rb * rb).sum();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
