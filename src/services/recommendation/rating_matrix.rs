//! User/dish rating matrix built from explicit reviews and implicit
//! order signals.

use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

use crate::entities::{Order, Review};

/// Mean-centered ratings per user. `entries[user][dish]` holds the rating
/// minus that user's mean, so a positive value means "liked more than
/// usual for them".
#[derive(Debug, Default)]
pub struct RatingMatrix {
    pub entries: HashMap<Uuid, HashMap<Uuid, f64>>,
    pub means: HashMap<Uuid, f64>,
}

impl RatingMatrix {
    /// Explicit star ratings win; a completed order only contributes an
    /// implicit 1.0 for dishes the user never reviewed. Means are taken
    /// over the raw values before centering.
    pub fn build(reviews: &[Review], orders: &[Order]) -> Self {
        let mut raw: HashMap<Uuid, HashMap<Uuid, f64>> = HashMap::new();
        for review in reviews {
            raw.entry(review.user_id)
                .or_default()
                .insert(review.dish_id, review.rating as f64);
        }
        for order in orders {
            let user = raw.entry(order.user_id).or_default();
            for item in &order.items {
                user.entry(item.dish_id).or_insert(1.0);
            }
        }

        let mut entries = HashMap::with_capacity(raw.len());
        let mut means = HashMap::with_capacity(raw.len());
        for (user_id, ratings) in raw {
            let mean = ratings.values().sum::<f64>() / ratings.len() as f64;
            means.insert(user_id, mean);
            entries.insert(
                user_id,
                ratings.into_iter().map(|(d, r)| (d, r - mean)).collect(),
            );
        }
        debug!(users = entries.len(), "rating matrix built");
        Self { entries, means }
    }

    pub fn user(&self, user_id: Uuid) -> Option<&HashMap<Uuid, f64>> {
        self.entries.get(&user_id)
    }

    pub fn mean(&self, user_id: Uuid) -> f64 {
        self.means.get(&user_id).copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
