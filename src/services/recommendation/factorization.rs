//! Matrix factorization over explicit and implicit feedback, trained
//! lazily on first use.

use std::collections::HashMap;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::RecommendationConfig;
use crate::entities::{Order, Review};

/// Immutable trained factors. Readers share a snapshot; retraining swaps
/// in a fresh one.
#[derive(Debug, Default)]
pub struct FactorModel {
    user_factors: HashMap<Uuid, Vec<f64>>,
    item_factors: HashMap<Uuid, Vec<f64>>,
}

impl FactorModel {
    /// Dot product of the user and dish factor vectors, or 0.0 when
    /// either side was unseen during training.
    pub fn predict(&self, user_id: Uuid, dish_id: Uuid) -> f64 {
        match (self.user_factors.get(&user_id), self.item_factors.get(&dish_id)) {
            (Some(u), Some(i)) => u.iter().zip(i).map(|(a, b)| a * b).sum(),
            _ => 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.user_factors.is_empty() || self.item_factors.is_empty()
    }
}

struct Interaction {
    user_id: Uuid,
    dish_id: Uuid,
    rating: f64,
}

/// SGD training: reviews contribute their star rating, completed orders an
/// implicit 1.0 per dish. Factors start near zero from a seeded RNG and
/// the interaction order is reshuffled every epoch.
pub fn train(reviews: &[Review], orders: &[Order], config: &RecommendationConfig) -> FactorModel {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut user_factors: HashMap<Uuid, Vec<f64>> = HashMap::new();
    let mut item_factors: HashMap<Uuid, Vec<f64>> = HashMap::new();
    let mut interactions = Vec::with_capacity(reviews.len() + orders.len());

    for review in reviews {
        user_factors
            .entry(review.user_id)
            .or_insert_with(|| random_vector(&mut rng, config.factors));
        item_factors
            .entry(review.dish_id)
            .or_insert_with(|| random_vector(&mut rng, config.factors));
        interactions.push(Interaction {
            user_id: review.user_id,
            dish_id: review.dish_id,
            rating: review.rating as f64,
        });
    }
    for order in orders {
        user_factors
            .entry(order.user_id)
            .or_insert_with(|| random_vector(&mut rng, config.factors));
        for item in &order.items {
            item_factors
                .entry(item.dish_id)
                .or_insert_with(|| random_vector(&mut rng, config.factors));
            interactions.push(Interaction {
                user_id: order.user_id,
                dish_id: item.dish_id,
                rating: 1.0,
            });
        }
    }
    if interactions.is_empty() {
        return FactorModel::default();
    }

    let lr = config.learning_rate;
    let reg = config.regularization;
    for _ in 0..config.epochs {
        interactions.shuffle(&mut rng);
        for it in &interactions {
            // entries exist by construction above
            let Some(uf_old) = user_factors.get(&it.user_id).cloned() else {
                continue;
            };
            let Some(vf_old) = item_factors.get(&it.dish_id).cloned() else {
                continue;
            };
            let pred: f64 = uf_old.iter().zip(&vf_old).map(|(a, b)| a * b).sum();
            let err = it.rating - pred;
            if let Some(uf) = user_factors.get_mut(&it.user_id) {
                for f in 0..config.factors {
                    uf[f] += lr * (err * vf_old[f] - reg * uf_old[f]);
                }
            }
            if let Some(vf) = item_factors.get_mut(&it.dish_id) {
                for f in 0..config.factors {
                    vf[f] += lr * (err * uf_old[f] - reg * vf_old[f]);
                }
            }
        }
    }
    debug!(
        users = user_factors.len(),
        dishes = item_factors.len(),
        interactions = interactions.len(),
        "factorization trained"
    );
    FactorModel {
        user_factors,
        item_factors,
    }
}

fn random_vector(rng: &mut StdRng, factors: usize) -> Vec<f64> {
    (0..factors).map(|_| (rng.gen::<f64>() - 0.5) * 0.02).collect()
}

/// Lifecycle wrapper: trains at most once under a single-writer barrier
/// and hands out immutable snapshots to readers. `retrain` swaps in a
/// model built from fresh data.
pub struct FactorizationService {
    config: RecommendationConfig,
    model: RwLock<Option<Arc<FactorModel>>>,
    train_lock: Mutex<()>,
}

impl FactorizationService {
    pub fn new(config: RecommendationConfig) -> Self {
        Self {
            config,
            model: RwLock::new(None),
            train_lock: Mutex::new(()),
        }
    }

    /// Current snapshot, training it first if nobody has yet. Concurrent
    /// callers during the first training wait and then share the result.
    pub async fn ensure_trained(&self, reviews: &[Review], orders: &[Order]) -> Arc<FactorModel> {
        if let Some(model) = self.model.read().await.clone() {
            return model;
        }
        let _guard = self.train_lock.lock().await;
        if let Some(model) = self.model.read().await.clone() {
            return model;
        }
        let trained = Arc::new(train(reviews, orders, &self.config));
        info!("factorization model trained");
        *self.model.write().await = Some(trained.clone());
        trained
    }

    /// Discards the current snapshot and trains on the given data.
    pub async fn retrain(&self, reviews: &[Review], orders: &[Order]) -> Arc<FactorModel> {
        let _guard = self.train_lock.lock().await;
        let trained = Arc::new(train(reviews, orders, &self.config));
        info!("factorization model retrained");
        *self.model.write().await = Some(trained.clone());
        trained
    }
}
