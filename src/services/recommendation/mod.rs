//! Dish recommendations: collaborative filtering blended with matrix
//! factorization, topped up by category preferences.

pub mod collaborative;
pub mod evaluator;
pub mod fallback;
pub mod factorization;
pub mod rating_matrix;

pub use collaborative::CollaborativePredictor;
pub use factorization::{FactorModel, FactorizationService};
pub use rating_matrix::RatingMatrix;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::config::RecommendationConfig;
use crate::dto::DishSummaryDto;
use crate::errors::ServiceError;
use crate::repositories::{DishRepository, OrderRepository, ReviewRepository};

pub struct RecommendationService {
    dishes: Arc<dyn DishRepository>,
    reviews: Arc<dyn ReviewRepository>,
    orders: Arc<dyn OrderRepository>,
    predictor: CollaborativePredictor,
    factorization: FactorizationService,
    pub default_limit: usize,
}

impl RecommendationService {
    pub fn new(
        dishes: Arc<dyn DishRepository>,
        reviews: Arc<dyn ReviewRepository>,
        orders: Arc<dyn OrderRepository>,
        config: RecommendationConfig,
    ) -> Self {
        Self {
            dishes,
            reviews,
            orders,
            predictor: CollaborativePredictor::new(config.shrinkage),
            default_limit: config.default_limit,
            factorization: FactorizationService::new(config),
        }
    }

    /// Top dishes the user has not rated yet, ordered by predicted
    /// preference. Collaborative and factorization scores for the same
    /// dish are averaged; when neither engine can score anything the
    /// result comes entirely from the category fallback.
    #[instrument(skip(self))]
    pub async fn recommend(
        &self,
        user_id: Uuid,
        limit: usize,
    ) -> Result<Vec<DishSummaryDto>, ServiceError> {
        let reviews = self.reviews.all_reviews().await?;
        let orders = self
            .orders
            .completed_orders_since(NaiveDateTime::MIN)
            .await?;
        if reviews.is_empty() && orders.is_empty() {
            return Ok(Vec::new());
        }

        let matrix = RatingMatrix::build(&reviews, &orders);
        let rated: HashSet<Uuid> = matrix
            .user(user_id)
            .map(|r| r.keys().copied().collect())
            .unwrap_or_default();
        let mut predictions = self.predictor.predict(user_id, &matrix);

        let model = self.factorization.ensure_trained(&reviews, &orders).await;
        let review_dishes: HashSet<Uuid> = reviews.iter().map(|r| r.dish_id).collect();
        for dish_id in review_dishes {
            if rated.contains(&dish_id) {
                continue;
            }
            let factor_pred = model.predict(user_id, dish_id);
            predictions
                .entry(dish_id)
                .and_modify(|p| *p = (*p + factor_pred) / 2.0)
                .or_insert(factor_pred);
        }

        let all_dishes = self.dishes.active_dishes(None, None).await?;
        let avg_ratings = fallback::average_ratings(&reviews);
        let counts = fallback::review_counts(&reviews);

        let mut result = Vec::new();
        if predictions.is_empty() {
            debug!(user = %user_id, "no predictions, falling back to categories");
        } else {
            let ids: Vec<Uuid> = predictions.keys().copied().collect();
            let mut scored = self.dishes.dishes_by_ids(&ids).await?;
            scored.sort_by(|a, b| {
                let pa = predictions.get(&a.id).copied().unwrap_or(0.0);
                let pb = predictions.get(&b.id).copied().unwrap_or(0.0);
                pb.partial_cmp(&pa)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| a.name.cmp(&b.name))
            });
            for dish in scored.into_iter().take(limit) {
                result.push(DishSummaryDto {
                    id: dish.id,
                    name: dish.name,
                    category: dish.category,
                    average_rating: avg_ratings.get(&dish.id).copied().unwrap_or(0.0),
                    review_count: counts.get(&dish.id).copied().unwrap_or(0),
                });
            }
        }

        if result.len() < limit {
            let mut exclude: HashSet<Uuid> = result.iter().map(|d| d.id).collect();
            exclude.extend(&rated);
            let extra_ids = fallback::by_category(
                user_id,
                &exclude,
                limit - result.len(),
                &all_dishes,
                &reviews,
                &orders,
            );
            let by_id: HashMap<Uuid, _> =
                all_dishes.iter().map(|d| (d.id, d)).collect();
            for id in extra_ids {
                if let Some(dish) = by_id.get(&id) {
                    result.push(DishSummaryDto {
                        id: dish.id,
                        name: dish.name.clone(),
                        category: dish.category,
                        average_rating: avg_ratings.get(&dish.id).copied().unwrap_or(0.0),
                        review_count: counts.get(&dish.id).copied().unwrap_or(0),
                    });
                }
            }
        }

        info!(user = %user_id, dishes = result.len(), "recommendations built");
        Ok(result)
    }

    /// Rebuilds the factorization model from current data, for the
    /// scheduler or an admin trigger.
    pub async fn retrain(&self) -> Result<(), ServiceError> {
        let reviews = self.reviews.all_reviews().await?;
        let orders = self
            .orders
            .completed_orders_since(NaiveDateTime::MIN)
            .await?;
        self.factorization.retrain(&reviews, &orders).await;
        Ok(())
    }
}

impl std::fmt::Debug for RecommendationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecommendationService")
            .field("default_limit", &self.default_limit)
            .finish_non_exhaustive()
    }
}
