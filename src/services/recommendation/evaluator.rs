//! Offline evaluation harness for recommendation quality.
//!
//! Holds out each multi-review user's latest review and checks whether the
//! rated dish shows up in their top-3 recommendations. Not wired into any
//! request path; run it from tests or an admin task to gauge quality.

use std::collections::HashMap;

use tracing::info;
use uuid::Uuid;

use crate::entities::Review;
use crate::errors::ServiceError;

use super::RecommendationService;

const TOP_K: usize = 3;

/// Precision/recall/NDCG at rank 3, averaged over evaluated users.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationReport {
    pub precision: f64,
    pub recall: f64,
    pub ndcg: f64,
    pub users: usize,
}

pub async fn evaluate(
    service: &RecommendationService,
    reviews: &[Review],
) -> Result<Option<EvaluationReport>, ServiceError> {
    let mut by_user: HashMap<Uuid, Vec<&Review>> = HashMap::new();
    for review in reviews {
        by_user.entry(review.user_id).or_default().push(review);
    }

    let mut hits = 0usize;
    let mut total = 0usize;
    let mut ndcg_sum = 0.0;
    for (user_id, user_reviews) in by_user {
        if user_reviews.len() < 2 {
            continue;
        }
        let held_out = user_reviews[user_reviews.len() - 1];
        let recs = service.recommend(user_id, TOP_K).await?;
        total += 1;
        for (rank, dish) in recs.iter().enumerate() {
            if dish.id == held_out.dish_id {
                hits += 1;
                ndcg_sum += 1.0 / ((rank + 2) as f64).log2();
                break;
            }
        }
    }

    if total == 0 {
        return Ok(None);
    }
    let report = EvaluationReport {
        precision: hits as f64 / (total * TOP_K) as f64,
        recall: hits as f64 / total as f64,
        ndcg: ndcg_sum / total as f64,
        users: total,
    };
    info!(
        precision = report.precision,
        recall = report.recall,
        ndcg = report.ndcg,
        users = report.users,
        "recommendation evaluation finished"
    );
    Ok(Some(report))
}
