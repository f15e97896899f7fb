use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::dto::DishSummaryDto;
use crate::errors::ServiceError;
use crate::AppState;

pub fn recommendation_routes() -> Router<AppState> {
    Router::new().route("/:user_id", get(recommend_dishes))
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct RecommendQuery {
    /// Maximum dishes to return; defaults to the configured limit.
    pub limit: Option<usize>,
}

/// Personalized dish suggestions for a user.
#[utoipa::path(
    get,
    path = "/api/v1/recommendations/{user_id}",
    params(("user_id" = Uuid, Path, description = "User id"), RecommendQuery),
    responses(
        (status = 200, description = "Recommendations returned", body = [DishSummaryDto]),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "recommendations"
)]
pub async fn recommend_dishes(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(query): Query<RecommendQuery>,
) -> Result<Json<Vec<DishSummaryDto>>, ServiceError> {
    let limit = query
        .limit
        .unwrap_or(state.recommendations.default_limit)
        .max(1);
    let dishes = state.recommendations.recommend(user_id, limit).await?;
    Ok(Json(dishes))
}
