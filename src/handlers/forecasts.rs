use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::dto::{
    DishForecastDto, ForecastDetailsDto, IngredientForecastDto, ModelMetricsDto,
    SummaryForecastDto,
};
use crate::errors::ServiceError;
use crate::ml::ModelKind;
use crate::models::Page;
use crate::services::forecasting::{summary, ForecastQuery};
use crate::AppState;

pub fn forecast_routes() -> Router<AppState> {
    Router::new()
        .route("/dishes", get(list_dish_forecasts))
        .route("/dishes/:id/details", get(dish_forecast_details))
        .route("/ingredients", get(list_ingredient_forecasts))
        .route("/models", get(list_model_metrics))
        .route("/summary", get(forecast_summary))
}

/// Demand forecasts for every dish matching the query.
#[utoipa::path(
    get,
    path = "/api/v1/forecasts/dishes",
    params(ForecastQuery),
    responses(
        (status = 200, description = "Dish forecasts returned", body = Page<DishForecastDto>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "forecasts"
)]
pub async fn list_dish_forecasts(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> Result<Json<Page<DishForecastDto>>, ServiceError> {
    let persist = query.persist.unwrap_or(false);
    let page = state.dish_forecasts.dish_forecasts(&query, persist).await?;
    Ok(Json(page))
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct DetailsQuery {
    /// Model whose cached run to read; defaults to Holt-Winters.
    pub model: Option<ModelKind>,
}

/// Train/predict series for one dish, from the latest forecast run.
#[utoipa::path(
    get,
    path = "/api/v1/forecasts/dishes/{id}/details",
    params(("id" = Uuid, Path, description = "Dish id"), DetailsQuery),
    responses(
        (status = 200, description = "Forecast details returned", body = ForecastDetailsDto),
        (status = 404, description = "No cached forecast for this dish and model", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "forecasts"
)]
pub async fn dish_forecast_details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<DetailsQuery>,
) -> Result<Json<ForecastDetailsDto>, ServiceError> {
    let model = query.model.unwrap_or(ModelKind::HoltWinters);
    state
        .dish_forecasts
        .details(model, id)
        .map(Json)
        .ok_or_else(|| ServiceError::NotFound(format!("no {model} forecast for dish {id}")))
}

/// Ingredient purchase forecasts aggregated from dish demand and recipes.
#[utoipa::path(
    get,
    path = "/api/v1/forecasts/ingredients",
    params(ForecastQuery),
    responses(
        (status = 200, description = "Ingredient forecasts returned", body = Page<IngredientForecastDto>),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "forecasts"
)]
pub async fn list_ingredient_forecasts(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> Result<Json<Page<IngredientForecastDto>>, ServiceError> {
    let persist = query.persist.unwrap_or(false);
    let page = state
        .ingredient_forecasts
        .ingredient_forecasts(&query, persist)
        .await?;
    Ok(Json(page))
}

/// Cross-validated accuracy per model, from the latest forecast run.
#[utoipa::path(
    get,
    path = "/api/v1/forecasts/models",
    responses(
        (status = 200, description = "Model metrics returned", body = [ModelMetricsDto]),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "forecasts"
)]
pub async fn list_model_metrics(
    State(state): State<AppState>,
) -> Result<Json<Vec<ModelMetricsDto>>, ServiceError> {
    Ok(Json(state.dish_forecasts.model_metrics()))
}

/// Restaurant-wide totals across all dishes, per scale.
#[utoipa::path(
    get,
    path = "/api/v1/forecasts/summary",
    params(ForecastQuery),
    responses(
        (status = 200, description = "Summary forecast returned", body = SummaryForecastDto),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "forecasts"
)]
pub async fn forecast_summary(
    State(state): State<AppState>,
    Query(query): Query<ForecastQuery>,
) -> Result<Json<SummaryForecastDto>, ServiceError> {
    // the summary is a read, never a persisting run
    let unpaged = ForecastQuery {
        persist: None,
        page: None,
        per_page: None,
        ..query
    };
    let page = state.dish_forecasts.dish_forecasts(&unpaged, false).await?;
    Ok(Json(summary::summarize(&page.items)))
}
