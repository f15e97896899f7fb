//! Tavola API: demand forecasting and dish recommendations for a
//! restaurant ordering backend.
//!
//! Completed-order history feeds three forecast models (Holt-Winters,
//! AR(1) and an automatic selector) that project dish demand at monthly,
//! daily and hourly granularity, roll it up to ingredient purchase
//! plans, and power collaborative-filtering dish recommendations.

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Json, Router};
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};
use utoipa::OpenApi;

pub mod config;
pub mod dto;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod ml;
pub mod models;
pub mod openapi;
pub mod repositories;
pub mod services;

use config::AppConfig;
use repositories::InMemoryStore;
use services::{
    DishForecastService, ForecastScheduler, IngredientForecastService, RecommendationService,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared handler state: configuration plus the service layer.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub dish_forecasts: Arc<DishForecastService>,
    pub ingredient_forecasts: Arc<IngredientForecastService>,
    pub recommendations: Arc<RecommendationService>,
}

impl AppState {
    /// Wires the full service graph on top of one store.
    pub fn build(config: AppConfig, store: Arc<InMemoryStore>) -> Self {
        let dish_forecasts = Arc::new(DishForecastService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            config.forecast.clone(),
        ));
        let ingredient_forecasts = Arc::new(IngredientForecastService::new(
            dish_forecasts.clone(),
            store.clone(),
            store.clone(),
        ));
        let recommendations = Arc::new(RecommendationService::new(
            store.clone(),
            store.clone(),
            store,
            config.recommendation.clone(),
        ));
        Self {
            config,
            dish_forecasts,
            ingredient_forecasts,
            recommendations,
        }
    }

    /// Background refresh loop over this state's forecast services.
    pub fn scheduler(&self) -> ForecastScheduler {
        ForecastScheduler::new(
            self.dish_forecasts.clone(),
            self.ingredient_forecasts.clone(),
            self.config.forecast.refresh_interval_hours,
        )
    }
}

pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .nest("/forecasts", handlers::forecast_routes())
        .nest("/recommendations", handlers::recommendation_routes())
}

/// The complete application router with middleware applied.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "tavola-api up" }))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(openapi::ApiDoc::openapi()) }),
        )
        .nest("/api/v1", api_v1_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
