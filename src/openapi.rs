//! OpenAPI document for the HTTP API, served at `/api-docs/openapi.json`.

use utoipa::OpenApi;

use crate::dto::{
    DishForecastDto, DishSummaryDto, ForecastDetailsDto, IngredientForecastDto, ModelMetricsDto,
    SummaryForecastDto,
};
use crate::errors::ErrorResponse;
use crate::handlers;
use crate::ml::FittedParams;
use crate::models::ScaleData;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::forecasts::list_dish_forecasts,
        handlers::forecasts::dish_forecast_details,
        handlers::forecasts::list_ingredient_forecasts,
        handlers::forecasts::list_model_metrics,
        handlers::forecasts::forecast_summary,
        handlers::recommendations::recommend_dishes,
    ),
    components(schemas(
        DishForecastDto,
        IngredientForecastDto,
        SummaryForecastDto,
        ForecastDetailsDto,
        ModelMetricsDto,
        DishSummaryDto,
        ScaleData,
        FittedParams,
        ErrorResponse,
    )),
    tags(
        (name = "forecasts", description = "Dish and ingredient demand forecasts"),
        (name = "recommendations", description = "Personalized dish suggestions")
    ),
    info(
        title = "Tavola API",
        description = "Demand forecasting and dish recommendations for a restaurant ordering system"
    )
)]
pub struct ApiDoc;
