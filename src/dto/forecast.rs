use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::{Category, MeasureUnit};
use crate::ml::FittedParams;
use crate::models::ScaleData;

/// Chart-ready forecast for one dish across all three time scales.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DishForecastDto {
    pub id: Uuid,
    pub name: String,
    pub category: Category,
    pub monthly: ScaleData,
    pub daily: ScaleData,
    pub hourly: ScaleData,
    pub no_data: bool,
    pub single_point: bool,
    pub empty_forecast: bool,
}

/// Ingredient demand aggregated from the dish forecasts through recipes.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IngredientForecastDto {
    pub id: Uuid,
    pub name: String,
    pub unit: MeasureUnit,
    pub monthly: ScaleData,
    pub daily: ScaleData,
    pub hourly: ScaleData,
    pub no_data: bool,
    pub single_point: bool,
    pub empty_forecast: bool,
}

/// Restaurant-wide totals: every dish forecast summed per scale.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct SummaryForecastDto {
    pub monthly: ScaleData,
    pub daily: ScaleData,
    pub hourly: ScaleData,
}

/// The raw numbers behind one dish's latest monthly projection.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ForecastDetailsDto {
    /// Exact series the model was trained on, after zero trimming.
    pub history: Vec<f64>,
    pub forecasts: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    /// Parameters the model fitted on this run, if any.
    pub params: FittedParams,
    /// Held-out accuracy of the fitted model.
    pub mape: Option<f64>,
    pub rmse: Option<f64>,
    pub single_point: bool,
    pub no_data: bool,
}

/// Cross-validation scores for one model, as shown on the admin screen.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ModelMetricsDto {
    pub model: String,
    pub mape: Option<f64>,
    pub rmse: Option<f64>,
}
