use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::YearMonth;

/// Persisted monthly demand forecast for one dish. Rows for the same dish
/// and generation date replace one another.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DishForecastRow {
    pub dish_id: Uuid,
    pub month: YearMonth,
    pub quantity: i64,
    pub generated_on: NaiveDate,
}

/// Persisted monthly requirement forecast for one ingredient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientForecastRow {
    pub ingredient_id: Uuid,
    pub month: YearMonth,
    pub quantity: i64,
    pub generated_on: NaiveDate,
}
