use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

/// Menu category of a dish.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Category {
    Pizza,
    Snacks,
    Salads,
    Drinks,
    Desserts,
}

/// Measurement unit for ingredient quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MeasureUnit {
    Grams,
    Milliliters,
    Pieces,
}

/// A menu dish. Archived dishes are kept for history but excluded from
/// forecasting and recommendations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dish {
    pub id: Uuid,
    pub name: String,
    pub category: Category,
    pub archived: bool,
    /// Recipe: ingredient requirements per single serving.
    pub ingredients: Vec<DishIngredient>,
}

/// Join row linking a dish to an ingredient with the required quantity per
/// serving.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DishIngredient {
    pub ingredient_id: Uuid,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: Uuid,
    pub name: String,
    pub unit: MeasureUnit,
}
