//! Data-access seams for the forecasting and recommendation core.
//!
//! The engine consumes order history, the dish catalog with recipes, and
//! review ratings, and writes generated forecast rows. Each concern is a
//! trait so the core stays independent of the storage backend; the
//! [`memory`] module provides the arena-backed implementation used by the
//! server binary and the tests.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::entities::{
    Category, Dish, DishForecastRow, Ingredient, IngredientForecastRow, Order, Review,
};
use crate::errors::ServiceError;

pub mod memory;

pub use memory::InMemoryStore;

/// Source of completed-order history.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// All completed orders created at or after `cutoff`.
    async fn completed_orders_since(
        &self,
        cutoff: NaiveDateTime,
    ) -> Result<Vec<Order>, ServiceError>;
}

/// Source of the active dish catalog and its recipes.
#[async_trait]
pub trait DishRepository: Send + Sync {
    /// Active (non-archived) dishes, optionally filtered by a
    /// case-insensitive name substring and/or a category, sorted by name.
    async fn active_dishes(
        &self,
        name_filter: Option<&str>,
        category: Option<Category>,
    ) -> Result<Vec<Dish>, ServiceError>;

    /// Active dishes with the given ids, in no particular order.
    async fn dishes_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Dish>, ServiceError>;

    /// All known ingredients.
    async fn ingredients(&self) -> Result<Vec<Ingredient>, ServiceError>;
}

/// Source of explicit dish ratings.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn all_reviews(&self) -> Result<Vec<Review>, ServiceError>;
}

/// Sink for generated forecast rows. Writing replaces any prior rows for the
/// same generation date (and dish, for dish rows).
#[async_trait]
pub trait ForecastSink: Send + Sync {
    async fn replace_dish_forecasts(
        &self,
        dish_id: Uuid,
        generated_on: NaiveDate,
        rows: Vec<DishForecastRow>,
    ) -> Result<(), ServiceError>;

    async fn replace_ingredient_forecasts(
        &self,
        generated_on: NaiveDate,
        rows: Vec<IngredientForecastRow>,
    ) -> Result<(), ServiceError>;
}
