//! Arena-backed store implementing every repository trait.
//!
//! Entities live in flat tables keyed by id with explicit foreign keys, so
//! the dish/ingredient and order/item graphs carry no ownership cycles.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use uuid::Uuid;

use crate::entities::{
    Category, Dish, DishForecastRow, Ingredient, IngredientForecastRow, Order, OrderStatus, Review,
};
use crate::errors::ServiceError;

use super::{DishRepository, ForecastSink, OrderRepository, ReviewRepository};

#[derive(Debug, Default)]
struct Tables {
    dishes: HashMap<Uuid, Dish>,
    ingredients: HashMap<Uuid, Ingredient>,
    orders: Vec<Order>,
    reviews: Vec<Review>,
    dish_forecasts: Vec<DishForecastRow>,
    ingredient_forecasts: Vec<IngredientForecastRow>,
}

/// In-memory datastore. Reads take an immutable snapshot view; writes hold
/// the lock only for the swap.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_dish(&self, dish: Dish) {
        self.write().dishes.insert(dish.id, dish);
    }

    pub fn insert_ingredient(&self, ingredient: Ingredient) {
        self.write().ingredients.insert(ingredient.id, ingredient);
    }

    pub fn insert_order(&self, order: Order) {
        self.write().orders.push(order);
    }

    pub fn insert_review(&self, review: Review) {
        self.write().reviews.push(review);
    }

    pub fn dish_forecast_rows(&self) -> Vec<DishForecastRow> {
        self.read().dish_forecasts.clone()
    }

    pub fn ingredient_forecast_rows(&self) -> Vec<IngredientForecastRow> {
        self.read().ingredient_forecasts.clone()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn completed_orders_since(
        &self,
        cutoff: NaiveDateTime,
    ) -> Result<Vec<Order>, ServiceError> {
        Ok(self
            .read()
            .orders
            .iter()
            .filter(|o| o.status == OrderStatus::Completed && o.created_at >= cutoff)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl DishRepository for InMemoryStore {
    async fn active_dishes(
        &self,
        name_filter: Option<&str>,
        category: Option<Category>,
    ) -> Result<Vec<Dish>, ServiceError> {
        let needle = name_filter.map(str::to_lowercase);
        let mut dishes: Vec<Dish> = self
            .read()
            .dishes
            .values()
            .filter(|d| !d.archived)
            .filter(|d| category.map_or(true, |c| d.category == c))
            .filter(|d| {
                needle
                    .as_deref()
                    .map_or(true, |n| d.name.to_lowercase().contains(n))
            })
            .cloned()
            .collect();
        dishes.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(dishes)
    }

    async fn dishes_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Dish>, ServiceError> {
        let tables = self.read();
        Ok(ids
            .iter()
            .filter_map(|id| tables.dishes.get(id))
            .filter(|d| !d.archived)
            .cloned()
            .collect())
    }

    async fn ingredients(&self) -> Result<Vec<Ingredient>, ServiceError> {
        Ok(self.read().ingredients.values().cloned().collect())
    }
}

#[async_trait]
impl ReviewRepository for InMemoryStore {
    async fn all_reviews(&self) -> Result<Vec<Review>, ServiceError> {
        Ok(self.read().reviews.clone())
    }
}

#[async_trait]
impl ForecastSink for InMemoryStore {
    async fn replace_dish_forecasts(
        &self,
        dish_id: Uuid,
        generated_on: NaiveDate,
        rows: Vec<DishForecastRow>,
    ) -> Result<(), ServiceError> {
        let mut tables = self.write();
        tables
            .dish_forecasts
            .retain(|r| !(r.dish_id == dish_id && r.generated_on == generated_on));
        tables.dish_forecasts.extend(rows);
        Ok(())
    }

    async fn replace_ingredient_forecasts(
        &self,
        generated_on: NaiveDate,
        rows: Vec<IngredientForecastRow>,
    ) -> Result<(), ServiceError> {
        let mut tables = self.write();
        tables
            .ingredient_forecasts
            .retain(|r| r.generated_on != generated_on);
        tables.ingredient_forecasts.extend(rows);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::MeasureUnit;
    use crate::models::YearMonth;
    use chrono::NaiveDate;

    fn dish(name: &str, category: Category, archived: bool) -> Dish {
        Dish {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category,
            archived,
            ingredients: vec![],
        }
    }

    #[tokio::test]
    async fn active_dishes_filters_and_sorts() {
        let store = InMemoryStore::new();
        store.insert_dish(dish("Quattro Formaggi", Category::Pizza, false));
        store.insert_dish(dish("Margherita", Category::Pizza, false));
        store.insert_dish(dish("Old Margherita", Category::Pizza, true));
        store.insert_dish(dish("Lemonade", Category::Drinks, false));

        let all = store.active_dishes(None, None).await.unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].name, "Lemonade");

        let pizza = store.active_dishes(None, Some(Category::Pizza)).await.unwrap();
        assert_eq!(pizza.len(), 2);

        let named = store.active_dishes(Some("marg"), None).await.unwrap();
        assert_eq!(named.len(), 1);
        assert_eq!(named[0].name, "Margherita");
    }

    #[tokio::test]
    async fn dish_forecast_rows_replace_same_generation_date() {
        let store = InMemoryStore::new();
        let dish_id = Uuid::new_v4();
        let day = NaiveDate::from_ymd_opt(2026, 8, 30).unwrap();
        let month = YearMonth::new(2026, 9).unwrap();

        let row = |q| DishForecastRow {
            dish_id,
            month,
            quantity: q,
            generated_on: day,
        };
        store
            .replace_dish_forecasts(dish_id, day, vec![row(10), row(11)])
            .await
            .unwrap();
        store
            .replace_dish_forecasts(dish_id, day, vec![row(20)])
            .await
            .unwrap();

        let rows = store.dish_forecast_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].quantity, 20);
    }

    #[tokio::test]
    async fn ingredients_round_trip() {
        let store = InMemoryStore::new();
        store.insert_ingredient(Ingredient {
            id: Uuid::new_v4(),
            name: "Mozzarella".to_string(),
            unit: MeasureUnit::Grams,
        });
        assert_eq!(store.ingredients().await.unwrap().len(), 1);
    }
}
