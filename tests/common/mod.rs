//! Shared fixtures: a seeded in-memory store and the service graph on top.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use uuid::Uuid;

use tavola_api::config::AppConfig;
use tavola_api::entities::{
    Category, Dish, DishIngredient, Ingredient, MeasureUnit, Order, OrderItem, OrderStatus, Review,
};
use tavola_api::repositories::InMemoryStore;
use tavola_api::AppState;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, hour: u32) -> NaiveDateTime {
    date(y, m, d).and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap())
}

pub fn dish(name: &str, category: Category, recipe: &[(Uuid, i64)]) -> Dish {
    Dish {
        id: Uuid::new_v4(),
        name: name.to_string(),
        category,
        archived: false,
        ingredients: recipe
            .iter()
            .map(|&(ingredient_id, quantity)| DishIngredient {
                ingredient_id,
                quantity,
            })
            .collect(),
    }
}

pub fn ingredient(name: &str, unit: MeasureUnit) -> Ingredient {
    Ingredient {
        id: Uuid::new_v4(),
        name: name.to_string(),
        unit,
    }
}

pub fn completed_order(
    user_id: Uuid,
    dish_id: Uuid,
    quantity: i64,
    created_at: NaiveDateTime,
) -> Order {
    Order {
        id: Uuid::new_v4(),
        user_id,
        status: OrderStatus::Completed,
        created_at,
        items: vec![OrderItem { dish_id, quantity }],
    }
}

pub fn review(user_id: Uuid, dish_id: Uuid, rating: u8) -> Review {
    Review {
        id: Uuid::new_v4(),
        user_id,
        dish_id,
        rating,
    }
}

pub fn state_over(store: Arc<InMemoryStore>) -> AppState {
    AppState::build(AppConfig::default(), store)
}
