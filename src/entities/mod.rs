//! Domain entities for the ordering and forecasting core.
//!
//! The entity graph (dish - dish ingredient - ingredient, order - order item)
//! is stored arena-style: flat tables keyed by id with explicit foreign-key
//! fields instead of back-references.

pub mod dish;
pub mod forecast_row;
pub mod order;
pub mod review;

pub use dish::{Category, Dish, DishIngredient, Ingredient, MeasureUnit};
pub use forecast_row::{DishForecastRow, IngredientForecastRow};
pub use order::{Order, OrderItem, OrderStatus};
pub use review::Review;
