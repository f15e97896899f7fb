//! Application services: history collection, demand forecasting, and
//! dish recommendations.

pub mod forecasting;
pub mod history;
pub mod recommendation;
pub mod scheduler;

pub use forecasting::{DishForecastService, ForecastQuery, IngredientForecastService};
pub use history::{HistoryCollector, OrderHistory};
pub use recommendation::RecommendationService;
pub use scheduler::ForecastScheduler;
