//! HTTP handlers grouped by API area.

pub mod forecasts;
pub mod recommendations;

pub use forecasts::forecast_routes;
pub use recommendations::recommendation_routes;
