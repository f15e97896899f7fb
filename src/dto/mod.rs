pub mod forecast;
pub mod recommendation;

pub use forecast::{
    DishForecastDto, ForecastDetailsDto, IngredientForecastDto, ModelMetricsDto,
    SummaryForecastDto,
};
pub use recommendation::DishSummaryDto;
