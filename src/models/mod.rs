//! Value types shared across the forecasting and recommendation services.

pub mod page;
pub mod scale;
pub mod time;

pub use page::{Page, PageRequest};
pub use scale::ScaleData;
pub use time::YearMonth;
