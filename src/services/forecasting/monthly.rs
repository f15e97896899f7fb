//! Monthly demand projection for a single dish.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::config::ForecastConfig;
use crate::entities::{Dish, DishForecastRow};
use crate::errors::ServiceError;
use crate::ml::{ForecastModel, ForecastResult};
use crate::models::{ScaleData, YearMonth};
use crate::repositories::ForecastSink;
use crate::services::history::OrderHistory;

/// Everything the monthly pass produces for one dish: the chart scale, the
/// per-month predictions the daily allocator consumes, the exact series the
/// model saw, and quality flags for the UI.
#[derive(Debug, Clone)]
pub struct MonthlyOutcome {
    pub scale: ScaleData,
    pub month_forecasts: HashMap<YearMonth, i64>,
    pub model_history: Vec<f64>,
    pub result: ForecastResult,
    pub single_point: bool,
    pub no_data: bool,
    pub empty_forecast: bool,
}

pub struct MonthlyForecaster {
    sink: Arc<dyn ForecastSink>,
    month_window: usize,
    horizon: usize,
}

impl MonthlyForecaster {
    pub fn new(sink: Arc<dyn ForecastSink>, config: &ForecastConfig) -> Self {
        Self {
            sink,
            month_window: config.month_window,
            horizon: config.horizon,
        }
    }

    /// Projects the next `horizon` months for `dish` from its trailing
    /// `month_window` months plus the current one. Leading and trailing
    /// zero months are trimmed before modeling so a dish added mid-window
    /// is not forecast from a wall of zeros; at least one point is always
    /// kept. With `persist` the predictions replace any rows already
    /// generated today for this dish.
    pub async fn forecast(
        &self,
        dish: &Dish,
        history: &OrderHistory,
        model: &dyn ForecastModel,
        today: NaiveDate,
        persist: bool,
    ) -> Result<MonthlyOutcome, ServiceError> {
        let empty = HashMap::new();
        let dish_monthly = history.dish_monthly(dish.id).unwrap_or(&empty);
        let no_data = dish_monthly.is_empty();
        if no_data {
            warn!(dish = %dish.id, "no completed orders in history");
        }

        let current_month = YearMonth::from_date(today);
        let start_month = current_month.minus_months(self.month_window as i64);

        let mut scale = ScaleData::with_capacity(self.month_window + 1 + self.horizon);
        let mut base: Vec<i64> = Vec::with_capacity(self.month_window + 1);
        for i in 0..self.month_window as i64 {
            let ym = start_month.plus_months(i);
            let val = dish_monthly.get(&ym).copied().unwrap_or(0);
            scale.push_actual(ym.to_string(), val);
            base.push(val);
        }
        let current_val = dish_monthly.get(&current_month).copied().unwrap_or(0);
        scale.push_actual(current_month.to_string(), current_val);
        base.push(current_val);

        let (from, to) = trim_zeros(&base);
        let mut model_history: Vec<f64> = base[from..to].iter().map(|&v| v as f64).collect();
        if from > 0 {
            debug!(dish = %dish.id, trimmed = from, "trimmed leading zero months");
        }
        if to < base.len() {
            debug!(dish = %dish.id, trimmed = base.len() - to, "trimmed trailing zero months");
        }
        if model_history.is_empty() {
            warn!(dish = %dish.id, "history empty after trimming, using current month only");
            model_history.push(current_val as f64);
        }
        let single_point = model_history.len() == 1;
        if single_point && !no_data {
            warn!(dish = %dish.id, "single data point, forecasts will repeat it");
        }

        let result = model.forecast(&model_history, self.horizon);
        let empty_forecast = result.is_empty();
        if empty_forecast {
            warn!(dish = %dish.id, model = model.name(), "model returned no forecasts");
        }

        let mut month_forecasts = HashMap::new();
        let mut rows = Vec::with_capacity(result.len());
        for (i, value) in result.point.iter().enumerate() {
            let ym = current_month.plus_months(i as i64 + 1);
            let pred = to_quantity(*value);
            month_forecasts.insert(ym, pred);
            scale.push_forecast(ym.to_string(), pred);
            if persist {
                rows.push(DishForecastRow {
                    dish_id: dish.id,
                    month: ym,
                    quantity: pred,
                    generated_on: today,
                });
            }
        }
        if persist {
            self.sink
                .replace_dish_forecasts(dish.id, today, rows)
                .await?;
        }

        Ok(MonthlyOutcome {
            scale,
            month_forecasts,
            model_history,
            result,
            single_point,
            no_data,
            empty_forecast,
        })
    }
}

fn to_quantity(value: f64) -> i64 {
    let rounded = value.round();
    if rounded < 0.0 {
        0
    } else {
        rounded as i64
    }
}

/// Bounds of the series once leading and trailing zeros are dropped. Keeps
/// at least one element whenever anything survives the leading trim.
fn trim_zeros(series: &[i64]) -> (usize, usize) {
    let n = series.len();
    let mut from = 0;
    while from < n && series[from] == 0 {
        from += 1;
    }
    let mut to = n;
    while to > (from + 1).max(1) && series[to - 1] == 0 {
        to -= 1;
    }
    (from, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_leading_and_trailing_zeros() {
        assert_eq!(trim_zeros(&[0, 0, 3, 5, 0, 0]), (2, 4));
        assert_eq!(trim_zeros(&[1, 2, 3]), (0, 3));
    }

    #[test]
    fn keeps_one_point_for_interior_data() {
        assert_eq!(trim_zeros(&[0, 7, 0]), (1, 2));
        assert_eq!(trim_zeros(&[4]), (0, 1));
    }

    #[test]
    fn all_zero_series_trims_to_empty() {
        let (from, to) = trim_zeros(&[0, 0, 0]);
        assert_eq!(from, to);
    }

    #[test]
    fn rounds_and_clamps_quantities() {
        assert_eq!(to_quantity(4.6), 5);
        assert_eq!(to_quantity(-2.3), 0);
        assert_eq!(to_quantity(0.4), 0);
    }
}
