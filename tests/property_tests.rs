//! Property-based tests for the forecasting core.
//!
//! These use proptest to verify invariants across a wide range of demand
//! series, catching edge cases the unit tests might miss.

use std::collections::HashMap;

use chrono::NaiveDate;
use proptest::prelude::*;

use tavola_api::ml::{ArimaModel, AutoArimaModel, ForecastModel, HoltWintersModel};
use tavola_api::models::YearMonth;
use tavola_api::services::forecasting::DailyForecaster;

fn demand_series(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0f64..500.0, 0..max_len)
}

proptest! {
    #[test]
    fn forecasts_are_never_negative_and_lower_never_exceeds_point(
        history in demand_series(40),
        horizon in 1usize..24,
    ) {
        for model in [
            Box::new(HoltWintersModel::new(12)) as Box<dyn ForecastModel>,
            Box::new(ArimaModel::new()),
            Box::new(AutoArimaModel::new()),
        ] {
            let result = model.forecast(&history, horizon);
            if !history.is_empty() {
                prop_assert_eq!(result.len(), horizon, "model {}", model.name());
            }
            for i in 0..result.len() {
                prop_assert!(result.point[i] >= 0.0);
                prop_assert!(result.lower[i] >= 0.0);
                prop_assert!(result.lower[i] <= result.point[i] + 1e-9);
                prop_assert!(result.upper[i] >= result.point[i] - 1e-9);
            }
        }
    }

    #[test]
    fn short_histories_forecast_flat(
        history in prop::collection::vec(0.0f64..500.0, 1..23),
        horizon in 1usize..13,
    ) {
        // fewer than two seasons means Holt-Winters repeats the last value
        let result = HoltWintersModel::new(12).forecast(&history, horizon);
        let last = *history.last().unwrap();
        for v in &result.point {
            prop_assert!((v - last.max(0.0)).abs() < 1e-9);
        }
    }

    #[test]
    fn constant_series_stays_constant_under_ar1(
        value in 0.0f64..500.0,
        len in 2usize..30,
        horizon in 1usize..36,
    ) {
        let history = vec![value; len];
        let result = ArimaModel::new().forecast(&history, horizon);
        for v in &result.point {
            prop_assert!((v - value).abs() < 1e-6);
        }
    }

    #[test]
    fn empty_history_yields_zero_forecasts(horizon in 1usize..13) {
        let result = ArimaModel::new().forecast(&[], horizon);
        prop_assert_eq!(result.point, vec![0.0; horizon]);
        let result = AutoArimaModel::new().forecast(&[], horizon);
        prop_assert_eq!(result.point, vec![0.0; horizon]);
    }
}

proptest! {
    #[test]
    fn daily_allocation_exactly_covers_the_future_month(
        prediction in 0i64..10_000,
        day_of_month in 1u32..29,
    ) {
        let today = NaiveDate::from_ymd_opt(2026, 8, day_of_month).unwrap();
        let next = YearMonth::new(2026, 9).unwrap();
        let forecasts = HashMap::from([(next, prediction)]);
        let outcome = DailyForecaster::new().forecast(&HashMap::new(), today, &forecasts);

        let total: i64 = outcome
            .day_forecasts
            .iter()
            .filter(|(d, _)| next.contains(**d))
            .map(|(_, v)| *v)
            .sum();
        prop_assert_eq!(total, prediction);
        prop_assert!(outcome.day_forecasts.values().all(|&v| v >= 0));
    }

    #[test]
    fn current_month_allocation_never_exceeds_prediction_minus_sales(
        prediction in 0i64..1_000,
        sold in 0i64..1_000,
    ) {
        let today = NaiveDate::from_ymd_opt(2026, 8, 10).unwrap();
        let aug = YearMonth::new(2026, 8).unwrap();
        let actuals = HashMap::from([(NaiveDate::from_ymd_opt(2026, 8, 5).unwrap(), sold)]);
        let forecasts = HashMap::from([(aug, prediction)]);
        let outcome = DailyForecaster::new().forecast(&actuals, today, &forecasts);

        let total: i64 = outcome
            .day_forecasts
            .iter()
            .filter(|(d, _)| aug.contains(**d))
            .map(|(_, v)| *v)
            .sum();
        prop_assert_eq!(total, (prediction - sold).max(0));
    }
}
