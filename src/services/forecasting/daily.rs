//! Allocation of monthly predictions onto individual days.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};

use crate::models::{ScaleData, YearMonth};

pub const PAST_DAYS: i64 = 30;

/// Output of the daily pass: the chart scale plus a per-day lookup the
/// hourly allocator uses, covering every forecast day exactly.
#[derive(Debug, Clone, Default)]
pub struct DailyOutcome {
    pub scale: ScaleData,
    pub day_forecasts: HashMap<NaiveDate, i64>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DailyForecaster;

impl DailyForecaster {
    pub fn new() -> Self {
        Self
    }

    /// Shows the past 31 days of actuals, then spreads each month's
    /// predicted quantity evenly over that month's future days, remainder
    /// to the earliest days. For the current month the amount already sold
    /// through today is subtracted first, floored at zero. By construction
    /// a fully future month's daily values sum exactly to its monthly
    /// prediction.
    pub fn forecast(
        &self,
        dish_daily: &HashMap<NaiveDate, i64>,
        today: NaiveDate,
        month_forecasts: &HashMap<YearMonth, i64>,
    ) -> DailyOutcome {
        let mut outcome = DailyOutcome::default();
        for i in -PAST_DAYS..=0 {
            let day = today + Duration::days(i);
            let val = dish_daily.get(&day).copied().unwrap_or(0);
            outcome.scale.push_actual(day.to_string(), val);
        }

        let current_month = YearMonth::from_date(today);
        // tomorrow through the end of next month
        for ym in [current_month, current_month.plus_months(1)] {
            let month_pred = month_forecasts.get(&ym).copied().unwrap_or(0);
            let remaining = if ym == current_month {
                let sold: i64 = dish_daily
                    .iter()
                    .filter(|(d, _)| ym.contains(**d) && **d <= today)
                    .map(|(_, v)| v)
                    .sum();
                (month_pred - sold).max(0)
            } else {
                month_pred
            };

            let days: Vec<NaiveDate> = (1..=ym.length())
                .filter_map(|d| NaiveDate::from_ymd_opt(ym.year(), ym.month(), d))
                .filter(|d| *d > today)
                .collect();
            if days.is_empty() {
                continue;
            }
            let base = remaining / days.len() as i64;
            let extra = remaining % days.len() as i64;
            for (i, day) in days.iter().enumerate() {
                let val = base + if (i as i64) < extra { 1 } else { 0 };
                outcome.scale.push_forecast(day.to_string(), val);
                outcome.day_forecasts.insert(*day, val);
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn future_month_sums_exactly_to_its_prediction() {
        let today = day(2026, 8, 30);
        let sep = YearMonth::new(2026, 9).unwrap();
        let forecasts = HashMap::from([(sep, 100_i64)]);
        let outcome = DailyForecaster::new().forecast(&HashMap::new(), today, &forecasts);

        let total: i64 = outcome
            .day_forecasts
            .iter()
            .filter(|(d, _)| sep.contains(**d))
            .map(|(_, v)| v)
            .sum();
        assert_eq!(total, 100);
        // 100 over 30 days: first 10 days get 4, the rest 3
        assert_eq!(outcome.day_forecasts[&day(2026, 9, 1)], 4);
        assert_eq!(outcome.day_forecasts[&day(2026, 9, 30)], 3);
    }

    #[test]
    fn current_month_subtracts_actual_sales_so_far() {
        let today = day(2026, 8, 29);
        let aug = YearMonth::new(2026, 8).unwrap();
        let actuals = HashMap::from([(day(2026, 8, 10), 40_i64), (day(2026, 8, 20), 15)]);
        let forecasts = HashMap::from([(aug, 60_i64)]);
        let outcome = DailyForecaster::new().forecast(&actuals, today, &forecasts);

        // 60 predicted - 55 sold = 5 left over the remaining 2 days
        assert_eq!(outcome.day_forecasts[&day(2026, 8, 30)], 3);
        assert_eq!(outcome.day_forecasts[&day(2026, 8, 31)], 2);
    }

    #[test]
    fn oversold_current_month_never_goes_negative() {
        let today = day(2026, 8, 29);
        let aug = YearMonth::new(2026, 8).unwrap();
        let actuals = HashMap::from([(day(2026, 8, 10), 90_i64)]);
        let forecasts = HashMap::from([(aug, 60_i64)]);
        let outcome = DailyForecaster::new().forecast(&actuals, today, &forecasts);

        assert_eq!(outcome.day_forecasts[&day(2026, 8, 30)], 0);
        assert_eq!(outcome.day_forecasts[&day(2026, 8, 31)], 0);
    }

    #[test]
    fn window_covers_past_31_days_and_through_next_month() {
        let today = day(2026, 8, 30);
        let outcome = DailyForecaster::new().forecast(&HashMap::new(), today, &HashMap::new());
        assert_eq!(outcome.scale.labels.first().unwrap(), "2026-07-31");
        assert_eq!(outcome.scale.labels.last().unwrap(), "2026-09-30");
        // 31 past + 1 current-month future + 30 next-month days
        assert_eq!(outcome.scale.len(), 62);
    }
}
