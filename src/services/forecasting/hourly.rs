//! Allocation of daily predictions onto hours of the day.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};

use crate::models::ScaleData;

use super::daily::DailyOutcome;

pub const TIMELINE_DAYS: i64 = 15;
pub const PAST_TIMELINE_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, Default)]
pub struct HourlyForecaster;

impl HourlyForecaster {
    pub fn new() -> Self {
        Self
    }

    /// Builds a 15-day hourly timeline starting 7 days back. Hours before
    /// `now` show observed totals; future hours split that day's predicted
    /// quantity using an hour-of-day profile learned from the trailing
    /// `history_days` days (uniform when there is no history). Each future
    /// day's hours are reconciled to sum exactly to its daily prediction.
    pub fn forecast(
        &self,
        dish_hours: &HashMap<NaiveDate, [i64; 24]>,
        today: NaiveDate,
        now: NaiveDateTime,
        daily: &DailyOutcome,
        history_days: u32,
    ) -> ScaleData {
        let weights = hour_weights(dish_hours, today, history_days);

        let mut scale = ScaleData::with_capacity((TIMELINE_DAYS * 24) as usize);
        let mut alloc_cache: HashMap<NaiveDate, [i64; 24]> = HashMap::new();
        let start = (today - Duration::days(PAST_TIMELINE_DAYS))
            .and_time(chrono::NaiveTime::MIN);
        for i in 0..TIMELINE_DAYS * 24 {
            let dt = start + Duration::hours(i);
            let label = dt.format("%m-%d %H:00").to_string();
            let date = dt.date();
            let hour = dt.hour() as usize;
            if dt < now {
                let observed = dish_hours.get(&date).map_or(0, |arr| arr[hour]);
                scale.push_actual(label, observed);
            } else {
                let alloc = alloc_cache.entry(date).or_insert_with(|| {
                    let day_pred = daily.day_forecasts.get(&date).copied().unwrap_or(0);
                    distribute(day_pred, &weights)
                });
                scale.push_forecast(label, alloc[hour]);
            }
        }
        reconcile(&mut scale, daily, today);
        scale
    }
}

/// Hour-of-day demand profile from full days before `today` within the
/// trailing window. Falls back to a uniform profile when those days saw
/// no orders.
fn hour_weights(
    dish_hours: &HashMap<NaiveDate, [i64; 24]>,
    today: NaiveDate,
    history_days: u32,
) -> [f64; 24] {
    let window_start = today - Duration::days(history_days as i64);
    let mut weights = [0.0f64; 24];
    let mut total = 0.0;
    for (date, arr) in dish_hours {
        if *date < today && *date >= window_start {
            for h in 0..24 {
                weights[h] += arr[h] as f64;
                total += arr[h] as f64;
            }
        }
    }
    if total == 0.0 {
        [1.0 / 24.0; 24]
    } else {
        weights.map(|w| w / total)
    }
}

/// Splits `total` across 24 hours proportionally to `weights`: floor of
/// each share first, then leftovers one by one to the heaviest hours
/// (earlier hour wins a tie).
fn distribute(total: i64, weights: &[f64; 24]) -> [i64; 24] {
    let mut arr = [0i64; 24];
    let mut remaining = total;
    for h in 0..24 {
        let val = (total as f64 * weights[h]).floor() as i64;
        arr[h] = val;
        remaining -= val;
    }
    let mut order: Vec<usize> = (0..24).collect();
    order.sort_by(|&a, &b| {
        weights[b]
            .partial_cmp(&weights[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });
    let mut idx = 0;
    while remaining > 0 {
        arr[order[idx % 24]] += 1;
        remaining -= 1;
        idx += 1;
    }
    arr
}

/// Forces each future day's hourly sum to match its daily prediction.
/// A shortfall lands on the day's latest hour; an excess is walked back
/// from the latest hour without driving any bucket negative.
fn reconcile(scale: &mut ScaleData, daily: &DailyOutcome, today: NaiveDate) {
    for offset in 1..TIMELINE_DAYS - PAST_TIMELINE_DAYS {
        let date = today + Duration::days(offset);
        let Some(&day_pred) = daily.day_forecasts.get(&date) else {
            continue;
        };
        let prefix = date.format("%m-%d").to_string();
        let indices: Vec<usize> = (0..scale.len())
            .filter(|&i| scale.labels[i].starts_with(&prefix) && scale.forecast[i].is_some())
            .collect();
        if indices.is_empty() {
            continue;
        }
        let sum: i64 = indices.iter().filter_map(|&i| scale.forecast[i]).sum();
        let mut diff = day_pred - sum;
        if diff > 0 {
            let last = *indices.last().unwrap_or(&0);
            if let Some(v) = scale.forecast[last].as_mut() {
                *v += diff;
            }
        } else {
            for &i in indices.iter().rev() {
                if diff == 0 {
                    break;
                }
                if let Some(v) = scale.forecast[i].as_mut() {
                    let cut = (-diff).min(*v);
                    *v -= cut;
                    diff += cut;
                }
            }
        }
    }
}
