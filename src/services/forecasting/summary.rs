//! Restaurant-wide forecast totals for the overview chart.

use crate::dto::{DishForecastDto, SummaryForecastDto};
use crate::models::ScaleData;

/// Sums every dish forecast per scale. Labels come from the first dish,
/// truncated to the shortest contributor so the summed positions line up;
/// positions where no dish has a value stay empty instead of showing a
/// fake zero.
pub fn summarize(forecasts: &[DishForecastDto]) -> SummaryForecastDto {
    if forecasts.is_empty() {
        return SummaryForecastDto::default();
    }
    SummaryForecastDto {
        monthly: sum_scale(forecasts, |d| &d.monthly),
        daily: sum_scale(forecasts, |d| &d.daily),
        hourly: sum_scale(forecasts, |d| &d.hourly),
    }
}

fn sum_scale<'a>(
    forecasts: &'a [DishForecastDto],
    scale_of: impl Fn(&'a DishForecastDto) -> &'a ScaleData,
) -> ScaleData {
    let min_len = forecasts
        .iter()
        .map(|d| scale_of(d).len())
        .min()
        .unwrap_or(0);
    if min_len == 0 {
        return ScaleData::default();
    }

    let mut out = ScaleData {
        labels: scale_of(&forecasts[0]).labels[..min_len].to_vec(),
        actual: vec![None; min_len],
        forecast: vec![None; min_len],
    };
    for dish in forecasts {
        let scale = scale_of(dish);
        for i in 0..min_len {
            if let Some(v) = scale.actual[i] {
                *out.actual[i].get_or_insert(0) += v;
            }
            if let Some(v) = scale.forecast[i] {
                *out.forecast[i].get_or_insert(0) += v;
            }
        }
    }
    out
}
