//! Forecast accuracy metrics and walk-forward cross validation.

use serde::Serialize;
use utoipa::ToSchema;

use super::ForecastModel;

/// Accuracy metrics for one model over one series. `NAN` means the series
/// was too short to evaluate; it serializes as `null`.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct CvMetrics {
    pub mape: f64,
    pub rmse: f64,
}

impl CvMetrics {
    pub fn unavailable() -> Self {
        Self {
            mape: f64::NAN,
            rmse: f64::NAN,
        }
    }
}

/// Mean absolute percentage error, in percent.
///
/// Zero actuals contribute nothing to the numerator but still count in the
/// denominator, so sparse series are not inflated by the few months they
/// did sell.
pub fn mape(actual: &[f64], forecast: &[f64]) -> f64 {
    let n = actual.len().min(forecast.len());
    if n == 0 {
        return f64::NAN;
    }
    let mut sum = 0.0;
    for i in 0..n {
        if actual[i] != 0.0 {
            sum += ((actual[i] - forecast[i]) / actual[i]).abs();
        }
    }
    sum / n as f64 * 100.0
}

/// Root mean squared error over every element.
pub fn rmse(actual: &[f64], forecast: &[f64]) -> f64 {
    let n = actual.len().min(forecast.len());
    if n == 0 {
        return f64::NAN;
    }
    let sse: f64 = (0..n).map(|i| (actual[i] - forecast[i]).powi(2)).sum();
    (sse / n as f64).sqrt()
}

/// Walk-forward cross validation with an expanding training window.
///
/// The series splits into `folds` contiguous chunks. Each evaluated fold
/// trains on everything before it and forecasts its own length; the last
/// fold absorbs the division remainder. Series shorter than `folds + 1`
/// cannot produce a single train/test split and score as unavailable.
pub fn cross_validate(model: &dyn ForecastModel, series: &[f64], folds: usize) -> CvMetrics {
    if folds < 2 || series.len() < folds + 1 {
        return CvMetrics::unavailable();
    }
    let fold_size = series.len() / folds;
    let mut mape_sum = 0.0;
    let mut rmse_sum = 0.0;
    let mut evaluated = 0usize;
    for i in 1..folds {
        let split = fold_size * i;
        let end = if i == folds - 1 {
            series.len()
        } else {
            split + fold_size
        };
        let train = &series[..split];
        let test = &series[split..end];
        if train.is_empty() || test.is_empty() {
            continue;
        }
        let result = model.forecast(train, test.len());
        mape_sum += mape(test, &result.point);
        rmse_sum += rmse(test, &result.point);
        evaluated += 1;
    }
    if evaluated == 0 {
        return CvMetrics::unavailable();
    }
    CvMetrics {
        mape: mape_sum / evaluated as f64,
        rmse: rmse_sum / evaluated as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::ArimaModel;
    use test_case::test_case;

    // zero actuals are skipped in the numerator but counted in the divisor
    #[test_case(&[10.0, 0.0], &[5.0, 3.0], 25.0; "zero actual still divides")]
    #[test_case(&[10.0], &[10.0], 0.0; "perfect forecast")]
    #[test_case(&[0.0, 0.0], &[3.0, 4.0], 0.0; "all zero actuals")]
    fn mape_cases(actual: &[f64], forecast: &[f64], expected: f64) {
        assert!((mape(actual, forecast) - expected).abs() < 1e-9);
    }

    #[test]
    fn mape_of_empty_series_is_nan() {
        assert!(mape(&[], &[]).is_nan());
    }

    #[test]
    fn rmse_over_every_element() {
        assert!((rmse(&[1.0, 2.0], &[1.0, 4.0]) - 2.0_f64.sqrt()).abs() < 1e-9);
        assert_eq!(rmse(&[5.0], &[5.0]), 0.0);
        assert!(rmse(&[], &[]).is_nan());
    }

    #[test]
    fn cross_validate_too_short_series_is_unavailable() {
        let model = ArimaModel::new();
        let metrics = cross_validate(&model, &[1.0, 2.0, 3.0], 3);
        assert!(metrics.mape.is_nan());
        assert!(metrics.rmse.is_nan());
    }

    #[test]
    fn cross_validate_perfect_model_on_flat_series_scores_zero() {
        let model = ArimaModel::new();
        // flat series, AR(1) on [..split] forecasts the last value
        let series = vec![5.0; 12];
        let metrics = cross_validate(&model, &series, 3);
        assert!(metrics.mape.abs() < 1e-6);
        assert!(metrics.rmse.abs() < 1e-6);
    }
}
