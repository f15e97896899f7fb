//! Auto selector between a naive mean model and AR(1).

use tracing::debug;

use super::arima::{fit_ar1, forecast_ar1};
use super::{evaluator, FittedParams, ForecastModel, ForecastResult};

/// Scores ARIMA(0,0,0) (the series mean) and AR(1) on the same one-step
/// window `t = 1..n-1` and forecasts with whichever has the lower RMSE.
/// An AR(1) RMSE of NaN loses the comparison, so degenerate fits fall back
/// to the mean.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoArimaModel;

impl AutoArimaModel {
    pub fn new() -> Self {
        Self
    }
}

impl ForecastModel for AutoArimaModel {
    fn name(&self) -> &'static str {
        "auto_arima"
    }

    fn forecast(&self, history: &[f64], horizon: usize) -> ForecastResult {
        if history.is_empty() {
            return ForecastResult::constant(0.0, horizon);
        }
        if history.len() == 1 {
            // both candidates reduce to a naive repeat
            return ForecastResult::constant(history[0], horizon);
        }

        let n = history.len();
        let mean = history.iter().sum::<f64>() / n as f64;
        let actual = &history[1..];
        let fitted = vec![mean; n - 1];
        let mean_rmse = evaluator::rmse(actual, &fitted);

        let ar1 = fit_ar1(history);
        debug!(ar1_rmse = ar1.rmse, mean_rmse, "auto selector window scored");

        if ar1.rmse <= mean_rmse {
            forecast_ar1(history, &ar1, horizon)
        } else {
            ForecastResult {
                params: FittedParams::Mean { mean },
                mape: Some(evaluator::mape(actual, &fitted)),
                rmse: Some(mean_rmse),
                ..ForecastResult::constant(mean, horizon)
            }
        }
    }
}
