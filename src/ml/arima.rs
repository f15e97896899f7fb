//! AR(1) forecaster with OLS coefficient estimation and 95% bands.

use tracing::debug;

use super::{evaluator, FittedParams, ForecastModel, ForecastResult};

const Z95: f64 = 1.96;
// Keep |phi| <= 1 so a perfectly flat series stays flat at every horizon.
const PHI_CLAMP: f64 = 1.0;

/// ARIMA(1,0,0) surrogate: `y_t = phi * y_{t-1}` with phi fitted by least
/// squares and diagnostics on the one-step-ahead in-sample fit.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArimaModel;

impl ArimaModel {
    pub fn new() -> Self {
        Self
    }
}

/// Fitted AR(1) state shared with the auto selector. Requires `len >= 2`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Ar1Fit {
    pub phi: f64,
    pub sigma2: f64,
    pub mape: f64,
    pub rmse: f64,
}

pub(crate) fn fit_ar1(history: &[f64]) -> Ar1Fit {
    let n = history.len();
    let mut num = 0.0;
    let mut den = 0.0;
    for t in 1..n {
        num += history[t] * history[t - 1];
        den += history[t - 1] * history[t - 1];
    }
    let phi = if den == 0.0 {
        0.0
    } else {
        (num / den).clamp(-PHI_CLAMP, PHI_CLAMP)
    };

    // One-step-ahead diagnostics on t = 1..n-1, the same window the auto
    // selector scores the mean model on.
    let mut sse = 0.0;
    let mut fitted = Vec::with_capacity(n - 1);
    for t in 1..n {
        let predicted = phi * history[t - 1];
        let e = history[t] - predicted;
        sse += e * e;
        fitted.push(predicted);
    }
    let sigma2 = sse / (n - 1) as f64;
    Ar1Fit {
        phi,
        sigma2,
        mape: evaluator::mape(&history[1..], &fitted),
        rmse: sigma2.sqrt(),
    }
}

pub(crate) fn forecast_ar1(history: &[f64], fit: &Ar1Fit, horizon: usize) -> ForecastResult {
    let mut result = ForecastResult {
        params: FittedParams::Autoregressive { phi: fit.phi },
        mape: Some(fit.mape),
        rmse: Some(fit.rmse),
        ..ForecastResult::default()
    };
    let mut last = history[history.len() - 1];
    let denom = 1.0 - fit.phi * fit.phi;
    for h in 1..=horizon {
        last = fit.phi * last;
        let point = last.max(0.0);
        let var_h = if denom.abs() < 1e-12 {
            // unit root: forecast error grows linearly
            fit.sigma2 * h as f64
        } else {
            fit.sigma2 * (1.0 - fit.phi.powi(2 * h as i32)) / denom
        };
        let se = var_h.max(0.0).sqrt();
        result.point.push(point);
        result.lower.push((point - Z95 * se).max(0.0));
        result.upper.push(point + Z95 * se);
    }
    result
}

impl ForecastModel for ArimaModel {
    fn name(&self) -> &'static str {
        "arima"
    }

    fn forecast(&self, history: &[f64], horizon: usize) -> ForecastResult {
        if history.is_empty() {
            return ForecastResult::constant(0.0, horizon);
        }
        if history.len() == 1 {
            return ForecastResult::constant(history[0], horizon);
        }
        let fit = fit_ar1(history);
        debug!(phi = fit.phi, rmse = fit.rmse, "fitted ar(1)");
        forecast_ar1(history, &fit, horizon)
    }
}
