//! Time-series models behind dish and ingredient demand forecasts.
//!
//! Models are pure: they take a demand series and a horizon and return
//! point forecasts with a 95% confidence band. Training happens inside
//! `forecast`, so callers never hold fitted state.

pub mod arima;
pub mod auto_arima;
pub mod evaluator;
pub mod holt_winters;

pub use arima::ArimaModel;
pub use auto_arima::AutoArimaModel;
pub use evaluator::{cross_validate, mape, rmse, CvMetrics};
pub use holt_winters::HoltWintersModel;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use utoipa::ToSchema;

/// A demand forecasting model over a single equally spaced series.
pub trait ForecastModel: Send + Sync {
    fn name(&self) -> &'static str;

    /// Forecast `horizon` steps past the end of `history`.
    fn forecast(&self, history: &[f64], horizon: usize) -> ForecastResult;
}

/// Parameters fitted during a model run, surfaced through the details
/// endpoint for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FittedParams {
    /// Fallback paths (empty, single-point or short histories) fit nothing.
    #[default]
    None,
    /// Holt-Winters smoothing coefficients chosen by the grid search.
    Smoothing { alpha: f64, beta: f64, gamma: f64 },
    /// AR(1) coefficient.
    Autoregressive { phi: f64 },
    /// The auto selector picked the series mean.
    Mean { mean: f64 },
}

/// Point forecasts plus a 95% confidence band, all three the same length,
/// with the fitted parameters and held-out accuracy behind the run.
/// Point values and lower bounds never go below zero; demand cannot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastResult {
    pub point: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    pub params: FittedParams,
    pub mape: Option<f64>,
    pub rmse: Option<f64>,
}

impl ForecastResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.point.len()
    }

    pub fn is_empty(&self) -> bool {
        self.point.is_empty()
    }

    /// Flat forecast at `value` with a degenerate confidence band and no
    /// fitted parameters.
    pub fn constant(value: f64, horizon: usize) -> Self {
        let v = value.max(0.0);
        Self {
            point: vec![v; horizon],
            lower: vec![v; horizon],
            upper: vec![v; horizon],
            ..Self::default()
        }
    }
}

/// The model families exposed through the API and the scheduler.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    ToSchema,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    HoltWinters,
    Arima,
    AutoArima,
}

impl ModelKind {
    pub fn build(self, period: usize) -> Box<dyn ForecastModel> {
        match self {
            ModelKind::HoltWinters => Box::new(HoltWintersModel::new(period)),
            ModelKind::Arima => Box::new(ArimaModel::new()),
            ModelKind::AutoArima => Box::new(AutoArimaModel::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn model_kind_serializes_snake_case() {
        assert_eq!(ModelKind::HoltWinters.to_string(), "holt_winters");
        assert_matches::assert_matches!("auto_arima".parse::<ModelKind>(), Ok(ModelKind::AutoArima));
        assert_matches::assert_matches!("sarimax".parse::<ModelKind>(), Err(_));
    }

    #[test]
    fn every_kind_builds_a_named_model() {
        for kind in ModelKind::iter() {
            let model = kind.build(12);
            assert_eq!(model.name(), kind.to_string());
        }
    }
}
