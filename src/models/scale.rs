use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One chart-ready time scale: parallel label/actual/forecast sequences.
///
/// For any index at most one of `actual`/`forecast` is set: past buckets
/// carry the observed total, future buckets carry the predicted one. The
/// past/future split is fixed by "now" at generation time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ScaleData {
    pub labels: Vec<String>,
    pub actual: Vec<Option<i64>>,
    pub forecast: Vec<Option<i64>>,
}

impl ScaleData {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            labels: Vec::with_capacity(capacity),
            actual: Vec::with_capacity(capacity),
            forecast: Vec::with_capacity(capacity),
        }
    }

    pub fn push_actual(&mut self, label: impl Into<String>, value: i64) {
        self.labels.push(label.into());
        self.actual.push(Some(value));
        self.forecast.push(None);
    }

    pub fn push_forecast(&mut self, label: impl Into<String>, value: i64) {
        self.labels.push(label.into());
        self.actual.push(None);
        self.forecast.push(Some(value));
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Sum of forecast values whose label starts with `prefix`.
    pub fn forecast_sum_with_prefix(&self, prefix: &str) -> i64 {
        self.labels
            .iter()
            .zip(&self.forecast)
            .filter(|(label, _)| label.starts_with(prefix))
            .filter_map(|(_, v)| *v)
            .sum()
    }
}
