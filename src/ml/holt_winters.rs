//! Additive Holt-Winters (triple exponential smoothing) with a holdout
//! grid search over the smoothing coefficients.

use tracing::debug;

use super::{evaluator, FittedParams, ForecastModel, ForecastResult};

const Z95: f64 = 1.96;
const GRID_STEPS: usize = 10;

/// Seasonal forecaster for monthly demand. `period` is the season length,
/// 12 for calendar months.
///
/// With at least two full seasons of history the model holds out the last
/// season, grid searches alpha/beta/gamma over `{0.0, 0.1, .., 0.9}` for
/// the lowest holdout RMSE, then refits on the full series. Shorter
/// histories fall back to a flat repeat of the last observation.
#[derive(Debug, Clone, Copy)]
pub struct HoltWintersModel {
    period: usize,
}

impl HoltWintersModel {
    pub fn new(period: usize) -> Self {
        Self {
            period: period.max(1),
        }
    }
}

struct Fitted {
    level: f64,
    trend: f64,
    season: Vec<f64>,
    n: usize,
}

impl Fitted {
    fn predict(&self, k: usize) -> f64 {
        let idx = (self.n + k - 1) % self.season.len();
        (self.level + k as f64 * self.trend + self.season[idx]).max(0.0)
    }
}

/// Fit on `series` with first-cycle initialization. Requires
/// `series.len() >= period`.
fn fit(series: &[f64], period: usize, alpha: f64, beta: f64, gamma: f64) -> Fitted {
    let n = series.len();
    let mean1 = series[..period].iter().sum::<f64>() / period as f64;
    let mut season: Vec<f64> = series[..period].iter().map(|y| y - mean1).collect();
    let mut level = mean1;
    let mut trend = if n >= 2 * period {
        let mean2 = series[period..2 * period].iter().sum::<f64>() / period as f64;
        (mean2 - mean1) / period as f64
    } else {
        0.0
    };

    for t in period..n {
        let prev_level = level;
        let s = season[t % period];
        level = alpha * (series[t] - s) + (1.0 - alpha) * (prev_level + trend);
        trend = beta * (level - prev_level) + (1.0 - beta) * trend;
        season[t % period] = gamma * (series[t] - level) + (1.0 - gamma) * s;
    }
    Fitted {
        level,
        trend,
        season,
        n,
    }
}

fn holdout_rmse(train: &[f64], holdout: &[f64], period: usize, a: f64, b: f64, g: f64) -> f64 {
    let fitted = fit(train, period, a, b, g);
    let predicted: Vec<f64> = (1..=holdout.len()).map(|k| fitted.predict(k)).collect();
    evaluator::rmse(holdout, &predicted)
}

impl ForecastModel for HoltWintersModel {
    fn name(&self) -> &'static str {
        "holt_winters"
    }

    fn forecast(&self, history: &[f64], horizon: usize) -> ForecastResult {
        if history.is_empty() {
            return ForecastResult::empty();
        }
        let n = history.len();
        let p = self.period;
        if n < 2 * p {
            return ForecastResult::constant(history[n - 1], horizon);
        }

        let train = &history[..n - p];
        let holdout = &history[n - p..];
        let mut best = (0.0, 0.0, 0.0);
        let mut best_rmse = f64::INFINITY;
        for ai in 0..GRID_STEPS {
            for bi in 0..GRID_STEPS {
                for gi in 0..GRID_STEPS {
                    let (a, b, g) = (ai as f64 / 10.0, bi as f64 / 10.0, gi as f64 / 10.0);
                    let r = holdout_rmse(train, holdout, p, a, b, g);
                    if r < best_rmse {
                        best_rmse = r;
                        best = (a, b, g);
                    }
                }
            }
        }
        debug!(
            alpha = best.0,
            beta = best.1,
            gamma = best.2,
            rmse = best_rmse,
            "holt-winters grid search done"
        );

        // holdout accuracy under the winning triple, reported as-is
        let winner = fit(train, p, best.0, best.1, best.2);
        let predicted: Vec<f64> = (1..=holdout.len()).map(|k| winner.predict(k)).collect();
        let holdout_mape = evaluator::mape(holdout, &predicted);

        let fitted = fit(history, p, best.0, best.1, best.2);
        let mut result = ForecastResult {
            params: FittedParams::Smoothing {
                alpha: best.0,
                beta: best.1,
                gamma: best.2,
            },
            mape: Some(holdout_mape),
            rmse: Some(best_rmse),
            ..ForecastResult::default()
        };
        for k in 1..=horizon {
            let point = fitted.predict(k);
            let half = Z95 * best_rmse * ((k + 1) as f64).sqrt();
            result.point.push(point);
            result.lower.push((point - half).max(0.0));
            result.upper.push(point + half);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_history_gives_empty_forecast() {
        let r = HoltWintersModel::new(12).forecast(&[], 12);
        assert!(r.is_empty());
    }

    #[test]
    fn short_history_repeats_last_value() {
        let history = [3.0, 8.0, 2.0, 11.0];
        let r = HoltWintersModel::new(12).forecast(&history, 5);
        assert_eq!(r.point, vec![11.0; 5]);
    }

    #[test]
    fn seasonal_peak_survives_into_the_forecast() {
        // 3 years of monthly demand, december triples
        let mut history = Vec::new();
        for _ in 0..3 {
            for m in 0..12 {
                history.push(if m == 11 { 300.0 } else { 100.0 });
            }
        }
        let r = HoltWintersModel::new(12).forecast(&history, 12);
        assert_eq!(r.len(), 12);
        // the pattern repeats exactly, so the holdout fit is perfect and the
        // forecast reproduces the cycle
        for m in 0..12 {
            let expected = if m == 11 { 300.0 } else { 100.0 };
            assert!((r.point[m] - expected).abs() < 1e-6, "month {m}: {}", r.point[m]);
        }
        // perfect holdout fit collapses the band
        assert_eq!(r.lower, r.point);
        assert_eq!(r.upper, r.point);
    }

    #[test]
    fn bands_bracket_the_point_forecast() {
        let history: Vec<f64> = (0..30).map(|i| 50.0 + (i % 12) as f64 * 3.0).collect();
        let r = HoltWintersModel::new(12).forecast(&history, 6);
        for k in 0..6 {
            assert!(r.lower[k] <= r.point[k]);
            assert!(r.point[k] <= r.upper[k]);
            assert!(r.lower[k] >= 0.0);
        }
    }

    #[test]
    fn fitted_params_and_holdout_accuracy_are_reported() {
        let mut history = Vec::new();
        for _ in 0..3 {
            for m in 0..12 {
                history.push(if m == 11 { 300.0 } else { 100.0 });
            }
        }
        let r = HoltWintersModel::new(12).forecast(&history, 2);
        // a perfectly repeating cycle is matched by the frozen first-cycle
        // fit, the first grid point scored
        assert_eq!(
            r.params,
            FittedParams::Smoothing {
                alpha: 0.0,
                beta: 0.0,
                gamma: 0.0
            }
        );
        assert_eq!(r.rmse, Some(0.0));
        assert_eq!(r.mape, Some(0.0));
    }

    #[test]
    fn short_history_fallback_fits_nothing() {
        let r = HoltWintersModel::new(12).forecast(&[3.0, 8.0], 2);
        assert_eq!(r.params, FittedParams::None);
        assert_eq!(r.rmse, None);
        assert_eq!(r.mape, None);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn grid_choice_minimizes_holdout_rmse(
            raw in proptest::collection::vec(0u32..50, 24..40)
        ) {
            let history: Vec<f64> = raw.into_iter().map(f64::from).collect();
            let r = HoltWintersModel::new(12).forecast(&history, 1);
            let FittedParams::Smoothing { alpha, beta, gamma } = r.params else {
                panic!("two full seasons must fit smoothing parameters");
            };
            let train = &history[..history.len() - 12];
            let holdout = &history[history.len() - 12..];
            let chosen = holdout_rmse(train, holdout, 12, alpha, beta, gamma);
            prop_assert!((chosen - r.rmse.unwrap()).abs() < 1e-9);
            for ai in 0..GRID_STEPS {
                for bi in 0..GRID_STEPS {
                    for gi in 0..GRID_STEPS {
                        let rival = holdout_rmse(
                            train,
                            holdout,
                            12,
                            ai as f64 / 10.0,
                            bi as f64 / 10.0,
                            gi as f64 / 10.0,
                        );
                        prop_assert!(chosen <= rival, "({ai},{bi},{gi}) beats the chosen triple");
                    }
                }
            }
        }
    }

    #[test]
    fn exactly_two_seasons_is_enough_to_model() {
        let history: Vec<f64> = (0..24).map(|i| 10.0 + (i % 12) as f64).collect();
        let r = HoltWintersModel::new(12).forecast(&history, 3);
        // not the short-history flat fallback
        assert_ne!(r.point, vec![history[23]; 3]);
        assert_eq!(r.len(), 3);
    }
}
