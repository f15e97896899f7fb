//! Demand forecasting pipeline: monthly model projections distributed
//! down to days and hours, per dish and aggregated per ingredient.

pub mod daily;
pub mod hourly;
pub mod ingredients;
pub mod monthly;
pub mod summary;

pub use daily::DailyForecaster;
pub use hourly::HourlyForecaster;
pub use ingredients::IngredientForecastService;
pub use monthly::{MonthlyForecaster, MonthlyOutcome};
pub use summary::summarize;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime};
use dashmap::DashMap;
use serde::Deserialize;
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument};
use utoipa::IntoParams;
use uuid::Uuid;

use crate::config::ForecastConfig;
use crate::dto::{DishForecastDto, ForecastDetailsDto, ModelMetricsDto};
use crate::entities::Category;
use crate::errors::ServiceError;
use crate::ml::{cross_validate, CvMetrics, FittedParams, ModelKind};
use crate::models::{Page, PageRequest};
use crate::repositories::{DishRepository, ForecastSink, OrderRepository};
use crate::services::history::{HistoryCollector, OrderHistory};

/// Query surface of the dish forecast endpoint.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ForecastQuery {
    /// Model to forecast with; defaults to Holt-Winters.
    pub model: Option<ModelKind>,
    /// Case-insensitive dish name fragment.
    pub filter: Option<String>,
    pub category: Option<Category>,
    /// Days of history for the hour-of-day profile.
    pub history_days: Option<u32>,
    /// Store the monthly predictions, replacing today's rows.
    pub persist: Option<bool>,
    /// Zero-based page index.
    pub page: Option<usize>,
    /// Items per page; omit for everything.
    pub per_page: Option<usize>,
}

impl ForecastQuery {
    pub fn page_request(&self) -> Option<PageRequest> {
        self.per_page.map(|per_page| PageRequest {
            page: self.page.unwrap_or(0),
            per_page,
        })
    }
}

#[derive(Debug, Clone)]
struct CachedDetails {
    history: Vec<f64>,
    point: Vec<f64>,
    lower: Vec<f64>,
    upper: Vec<f64>,
    params: FittedParams,
    mape: Option<f64>,
    rmse: Option<f64>,
    single_point: bool,
    no_data: bool,
}

/// Produces dish demand forecasts and remembers, per model and dish, the
/// series and projection behind the latest run.
pub struct DishForecastService {
    dishes: Arc<dyn DishRepository>,
    collector: HistoryCollector,
    monthly: MonthlyForecaster,
    daily: DailyForecaster,
    hourly: HourlyForecaster,
    config: ForecastConfig,
    details: DashMap<(ModelKind, Uuid), CachedDetails>,
    metrics: DashMap<ModelKind, CvMetrics>,
}

impl DishForecastService {
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        dishes: Arc<dyn DishRepository>,
        sink: Arc<dyn ForecastSink>,
        config: ForecastConfig,
    ) -> Self {
        Self {
            dishes,
            collector: HistoryCollector::new(orders),
            monthly: MonthlyForecaster::new(sink, &config),
            daily: DailyForecaster::new(),
            hourly: HourlyForecaster::new(),
            config,
            details: DashMap::new(),
            metrics: DashMap::new(),
        }
    }

    /// Builds forecasts for every dish matching the query. With `persist`
    /// the monthly predictions also replace today's stored rows.
    #[instrument(skip(self))]
    pub async fn dish_forecasts(
        &self,
        query: &ForecastQuery,
        persist: bool,
    ) -> Result<Page<DishForecastDto>, ServiceError> {
        let now = Local::now().naive_local();
        self.dish_forecasts_at(query, persist, now).await
    }

    /// Same as [`dish_forecasts`](Self::dish_forecasts) with an explicit
    /// clock, which keeps the window arithmetic testable.
    pub async fn dish_forecasts_at(
        &self,
        query: &ForecastQuery,
        persist: bool,
        now: NaiveDateTime,
    ) -> Result<Page<DishForecastDto>, ServiceError> {
        let today = now.date();
        let model_kind = query.model.unwrap_or(ModelKind::HoltWinters);
        let model = model_kind.build(self.config.period);
        let history_days = query.history_days.unwrap_or(self.config.default_history_days);

        let history = self.collector.collect(history_cutoff(today)).await?;
        self.refresh_metrics(&history, today);

        let dishes = self
            .dishes
            .active_dishes(query.filter.as_deref(), query.category)
            .await?;
        debug!(dishes = dishes.len(), model = %model_kind, "building dish forecasts");

        let mut result = Vec::with_capacity(dishes.len());
        for dish in &dishes {
            let outcome = self
                .monthly
                .forecast(dish, &history, model.as_ref(), today, persist)
                .await?;
            let empty_daily = HashMap::new();
            let dish_daily = history.daily.get(&dish.id).unwrap_or(&empty_daily);
            let daily = self
                .daily
                .forecast(dish_daily, today, &outcome.month_forecasts);
            let empty_hourly = HashMap::new();
            let dish_hours = history.hourly.get(&dish.id).unwrap_or(&empty_hourly);
            let hourly = self
                .hourly
                .forecast(dish_hours, today, now, &daily, history_days);

            self.details.insert(
                (model_kind, dish.id),
                CachedDetails {
                    history: outcome.model_history.clone(),
                    point: outcome.result.point.clone(),
                    lower: outcome.result.lower.clone(),
                    upper: outcome.result.upper.clone(),
                    params: outcome.result.params,
                    mape: outcome.result.mape,
                    rmse: outcome.result.rmse,
                    single_point: outcome.single_point,
                    no_data: outcome.no_data,
                },
            );

            result.push(DishForecastDto {
                id: dish.id,
                name: dish.name.clone(),
                category: dish.category,
                monthly: outcome.scale,
                daily: daily.scale,
                hourly,
                no_data: outcome.no_data,
                single_point: outcome.single_point,
                empty_forecast: outcome.empty_forecast,
            });
        }

        info!(
            dishes = result.len(),
            model = %model_kind,
            persist,
            "dish forecasts built"
        );
        Ok(Page::from_vec(result, query.page_request()))
    }

    /// Latest cached projection for one dish under one model, if that
    /// combination has been forecast since startup.
    pub fn details(&self, model: ModelKind, dish_id: Uuid) -> Option<ForecastDetailsDto> {
        self.details.get(&(model, dish_id)).map(|d| ForecastDetailsDto {
            history: d.history.clone(),
            forecasts: d.point.clone(),
            lower: d.lower.clone(),
            upper: d.upper.clone(),
            params: d.params,
            mape: d.mape,
            rmse: d.rmse,
            single_point: d.single_point,
            no_data: d.no_data,
        })
    }

    /// Cross-validation scores per model from the latest refresh.
    pub fn model_metrics(&self) -> Vec<ModelMetricsDto> {
        let mut out: Vec<ModelMetricsDto> = self
            .metrics
            .iter()
            .map(|e| ModelMetricsDto {
                model: e.key().to_string(),
                mape: finite(e.value().mape),
                rmse: finite(e.value().rmse),
            })
            .collect();
        out.sort_by(|a, b| a.model.cmp(&b.model));
        out
    }

    /// Walk-forward scores for every model over the restaurant-wide
    /// monthly series.
    fn refresh_metrics(&self, history: &OrderHistory, today: NaiveDate) {
        let series = history.global_series(crate::models::YearMonth::from_date(today));
        for kind in ModelKind::iter() {
            let model = kind.build(self.config.period);
            let metrics = cross_validate(model.as_ref(), &series, self.config.cv_folds);
            debug!(model = %kind, mape = metrics.mape, rmse = metrics.rmse, "model cross-validated");
            self.metrics.insert(kind, metrics);
        }
    }
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

/// Order history window: two years back from today.
pub fn history_cutoff(today: NaiveDate) -> NaiveDateTime {
    let date = today
        .with_year(today.year() - 2)
        .unwrap_or(today - Duration::days(730));
    date.and_time(chrono::NaiveTime::MIN)
}
