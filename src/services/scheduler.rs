//! Background refresh of persisted forecasts.
//!
//! Runs one refresh immediately at startup so the API has data, then
//! repeats on a fixed interval. Every registered model is refreshed for
//! dishes and ingredients with persistence enabled, mirroring what the
//! read endpoints compute on demand.

use std::sync::Arc;
use std::time::Duration;

use strum::IntoEnumIterator;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, instrument};

use crate::ml::ModelKind;
use crate::services::forecasting::{DishForecastService, ForecastQuery, IngredientForecastService};

pub struct ForecastScheduler {
    dish_forecasts: Arc<DishForecastService>,
    ingredient_forecasts: Arc<IngredientForecastService>,
    interval: Duration,
}

impl ForecastScheduler {
    pub fn new(
        dish_forecasts: Arc<DishForecastService>,
        ingredient_forecasts: Arc<IngredientForecastService>,
        refresh_interval_hours: u64,
    ) -> Self {
        Self {
            dish_forecasts,
            ingredient_forecasts,
            interval: Duration::from_secs(refresh_interval_hours * 3600),
        }
    }

    /// Spawns the refresh loop. The first tick fires immediately.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                self.refresh_all().await;
            }
        })
    }

    #[instrument(skip(self))]
    pub async fn refresh_all(&self) {
        info!("refreshing persisted forecasts");
        for kind in ModelKind::iter() {
            let query = ForecastQuery {
                model: Some(kind),
                ..ForecastQuery::default()
            };
            if let Err(err) = self.dish_forecasts.dish_forecasts(&query, true).await {
                error!(model = %kind, error = %err, "dish forecast refresh failed");
            }
            if let Err(err) = self
                .ingredient_forecasts
                .ingredient_forecasts(&query, true)
                .await
            {
                error!(model = %kind, error = %err, "ingredient forecast refresh failed");
            }
        }
        info!("forecast refresh complete");
    }
}
