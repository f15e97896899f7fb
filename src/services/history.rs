//! Order history aggregation feeding every forecaster.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use tracing::debug;
use uuid::Uuid;

use crate::entities::Order;
use crate::errors::ServiceError;
use crate::models::YearMonth;
use crate::repositories::OrderRepository;

/// Completed-order demand bucketed by hour, day and month per dish, plus a
/// restaurant-wide monthly total used for model evaluation.
#[derive(Debug, Default)]
pub struct OrderHistory {
    pub hourly: HashMap<Uuid, HashMap<NaiveDate, [i64; 24]>>,
    pub daily: HashMap<Uuid, HashMap<NaiveDate, i64>>,
    pub monthly: HashMap<Uuid, HashMap<YearMonth, i64>>,
    pub global_monthly: HashMap<YearMonth, i64>,
}

impl OrderHistory {
    pub fn from_orders(orders: &[Order]) -> Self {
        let mut history = OrderHistory::default();
        for order in orders {
            let date = order.created_at.date();
            let hour = order.created_at.hour() as usize;
            let ym = YearMonth::from_date(date);
            for item in &order.items {
                let qty = item.quantity;
                history
                    .hourly
                    .entry(item.dish_id)
                    .or_default()
                    .entry(date)
                    .or_insert([0; 24])[hour] += qty;
                *history
                    .daily
                    .entry(item.dish_id)
                    .or_default()
                    .entry(date)
                    .or_insert(0) += qty;
                *history
                    .monthly
                    .entry(item.dish_id)
                    .or_default()
                    .entry(ym)
                    .or_insert(0) += qty;
                *history.global_monthly.entry(ym).or_insert(0) += qty;
            }
        }
        history
    }

    /// Restaurant-wide monthly totals for the trailing 24 months plus the
    /// current month, oldest first, absent months as zero.
    pub fn global_series(&self, current: YearMonth) -> Vec<f64> {
        let start = current.minus_months(24);
        (0..=24)
            .map(|i| {
                self.global_monthly
                    .get(&start.plus_months(i))
                    .copied()
                    .unwrap_or(0) as f64
            })
            .collect()
    }

    pub fn dish_monthly(&self, dish_id: Uuid) -> Option<&HashMap<YearMonth, i64>> {
        self.monthly.get(&dish_id)
    }
}

/// Loads completed orders after a cutoff and folds them into an
/// [`OrderHistory`].
pub struct HistoryCollector {
    orders: Arc<dyn OrderRepository>,
}

impl HistoryCollector {
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        Self { orders }
    }

    pub async fn collect(&self, cutoff: NaiveDateTime) -> Result<OrderHistory, ServiceError> {
        let orders = self.orders.completed_orders_since(cutoff).await?;
        debug!(orders = orders.len(), %cutoff, "aggregating completed orders");
        Ok(OrderHistory::from_orders(&orders))
    }
}
