//! Ingredient requirements derived from dish forecasts through recipes.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveDateTime};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::dto::{DishForecastDto, IngredientForecastDto};
use crate::entities::{Ingredient, IngredientForecastRow};
use crate::errors::ServiceError;
use crate::models::{Page, ScaleData, YearMonth};
use crate::repositories::{DishRepository, ForecastSink};

use super::{DishForecastService, ForecastQuery};

/// Aggregates dish-level forecasts into per-ingredient requirements by
/// multiplying each dish's demand by its recipe quantities.
pub struct IngredientForecastService {
    dish_forecasts: Arc<DishForecastService>,
    dishes: Arc<dyn DishRepository>,
    sink: Arc<dyn ForecastSink>,
}

impl IngredientForecastService {
    pub fn new(
        dish_forecasts: Arc<DishForecastService>,
        dishes: Arc<dyn DishRepository>,
        sink: Arc<dyn ForecastSink>,
    ) -> Self {
        Self {
            dish_forecasts,
            dishes,
            sink,
        }
    }

    /// Forecast demand per ingredient. The query's `filter` matches
    /// ingredient names; the category filter restricts which dishes
    /// contribute. With `persist` the monthly values replace today's
    /// stored ingredient rows.
    #[instrument(skip(self))]
    pub async fn ingredient_forecasts(
        &self,
        query: &ForecastQuery,
        persist: bool,
    ) -> Result<Page<IngredientForecastDto>, ServiceError> {
        let now = Local::now().naive_local();
        self.ingredient_forecasts_at(query, persist, now).await
    }

    /// Same as [`ingredient_forecasts`](Self::ingredient_forecasts) with an
    /// explicit clock, so dish and ingredient rows from one run share a
    /// generation date even across midnight.
    pub async fn ingredient_forecasts_at(
        &self,
        query: &ForecastQuery,
        persist: bool,
        now: NaiveDateTime,
    ) -> Result<Page<IngredientForecastDto>, ServiceError> {
        let dish_query = ForecastQuery {
            model: query.model,
            filter: None,
            category: query.category,
            history_days: query.history_days,
            persist: None,
            page: None,
            per_page: None,
        };
        let dish_page = self
            .dish_forecasts
            .dish_forecasts_at(&dish_query, persist, now)
            .await?;
        if dish_page.items.is_empty() {
            return Ok(Page::from_vec(Vec::new(), query.page_request()));
        }

        let recipes: HashMap<Uuid, _> = self
            .dishes
            .active_dishes(None, None)
            .await?
            .into_iter()
            .map(|d| (d.id, d))
            .collect();
        let ingredients: HashMap<Uuid, Ingredient> = self
            .dishes
            .ingredients()
            .await?
            .into_iter()
            .map(|i| (i.id, i))
            .collect();

        let mut list = aggregate(&dish_page.items, &recipes, &ingredients, query.filter.as_deref());
        list.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

        if persist && !list.is_empty() {
            self.persist_rows(&list, now.date()).await?;
        }

        info!(ingredients = list.len(), persist, "ingredient forecasts built");
        Ok(Page::from_vec(list, query.page_request()))
    }

    async fn persist_rows(
        &self,
        list: &[IngredientForecastDto],
        today: NaiveDate,
    ) -> Result<(), ServiceError> {
        let mut rows = Vec::new();
        for dto in list {
            for (label, value) in dto.monthly.labels.iter().zip(&dto.monthly.forecast) {
                let (Some(quantity), Ok(month)) = (value, label.parse::<YearMonth>()) else {
                    continue;
                };
                rows.push(IngredientForecastRow {
                    ingredient_id: dto.id,
                    month,
                    quantity: *quantity,
                    generated_on: today,
                });
            }
        }
        debug!(rows = rows.len(), "persisting ingredient forecast rows");
        self.sink.replace_ingredient_forecasts(today, rows).await
    }
}

fn aggregate(
    dish_forecasts: &[DishForecastDto],
    recipes: &HashMap<Uuid, crate::entities::Dish>,
    ingredients: &HashMap<Uuid, Ingredient>,
    filter: Option<&str>,
) -> Vec<IngredientForecastDto> {
    let needle = filter
        .filter(|f| !f.trim().is_empty())
        .map(str::to_lowercase);
    let mut agg: HashMap<Uuid, IngredientForecastDto> = HashMap::new();

    for df in dish_forecasts {
        let Some(dish) = recipes.get(&df.id) else {
            continue;
        };
        for link in &dish.ingredients {
            if link.quantity == 0 {
                continue;
            }
            let Some(ingredient) = ingredients.get(&link.ingredient_id) else {
                continue;
            };
            if let Some(n) = &needle {
                if !ingredient.name.to_lowercase().contains(n) {
                    continue;
                }
            }
            let dto = agg
                .entry(ingredient.id)
                .or_insert_with(|| IngredientForecastDto {
                    id: ingredient.id,
                    name: ingredient.name.clone(),
                    unit: ingredient.unit,
                    monthly: ScaleData::default(),
                    daily: ScaleData::default(),
                    hourly: ScaleData::default(),
                    no_data: true,
                    single_point: false,
                    empty_forecast: true,
                });
            merge_scaled(&mut dto.monthly, &df.monthly, link.quantity);
            merge_scaled(&mut dto.daily, &df.daily, link.quantity);
            merge_scaled(&mut dto.hourly, &df.hourly, link.quantity);
        }
    }

    let mut list: Vec<IngredientForecastDto> = agg.into_values().collect();
    for dto in &mut list {
        let non_zero = dto
            .monthly
            .actual
            .iter()
            .filter(|v| matches!(v, Some(x) if *x > 0))
            .count();
        dto.no_data = non_zero == 0;
        dto.single_point = non_zero == 1;
        dto.empty_forecast = !dto.monthly.forecast.iter().any(Option::is_some)
            && !dto.daily.forecast.iter().any(Option::is_some)
            && !dto.hourly.forecast.iter().any(Option::is_some);
    }
    list
}

/// Adds `src * qty` into `agg`, growing the aggregate to the longer label
/// sequence when contributors differ in length.
fn merge_scaled(agg: &mut ScaleData, src: &ScaleData, qty: i64) {
    if agg.labels.len() < src.labels.len() {
        for i in agg.labels.len()..src.labels.len() {
            agg.labels.push(src.labels[i].clone());
            agg.actual.push(None);
            agg.forecast.push(None);
        }
    }
    for i in 0..src.labels.len() {
        if let Some(v) = src.actual[i] {
            *agg.actual[i].get_or_insert(0) += v * qty;
        }
        if let Some(v) = src.forecast[i] {
            *agg.forecast[i].get_or_insert(0) += v * qty;
        }
    }
}
