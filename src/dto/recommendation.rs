use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::Category;

/// A recommended dish with its community rating context.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DishSummaryDto {
    pub id: Uuid,
    pub name: String,
    pub category: Category,
    pub average_rating: f64,
    pub review_count: usize,
}
