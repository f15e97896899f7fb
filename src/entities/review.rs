use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An explicit dish rating on a 1-5 star scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub user_id: Uuid,
    pub dish_id: Uuid,
    pub rating: u8,
}
