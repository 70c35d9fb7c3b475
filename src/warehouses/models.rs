use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents a warehouse record in the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Warehouse {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data needed to create a new warehouse
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWarehouse {
    #[validate(length(min = 1, max = 150, message = "Ensure this field has between 1 and 150 characters."))]
    pub name: String,
}

/// Update payload for an existing warehouse
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateWarehouse {
    #[validate(length(min = 1, max = 150, message = "Ensure this field has between 1 and 150 characters."))]
    pub name: Option<String>,
}
