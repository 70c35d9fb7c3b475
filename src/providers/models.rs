use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents a provider (supplier) record in the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Provider {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data needed to create a new provider
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProvider {
    #[validate(length(min = 1, max = 150, message = "Ensure this field has between 1 and 150 characters."))]
    pub name: String,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    #[validate(length(max = 30, message = "Ensure this field has no more than 30 characters."))]
    pub phone: Option<String>,
}

/// Partial update payload for an existing provider
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProvider {
    #[validate(length(min = 1, max = 150, message = "Ensure this field has between 1 and 150 characters."))]
    pub name: Option<String>,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    #[validate(length(max = 30, message = "Ensure this field has no more than 30 characters."))]
    pub phone: Option<String>,
}
