use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents a company (tenant root) in the database
///
/// At most one company carries is_primary = true at any time; the handlers
/// swap the flag inside a transaction.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: i32,
    pub name: String,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data needed to create a new company
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCompany {
    #[validate(length(min = 1, max = 150, message = "Ensure this field has between 1 and 150 characters."))]
    pub name: String,
    #[serde(default)]
    pub is_primary: bool,
}

/// Partial update payload for an existing company
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCompany {
    #[validate(length(min = 1, max = 150, message = "Ensure this field has between 1 and 150 characters."))]
    pub name: Option<String>,
    pub is_primary: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_company_defaults_is_primary_to_false() {
        let create: CreateCompany = serde_json::from_str(r#"{"name":"Acme"}"#).unwrap();
        assert_eq!(create.name, "Acme");
        assert!(!create.is_primary);
    }

    #[test]
    fn test_update_company_supports_partial_bodies() {
        let update: UpdateCompany = serde_json::from_str(r#"{"is_primary":true}"#).unwrap();
        assert_eq!(update.name, None);
        assert_eq!(update.is_primary, Some(true));
    }
}
