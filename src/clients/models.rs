use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Represents a client (customer) record in the database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Client {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Comercial Ruiz S.L.")]
    pub name: String,
    #[schema(example = "contacto@ruiz.es")]
    pub email: String,
    #[schema(example = "+34 600 000 000")]
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Represents the data needed to create a new client
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateClient {
    #[schema(example = "Comercial Ruiz S.L.")]
    #[validate(length(min = 1, max = 150, message = "Ensure this field has between 1 and 150 characters."))]
    pub name: String,
    #[schema(example = "contacto@ruiz.es")]
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    #[schema(example = "+34 600 000 000")]
    #[validate(length(max = 30, message = "Ensure this field has no more than 30 characters."))]
    pub phone: Option<String>,
}

/// Represents the data for updating an existing client
/// All fields are optional to support partial updates
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateClient {
    #[validate(length(min = 1, max = 150, message = "Ensure this field has between 1 and 150 characters."))]
    pub name: Option<String>,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    #[validate(length(max = 30, message = "Ensure this field has no more than 30 characters."))]
    pub phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_client_deserialization() {
        let json = r#"{"name": "Comercial Ruiz S.L.", "email": "contacto@ruiz.es", "phone": "+34 600 000 000"}"#;
        let create: CreateClient = serde_json::from_str(json).unwrap();

        assert_eq!(create.name, "Comercial Ruiz S.L.");
        assert_eq!(create.email, Some("contacto@ruiz.es".to_string()));
        assert_eq!(create.phone, Some("+34 600 000 000".to_string()));
    }

    #[test]
    fn test_create_client_contact_fields_are_optional() {
        let create: CreateClient = serde_json::from_str(r#"{"name": "Ruiz"}"#).unwrap();
        assert_eq!(create.email, None);
        assert_eq!(create.phone, None);
    }

    #[test]
    fn test_update_client_empty_body() {
        let update: UpdateClient = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(update.name, None);
        assert_eq!(update.email, None);
        assert_eq!(update.phone, None);
    }
}
