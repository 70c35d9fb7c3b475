// Account data models and request/response DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Access role carried by every account and snapshotted into token claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Convert role to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    /// Parse role from string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s {
            "admin" => Ok(Role::Admin),
            "user" => Ok(Role::User),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Account database model
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub first_name: String,
    pub last_name: String,
    pub company_id: i32,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Account response model (excludes password_hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: i32,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub first_name: String,
    pub last_name: String,
    pub company_id: i32,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            email: account.email,
            role: account.role,
            is_active: account.is_active,
            is_staff: account.is_staff,
            is_superuser: account.is_superuser,
            first_name: account.first_name,
            last_name: account.last_name,
            company_id: account.company_id,
            last_login: account.last_login,
            created_at: account.created_at,
        }
    }
}

/// Login request DTO (email is the sole login identifier)
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    pub password: String,
}

/// Token pair returned at login and refresh
#[derive(Debug, Serialize)]
pub struct TokenPairResponse {
    pub access: String,
    pub refresh: String,
}

/// Token refresh request DTO
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Token verification request DTO
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub token: String,
}

/// Public registration request DTO
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(custom = "crate::validation::validate_password_strength")]
    pub password: String,
    pub password2: String,
}

/// Profile self-edit request DTO (name fields only)
#[derive(Debug, Deserialize, Validate)]
pub struct ProfileUpdateRequest {
    #[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
    pub first_name: Option<String>,
    #[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
    pub last_name: Option<String>,
}

/// Password change request DTO; the current password is re-verified
#[derive(Debug, Deserialize, Validate)]
pub struct PasswordChangeRequest {
    pub current_password: String,
    #[validate(custom = "crate::validation::validate_password_strength")]
    pub new_password: String,
    pub new_password2: String,
}

/// Privileged account creation request DTO (admin only; role may be set)
#[derive(Debug, Deserialize, Validate)]
pub struct AdminCreateAccountRequest {
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[validate(custom = "crate::validation::validate_password_strength")]
    pub password: String,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_id: Option<i32>,
}

/// Full account edit request DTO (admin only; all fields optional)
#[derive(Debug, Deserialize, Validate)]
pub struct AdminUpdateAccountRequest {
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company_id: Option<i32>,
}

/// Body of POST /users/:id/set-role
#[derive(Debug, Deserialize)]
pub struct SetRoleRequest {
    pub role: Option<String>,
}

/// Body of POST /users/:id/set-active; accepts a bool or a
/// case-insensitive "true"/"false" string
#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub is_active: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_strings() {
        assert_eq!(Role::from_str("admin").unwrap(), Role::Admin);
        assert_eq!(Role::from_str("user").unwrap(), Role::User);
        assert_eq!(Role::Admin.as_str(), "admin");
        assert!(Role::from_str("superadmin").is_err());
        assert!(Role::from_str("Admin").is_err());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
    }

    #[test]
    fn test_account_response_hides_password_hash() {
        let account = Account {
            id: 1,
            email: "a@x.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: Role::User,
            is_active: true,
            is_staff: false,
            is_superuser: false,
            first_name: "Ana".to_string(),
            last_name: "García".to_string(),
            company_id: 1,
            last_login: None,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&AccountResponse::from(account)).unwrap();
        assert!(!json.contains("password"));
        assert!(json.contains("\"email\":\"a@x.com\""));
        assert!(json.contains("\"role\":\"user\""));
    }

    #[test]
    fn test_profile_update_accepts_partial_body() {
        let update: ProfileUpdateRequest = serde_json::from_str(r#"{"first_name":"Ana"}"#).unwrap();
        assert_eq!(update.first_name, Some("Ana".to_string()));
        assert_eq!(update.last_name, None);
    }

    #[test]
    fn test_set_active_accepts_bool_and_string_bodies() {
        let s: SetActiveRequest = serde_json::from_str(r#"{"is_active":"true"}"#).unwrap();
        assert!(matches!(s.is_active, Some(serde_json::Value::String(_))));

        let b: SetActiveRequest = serde_json::from_str(r#"{"is_active":false}"#).unwrap();
        assert!(matches!(b.is_active, Some(serde_json::Value::Bool(false))));

        let missing: SetActiveRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert!(missing.is_active.is_none());
    }
}
