// Authentication and authorization error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{error, warn};

/// Errors produced by the account, token and permission paths.
///
/// Authentication failures (401) carry the machine-readable `code` field that
/// API clients key on; field-scoped input problems serialize as a flat
/// `{field: message}` object.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("No existe un usuario con este email")]
    UserNotFound,

    #[error("Esta cuenta está desactivada")]
    AccountInactive,

    #[error("Contraseña incorrecta")]
    InvalidCredentials,

    #[error("Token is invalid or expired")]
    TokenExpired,

    #[error("Token is invalid or expired")]
    TokenInvalid,

    #[error("Authentication credentials were not provided.")]
    MissingToken,

    #[error("You do not have permission to perform this action.")]
    Forbidden,

    #[error("Not found.")]
    NotFound,

    /// A single offending input field with its client-facing message
    #[error("{1}")]
    Field(&'static str, String),

    #[error("Request validation failed")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Password hashing error")]
    PasswordHash,

    #[error("Token generation error: {0}")]
    TokenGeneration(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::UserNotFound
            | AuthError::AccountInactive
            | AuthError::InvalidCredentials
            | AuthError::TokenExpired
            | AuthError::TokenInvalid
            | AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::NotFound => StatusCode::NOT_FOUND,
            AuthError::Field(_, _) | AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::Database(_)
            | AuthError::PasswordHash
            | AuthError::TokenGeneration(_)
            | AuthError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code attached to authentication failures
    fn code(&self) -> Option<&'static str> {
        match self {
            AuthError::UserNotFound => Some("user_not_found"),
            AuthError::AccountInactive => Some("user_inactive"),
            AuthError::InvalidCredentials => Some("invalid_password"),
            AuthError::TokenExpired | AuthError::TokenInvalid => Some("token_not_valid"),
            AuthError::MissingToken => Some("not_authenticated"),
            _ => None,
        }
    }
}

/// Flattens validator output into `{field: first message}`
fn field_map(errors: &validator::ValidationErrors) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for (field, errs) in errors.field_errors() {
        let message = errs
            .first()
            .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| "Invalid value.".to_string());
        map.insert(field.to_string(), json!(message));
    }
    serde_json::Value::Object(map)
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            AuthError::UserNotFound
            | AuthError::AccountInactive
            | AuthError::InvalidCredentials => {
                warn!("Authentication failed: {}", self);
                json!({ "detail": self.to_string(), "code": self.code() })
            }
            AuthError::TokenExpired | AuthError::TokenInvalid | AuthError::MissingToken => {
                warn!("Token rejected: {}", self);
                json!({ "detail": self.to_string(), "code": self.code() })
            }
            AuthError::Forbidden => {
                warn!("Authorization failed");
                json!({ "detail": self.to_string() })
            }
            AuthError::NotFound => json!({ "detail": self.to_string() }),
            AuthError::Field(field, message) => {
                let mut map = serde_json::Map::new();
                map.insert((*field).to_string(), json!(message));
                serde_json::Value::Object(map)
            }
            AuthError::Validation(errors) => field_map(errors),
            AuthError::Database(msg) => {
                error!("Database error in accounts: {}", msg);
                json!({ "detail": "Internal server error" })
            }
            AuthError::PasswordHash => {
                error!("Password hashing error");
                json!({ "detail": "Internal server error" })
            }
            AuthError::TokenGeneration(msg) => {
                error!("Token generation error: {}", msg);
                json!({ "detail": "Internal server error" })
            }
            AuthError::Config(msg) => {
                error!("Accounts configuration error: {}", msg);
                json!({ "detail": "Internal server error" })
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(error: sqlx::Error) -> Self {
        AuthError::Database(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_failures_are_unauthorized() {
        assert_eq!(AuthError::UserNotFound.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AuthError::AccountInactive.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_login_failure_codes_match_the_api_contract() {
        assert_eq!(AuthError::UserNotFound.code(), Some("user_not_found"));
        assert_eq!(AuthError::AccountInactive.code(), Some("user_inactive"));
        assert_eq!(AuthError::InvalidCredentials.code(), Some("invalid_password"));
    }

    #[test]
    fn test_forbidden_is_403_and_field_errors_are_400() {
        assert_eq!(AuthError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AuthError::Field("role", "Valor inválido.".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_server_faults_are_500() {
        assert_eq!(
            AuthError::Database("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AuthError::PasswordHash.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
