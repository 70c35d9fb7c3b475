// Authentication middleware for protected routes

use axum::{
    async_trait,
    body::Body,
    extract::FromRequestParts,
    http::{header, request::Parts, Request},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use crate::accounts::{error::AuthError, models::Role, token::TokenService};

/// Authenticated caller extracted from the bearer token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub email: String,
    pub role: Role,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Extract Authorization header
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::MissingToken)?
            .to_str()
            .map_err(|_| AuthError::TokenInvalid)?;

        // Verify Bearer token format
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::TokenInvalid)?;

        // Get JWT secret from environment
        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| AuthError::Config("JWT_SECRET not configured".to_string()))?;

        // Validate the access token and lift the identity out of the claims
        let token_service = TokenService::new(jwt_secret);
        let claims = token_service.validate_access_token(token)?;

        Ok(AuthenticatedUser {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
        })
    }
}

/// Authorization middleware that requires a specific role
///
/// Validates the bearer token and checks the role claim before the request
/// reaches any handler of the wrapped sub-router.
#[derive(Debug, Clone)]
pub struct RequireRole {
    required_role: Role,
}

impl RequireRole {
    /// Create a new RequireRole middleware with the specified role requirement
    pub fn new(required_role: Role) -> Self {
        Self { required_role }
    }

    /// Create a middleware that requires the Admin role
    pub fn admin() -> Self {
        Self::new(Role::Admin)
    }

    /// Middleware function that validates role-based access
    pub async fn middleware(
        self,
        request: Request<Body>,
        next: Next,
    ) -> Result<Response, AuthError> {
        let endpoint = request.uri().path().to_string();

        let auth_header = request
            .headers()
            .get(header::AUTHORIZATION)
            .ok_or_else(|| {
                warn!(
                    "Missing Authorization header in request to protected endpoint: {}",
                    endpoint
                );
                AuthError::MissingToken
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid Authorization header format for endpoint: {}", endpoint);
                AuthError::TokenInvalid
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            warn!(
                "Authorization header missing 'Bearer ' prefix for endpoint: {}",
                endpoint
            );
            AuthError::TokenInvalid
        })?;

        let jwt_secret = std::env::var("JWT_SECRET")
            .map_err(|_| AuthError::Config("JWT_SECRET not configured".to_string()))?;

        let token_service = TokenService::new(jwt_secret);
        let claims = token_service.validate_access_token(token)?;

        if claims.role != self.required_role {
            warn!(
                "Authorization failed: user_id={}, required_role={}, actual_role={}, endpoint={}",
                claims.sub, self.required_role, claims.role, endpoint
            );
            return Err(AuthError::Forbidden);
        }

        debug!(
            "Authorization successful: user_id={}, role={}, endpoint={}",
            claims.sub, claims.role, endpoint
        );
        Ok(next.run(request).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::token::TokenService;
    use axum::http::Request;
    use proptest::prelude::*;

    fn create_parts_with_auth(auth_value: &str) -> Parts {
        let req = Request::builder()
            .uri("/")
            .header(header::AUTHORIZATION, auth_value)
            .body(())
            .unwrap();

        let (parts, _) = req.into_parts();
        parts
    }

    fn create_parts_without_auth() -> Parts {
        let req = Request::builder().uri("/").body(()).unwrap();

        let (parts, _) = req.into_parts();
        parts
    }

    fn test_token_service() -> TokenService {
        TokenService::new("test_secret_key_for_testing_purposes".to_string())
    }

    #[tokio::test]
    async fn test_valid_token_is_accepted() {
        std::env::set_var("JWT_SECRET", "test_secret_key_for_testing_purposes");

        let service = test_token_service();
        let token = service
            .generate_access_token(42, Role::User, "test@example.com")
            .unwrap();
        let auth_header = format!("Bearer {}", token);

        let mut parts = create_parts_with_auth(&auth_header);
        let result = AuthenticatedUser::from_request_parts(&mut parts, &()).await;

        let user = result.unwrap();
        assert_eq!(user.user_id, 42);
        assert_eq!(user.email, "test@example.com");
        assert_eq!(user.role, Role::User);
    }

    #[tokio::test]
    async fn test_refresh_token_is_not_an_access_credential() {
        std::env::set_var("JWT_SECRET", "test_secret_key_for_testing_purposes");

        let service = test_token_service();
        let token = service
            .generate_refresh_token(42, Role::User, "test@example.com")
            .unwrap();
        let auth_header = format!("Bearer {}", token);

        let mut parts = create_parts_with_auth(&auth_header);
        let result = AuthenticatedUser::from_request_parts(&mut parts, &()).await;

        assert!(matches!(result.unwrap_err(), AuthError::TokenInvalid));
    }

    #[tokio::test]
    async fn test_missing_authorization_header() {
        let mut parts = create_parts_without_auth();
        let result = AuthenticatedUser::from_request_parts(&mut parts, &()).await;

        assert!(matches!(result.unwrap_err(), AuthError::MissingToken));
    }

    #[tokio::test]
    async fn test_invalid_bearer_format() {
        std::env::set_var("JWT_SECRET", "test_secret_key_for_testing_purposes");

        let invalid_formats = vec![
            "InvalidFormat token",
            "token_without_bearer",
            "Basic dXNlcjpwYXNz",
        ];

        for auth_value in invalid_formats {
            let mut parts = create_parts_with_auth(auth_value);
            let result = AuthenticatedUser::from_request_parts(&mut parts, &()).await;

            assert!(result.is_err());
        }
    }

    proptest! {
        #[test]
        fn prop_malformed_tokens_rejected(
            malformed in "[a-zA-Z0-9]{10,50}"
        ) {
            std::env::set_var("JWT_SECRET", "test_secret_key_for_testing_purposes");

            let auth_header = format!("Bearer {}", malformed);
            let mut parts = create_parts_with_auth(&auth_header);

            let rt = tokio::runtime::Runtime::new().unwrap();
            let result = rt.block_on(AuthenticatedUser::from_request_parts(&mut parts, &()));

            prop_assert!(result.is_err());
        }
    }
}
