// JWT token issuance and validation service

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::accounts::error::AuthError;
use crate::accounts::models::Role;

/// Access tokens live 5 minutes
pub const ACCESS_TOKEN_LIFETIME: i64 = 300;
/// Refresh tokens live 1 day and are single-use
pub const REFRESH_TOKEN_LIFETIME: i64 = 86_400;

/// Which half of the pair a token is; embedded as a claim so an access token
/// can never be replayed through the refresh endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims structure
///
/// Role and email are snapshots taken at issuance; a later role change does
/// not invalidate tokens already in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,
    pub role: Role,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
    pub token_type: TokenType,
}

/// Token service for JWT operations
pub struct TokenService {
    secret: String,
}

impl TokenService {
    /// Create a new TokenService with the server-held signing secret
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    fn generate(
        &self,
        sub: i32,
        role: Role,
        email: &str,
        token_type: TokenType,
        lifetime: i64,
    ) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub,
            role,
            email: email.to_string(),
            iat: now,
            exp: now + lifetime,
            token_type,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
    }

    /// Generate an access token (5 minutes)
    pub fn generate_access_token(
        &self,
        sub: i32,
        role: Role,
        email: &str,
    ) -> Result<String, AuthError> {
        self.generate(sub, role, email, TokenType::Access, ACCESS_TOKEN_LIFETIME)
    }

    /// Generate a refresh token (1 day)
    pub fn generate_refresh_token(
        &self,
        sub: i32,
        role: Role,
        email: &str,
    ) -> Result<String, AuthError> {
        self.generate(sub, role, email, TokenType::Refresh, REFRESH_TOKEN_LIFETIME)
    }

    /// Generate both halves of the pair: (access, refresh)
    pub fn generate_token_pair(
        &self,
        sub: i32,
        role: Role,
        email: &str,
    ) -> Result<(String, String), AuthError> {
        let access = self.generate_access_token(sub, role, email)?;
        let refresh = self.generate_refresh_token(sub, role, email)?;
        Ok((access, refresh))
    }

    /// Validate an access token; refuses refresh tokens
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = self.validate(token)?;
        if claims.token_type != TokenType::Access {
            return Err(AuthError::TokenInvalid);
        }
        Ok(claims)
    }

    /// Validate a refresh token; refuses access tokens
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = self.validate(token)?;
        if claims.token_type != TokenType::Refresh {
            return Err(AuthError::TokenInvalid);
        }
        Ok(claims)
    }

    /// Validate either token type (used by the verify endpoint)
    pub fn validate_any_token(&self, token: &str) -> Result<Claims, AuthError> {
        self.validate(token)
    }

    fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_token_service() -> TokenService {
        TokenService::new("test_secret_key_for_testing_purposes".to_string())
    }

    #[test]
    fn test_access_token_expiration_is_5_minutes() {
        let service = test_token_service();
        let token = service
            .generate_access_token(1, Role::User, "test@example.com")
            .unwrap();
        let claims = service.validate_access_token(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, ACCESS_TOKEN_LIFETIME);
    }

    #[test]
    fn test_refresh_token_expiration_is_1_day() {
        let service = test_token_service();
        let token = service
            .generate_refresh_token(1, Role::User, "test@example.com")
            .unwrap();
        let claims = service.validate_refresh_token(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, REFRESH_TOKEN_LIFETIME);
    }

    #[test]
    fn test_token_claims_carry_identity_and_role() {
        let service = test_token_service();
        let token = service
            .generate_access_token(42, Role::Admin, "admin@example.com")
            .unwrap();
        let claims = service.validate_access_token(&token).unwrap();

        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.email, "admin@example.com");
        assert_eq!(claims.token_type, TokenType::Access);
    }

    #[test]
    fn test_generate_token_pair() {
        let service = test_token_service();
        let (access, refresh) = service
            .generate_token_pair(1, Role::User, "test@example.com")
            .unwrap();

        assert!(service.validate_access_token(&access).is_ok());
        assert!(service.validate_refresh_token(&refresh).is_ok());
        assert_ne!(access, refresh);
    }

    #[test]
    fn test_token_type_confusion_is_rejected() {
        let service = test_token_service();
        let (access, refresh) = service
            .generate_token_pair(1, Role::User, "test@example.com")
            .unwrap();

        // An access token presented as a refresh token (and vice versa) fails
        assert!(matches!(
            service.validate_refresh_token(&access),
            Err(AuthError::TokenInvalid)
        ));
        assert!(matches!(
            service.validate_access_token(&refresh),
            Err(AuthError::TokenInvalid)
        ));
    }

    #[test]
    fn test_malformed_tokens_are_rejected() {
        let service = test_token_service();

        assert!(service.validate_any_token("").is_err());
        assert!(service.validate_any_token("not.a.token").is_err());
        assert!(service.validate_any_token("invalid_token_format").is_err());
    }

    #[test]
    fn test_token_signature_verification() {
        let service1 = TokenService::new("secret1".to_string());
        let service2 = TokenService::new("secret2".to_string());

        let token = service1
            .generate_access_token(1, Role::User, "test@example.com")
            .unwrap();

        assert!(service1.validate_access_token(&token).is_ok());
        assert!(service2.validate_access_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_reported_as_expired() {
        let service = test_token_service();
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub: 1,
            role: Role::User,
            email: "test@example.com".to_string(),
            iat: now - 1000,
            exp: now - 500,
            token_type: TokenType::Access,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret("test_secret_key_for_testing_purposes".as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            service.validate_access_token(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    proptest! {
        #[test]
        fn prop_access_token_expiration(
            sub in 1i32..1000000,
            email in "[a-z]{3,10}@[a-z]{3,10}\\.(com|org|net)"
        ) {
            let service = test_token_service();
            let token = service.generate_access_token(sub, Role::User, &email)?;
            let claims = service.validate_access_token(&token)?;

            prop_assert_eq!(claims.exp - claims.iat, ACCESS_TOKEN_LIFETIME);
        }

        #[test]
        fn prop_token_claims_contain_identity(
            sub in 1i32..1000000,
            email in "[a-z]{3,10}@[a-z]{3,10}\\.(com|org|net)"
        ) {
            let service = test_token_service();
            let token = service.generate_refresh_token(sub, Role::Admin, &email)?;
            let claims = service.validate_refresh_token(&token)?;

            prop_assert_eq!(claims.sub, sub);
            prop_assert_eq!(claims.email, email);
            prop_assert_eq!(claims.role, Role::Admin);
        }

        #[test]
        fn prop_malformed_tokens_rejected(
            malformed in "[a-zA-Z0-9]{10,50}"
        ) {
            let service = test_token_service();
            prop_assert!(service.validate_any_token(&malformed).is_err());
        }
    }
}
