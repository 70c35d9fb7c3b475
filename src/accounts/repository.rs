// Database repositories for accounts and the refresh-token blacklist

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::PgPool;

use crate::accounts::error::AuthError;
use crate::accounts::models::{Account, Role};

const ACCOUNT_COLUMNS: &str = "id, email, password_hash, role, is_active, is_staff, is_superuser, \
     first_name, last_name, company_id, last_login, created_at";

/// Account repository for database operations
#[derive(Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    /// Create a new AccountRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_unique_violation(e: sqlx::Error) -> AuthError {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return AuthError::Field("email", "Email ya registrado.".to_string());
            }
        }
        AuthError::Database(e.to_string())
    }

    /// Create a new account
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        email: &str,
        password_hash: &str,
        role: Role,
        is_active: bool,
        first_name: &str,
        last_name: &str,
        company_id: i32,
    ) -> Result<Account, AuthError> {
        let query = format!(
            "INSERT INTO accounts (email, password_hash, role, is_active, first_name, last_name, company_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {ACCOUNT_COLUMNS}"
        );

        sqlx::query_as::<_, Account>(&query)
            .bind(email)
            .bind(password_hash)
            .bind(role)
            .bind(is_active)
            .bind(first_name)
            .bind(last_name)
            .bind(company_id)
            .fetch_one(&self.pool)
            .await
            .map_err(Self::map_unique_violation)
    }

    /// Find an account by email (case-insensitive)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<Account>, AuthError> {
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE LOWER(email) = LOWER($1)");

        let account = sqlx::query_as::<_, Account>(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    /// Find an account by ID
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Account>, AuthError> {
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1");

        let account = sqlx::query_as::<_, Account>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(account)
    }

    /// All accounts, newest first
    pub async fn list(&self) -> Result<Vec<Account>, AuthError> {
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY created_at DESC");

        let accounts = sqlx::query_as::<_, Account>(&query)
            .fetch_all(&self.pool)
            .await?;

        Ok(accounts)
    }

    /// Update the self-editable profile fields
    pub async fn update_profile(
        &self,
        id: i32,
        first_name: &str,
        last_name: &str,
    ) -> Result<Account, AuthError> {
        let query = format!(
            "UPDATE accounts SET first_name = $1, last_name = $2 WHERE id = $3 \
             RETURNING {ACCOUNT_COLUMNS}"
        );

        sqlx::query_as::<_, Account>(&query)
            .bind(first_name)
            .bind(last_name)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AuthError::NotFound)
    }

    /// Full field update used by the admin edit path. `is_staff`,
    /// `is_superuser` and `created_at` stay immutable through the API.
    pub async fn update_fields(&self, account: &Account) -> Result<Account, AuthError> {
        let query = format!(
            "UPDATE accounts SET email = $1, role = $2, is_active = $3, first_name = $4, \
             last_name = $5, company_id = $6 WHERE id = $7 RETURNING {ACCOUNT_COLUMNS}"
        );

        sqlx::query_as::<_, Account>(&query)
            .bind(&account.email)
            .bind(account.role)
            .bind(account.is_active)
            .bind(&account.first_name)
            .bind(&account.last_name)
            .bind(account.company_id)
            .bind(account.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Self::map_unique_violation)?
            .ok_or(AuthError::NotFound)
    }

    /// Replace the stored password hash
    pub async fn update_password(&self, id: i32, password_hash: &str) -> Result<(), AuthError> {
        sqlx::query("UPDATE accounts SET password_hash = $1 WHERE id = $2")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Change the role of an account
    pub async fn update_role(&self, id: i32, role: Role) -> Result<Account, AuthError> {
        let query =
            format!("UPDATE accounts SET role = $1 WHERE id = $2 RETURNING {ACCOUNT_COLUMNS}");

        sqlx::query_as::<_, Account>(&query)
            .bind(role)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AuthError::NotFound)
    }

    /// Toggle the active flag of an account
    pub async fn update_active(&self, id: i32, is_active: bool) -> Result<Account, AuthError> {
        let query =
            format!("UPDATE accounts SET is_active = $1 WHERE id = $2 RETURNING {ACCOUNT_COLUMNS}");

        sqlx::query_as::<_, Account>(&query)
            .bind(is_active)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AuthError::NotFound)
    }

    /// Stamp last_login; called when a token pair is issued at login
    pub async fn touch_last_login(&self, id: i32) -> Result<(), AuthError> {
        sqlx::query("UPDATE accounts SET last_login = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete an account; returns false when no row matched
    pub async fn delete(&self, id: i32) -> Result<bool, AuthError> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// The company self-registrations attach to
    pub async fn primary_company_id(&self) -> Result<Option<i32>, AuthError> {
        let id: Option<i32> =
            sqlx::query_scalar("SELECT id FROM companies WHERE is_primary = TRUE LIMIT 1")
                .fetch_optional(&self.pool)
                .await?;

        Ok(id)
    }
}

/// Repository for the refresh-token blacklist (single-use markers)
#[derive(Clone)]
pub struct TokenRepository {
    pool: PgPool,
}

impl TokenRepository {
    /// Create a new TokenRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Hash a token using SHA-256 so the raw credential is never stored
    fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Record a redeemed refresh token. Returns false when the token was
    /// already recorded, i.e. a concurrent or earlier redemption won.
    pub async fn revoke(
        &self,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, AuthError> {
        let token_hash = Self::hash_token(token);

        let result = sqlx::query(
            "INSERT INTO revoked_tokens (token_hash, expires_at) VALUES ($1, $2) \
             ON CONFLICT (token_hash) DO NOTHING",
        )
        .bind(token_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Check whether a refresh token has already been redeemed
    pub async fn is_revoked(&self, token: &str) -> Result<bool, AuthError> {
        let token_hash = Self::hash_token(token);

        let exists: Option<bool> = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM revoked_tokens WHERE token_hash = $1)",
        )
        .bind(token_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.unwrap_or(false))
    }

    /// Drop markers whose token could no longer be replayed anyway; keeps the
    /// blacklist bounded by the refresh-token lifetime
    pub async fn purge_expired(&self) -> Result<u64, AuthError> {
        let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at < NOW()")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_hash_is_hex_sha256() {
        let hash = TokenRepository::hash_token("some.refresh.token");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_token_hash_is_deterministic() {
        assert_eq!(
            TokenRepository::hash_token("abc"),
            TokenRepository::hash_token("abc")
        );
        assert_ne!(
            TokenRepository::hash_token("abc"),
            TokenRepository::hash_token("abd")
        );
    }
}
