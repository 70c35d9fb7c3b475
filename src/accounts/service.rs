// Authentication service - business logic layer

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::accounts::{
    error::AuthError,
    middleware::AuthenticatedUser,
    models::{
        Account, AccountResponse, AdminCreateAccountRequest, AdminUpdateAccountRequest,
        PasswordChangeRequest, ProfileUpdateRequest, RegisterRequest, Role, TokenPairResponse,
    },
    password::PasswordService,
    permissions,
    repository::{AccountRepository, TokenRepository},
    token::{TokenService, TokenType},
};

/// Authentication service coordinating credential verification, token
/// issuance/rotation and account administration
pub struct AuthService {
    accounts: AccountRepository,
    tokens: TokenRepository,
    token_service: TokenService,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(
        accounts: AccountRepository,
        tokens: TokenRepository,
        token_service: TokenService,
    ) -> Self {
        Self {
            accounts,
            tokens,
            token_service,
        }
    }

    /// Verify credentials and issue a token pair.
    ///
    /// Checks run in a fixed order: account lookup, active flag, password.
    /// The active flag is checked before the password on purpose - the API
    /// contract distinguishes a disabled account from a bad password.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPairResponse, AuthError> {
        let account = self
            .accounts
            .find_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !account.is_active {
            warn!("Login attempt on inactive account: {}", account.id);
            return Err(AuthError::AccountInactive);
        }

        if !PasswordService::verify_password(password, &account.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let (access, refresh) =
            self.token_service
                .generate_token_pair(account.id, account.role, &account.email)?;

        // Observable side effect of issuance, not of verification
        self.accounts.touch_last_login(account.id).await?;

        info!("Issued token pair for account {}", account.id);
        Ok(TokenPairResponse { access, refresh })
    }

    /// Redeem a refresh token for a brand-new pair (strict rotation).
    ///
    /// The presented token is blacklisted first; the insert doubles as the
    /// at-most-once guard, so two concurrent redemptions of the same token
    /// cannot both succeed. The new pair is minted from the validated claims -
    /// role and email snapshots carry forward, and last_login is untouched.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPairResponse, AuthError> {
        let claims = self.token_service.validate_refresh_token(refresh_token)?;

        let expires_at =
            DateTime::<Utc>::from_timestamp(claims.exp, 0).ok_or(AuthError::TokenInvalid)?;

        if !self.tokens.revoke(refresh_token, expires_at).await? {
            warn!("Replay of an already-redeemed refresh token for account {}", claims.sub);
            return Err(AuthError::TokenInvalid);
        }

        // Keep the blacklist bounded by the refresh-token lifetime
        let purged = self.tokens.purge_expired().await?;
        if purged > 0 {
            debug!("Purged {} expired blacklist entries", purged);
        }

        let (access, refresh) =
            self.token_service
                .generate_token_pair(claims.sub, claims.role, &claims.email)?;

        Ok(TokenPairResponse { access, refresh })
    }

    /// Check a token's signature and expiry. Refresh tokens are additionally
    /// checked against the blacklist; access tokens validate offline.
    pub async fn verify(&self, token: &str) -> Result<(), AuthError> {
        let claims = self.token_service.validate_any_token(token)?;

        if claims.token_type == TokenType::Refresh && self.tokens.is_revoked(token).await? {
            return Err(AuthError::TokenInvalid);
        }

        Ok(())
    }

    /// Self-registration: role is forced to user, the account starts active
    /// and is attached to the primary company
    pub async fn register(&self, request: RegisterRequest) -> Result<AccountResponse, AuthError> {
        if request.password != request.password2 {
            return Err(AuthError::Field(
                "password2",
                "Las contraseñas no coinciden.".to_string(),
            ));
        }

        let company_id = self
            .accounts
            .primary_company_id()
            .await?
            .ok_or_else(|| AuthError::Config("no primary company configured".to_string()))?;

        let password_hash = PasswordService::hash_password(&request.password)?;
        let account = self
            .accounts
            .create(&request.email, &password_hash, Role::User, true, "", "", company_id)
            .await?;

        info!("Registered account {} ({})", account.id, account.email);
        Ok(account.into())
    }

    /// Resolve the caller's own account row
    pub async fn current_account(&self, user_id: i32) -> Result<Account, AuthError> {
        self.accounts
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::NotFound)
    }

    /// Update the name fields of a target account. Shared by the /me path and
    /// the admin edit path; the self-or-admin rule is the single gate.
    pub async fn update_profile(
        &self,
        actor: &AuthenticatedUser,
        target: &Account,
        update: ProfileUpdateRequest,
    ) -> Result<AccountResponse, AuthError> {
        permissions::require_self_or_admin(actor, target)?;

        let first_name = update.first_name.unwrap_or_else(|| target.first_name.clone());
        let last_name = update.last_name.unwrap_or_else(|| target.last_name.clone());

        let account = self
            .accounts
            .update_profile(target.id, &first_name, &last_name)
            .await?;

        Ok(account.into())
    }

    /// Change the caller's own password after re-verifying the current one
    pub async fn change_password(
        &self,
        user_id: i32,
        request: PasswordChangeRequest,
    ) -> Result<(), AuthError> {
        let account = self.current_account(user_id).await?;

        if !PasswordService::verify_password(&request.current_password, &account.password_hash)? {
            return Err(AuthError::Field(
                "current_password",
                "La contraseña actual no es válida.".to_string(),
            ));
        }

        if request.new_password != request.new_password2 {
            return Err(AuthError::Field(
                "new_password2",
                "Las contraseñas no coinciden.".to_string(),
            ));
        }

        let password_hash = PasswordService::hash_password(&request.new_password)?;
        self.accounts.update_password(account.id, &password_hash).await?;

        info!("Password changed for account {}", account.id);
        Ok(())
    }

    /// All accounts, newest first (admin)
    pub async fn list_accounts(&self) -> Result<Vec<AccountResponse>, AuthError> {
        let accounts = self.accounts.list().await?;
        Ok(accounts.into_iter().map(Into::into).collect())
    }

    /// Privileged creation: an explicit role is allowed (admin)
    pub async fn create_account(
        &self,
        request: AdminCreateAccountRequest,
    ) -> Result<AccountResponse, AuthError> {
        let company_id = match request.company_id {
            Some(id) => id,
            None => self
                .accounts
                .primary_company_id()
                .await?
                .ok_or_else(|| AuthError::Config("no primary company configured".to_string()))?,
        };

        let password_hash = PasswordService::hash_password(&request.password)?;
        let account = self
            .accounts
            .create(
                &request.email,
                &password_hash,
                request.role.unwrap_or_default(),
                request.is_active.unwrap_or(true),
                request.first_name.as_deref().unwrap_or(""),
                request.last_name.as_deref().unwrap_or(""),
                company_id,
            )
            .await?;

        info!("Admin created account {} ({})", account.id, account.email);
        Ok(account.into())
    }

    /// Fetch a single account (admin)
    pub async fn get_account(&self, id: i32) -> Result<AccountResponse, AuthError> {
        Ok(self
            .accounts
            .find_by_id(id)
            .await?
            .ok_or(AuthError::NotFound)?
            .into())
    }

    /// Full field edit of a target account (admin path)
    pub async fn update_account(
        &self,
        actor: &AuthenticatedUser,
        id: i32,
        request: AdminUpdateAccountRequest,
    ) -> Result<AccountResponse, AuthError> {
        let mut target = self
            .accounts
            .find_by_id(id)
            .await?
            .ok_or(AuthError::NotFound)?;

        permissions::require_self_or_admin(actor, &target)?;

        if let Some(email) = request.email {
            target.email = email;
        }
        if let Some(role) = request.role {
            target.role = role;
        }
        if let Some(is_active) = request.is_active {
            target.is_active = is_active;
        }
        if let Some(first_name) = request.first_name {
            target.first_name = first_name;
        }
        if let Some(last_name) = request.last_name {
            target.last_name = last_name;
        }
        if let Some(company_id) = request.company_id {
            target.company_id = company_id;
        }

        let account = self.accounts.update_fields(&target).await?;
        Ok(account.into())
    }

    /// Delete an account (admin)
    pub async fn delete_account(&self, id: i32) -> Result<(), AuthError> {
        if !self.accounts.delete(id).await? {
            return Err(AuthError::NotFound);
        }

        info!("Deleted account {}", id);
        Ok(())
    }

    /// Set the role of an account; the single input field is validated before
    /// any mutation
    pub async fn set_role(
        &self,
        id: i32,
        value: Option<String>,
    ) -> Result<AccountResponse, AuthError> {
        let role = value
            .as_deref()
            .and_then(|v| Role::from_str(v).ok())
            .ok_or_else(|| AuthError::Field("role", "Valor inválido.".to_string()))?;

        let account = self.accounts.update_role(id, role).await?;
        info!("Account {} role set to {}", id, role);
        Ok(account.into())
    }

    /// Toggle the active flag; accepts a bool or a case-insensitive
    /// "true"/"false" string
    pub async fn set_active(
        &self,
        id: i32,
        value: Option<serde_json::Value>,
    ) -> Result<AccountResponse, AuthError> {
        let text = match value {
            Some(serde_json::Value::String(s)) => s,
            Some(serde_json::Value::Bool(b)) => b.to_string(),
            Some(other) => other.to_string(),
            None => String::new(),
        };

        let is_active = match text.to_lowercase().as_str() {
            "true" => true,
            "false" => false,
            _ => {
                return Err(AuthError::Field(
                    "is_active",
                    "Usa true/false.".to_string(),
                ))
            }
        };

        let account = self.accounts.update_active(id, is_active).await?;
        info!("Account {} active flag set to {}", id, is_active);
        Ok(account.into())
    }
}
