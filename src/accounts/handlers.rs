// HTTP handlers for authentication, profile and user-administration endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use validator::Validate;

use crate::accounts::{
    error::AuthError,
    middleware::AuthenticatedUser,
    models::{
        AccountResponse, AdminCreateAccountRequest, AdminUpdateAccountRequest, LoginRequest,
        PasswordChangeRequest, ProfileUpdateRequest, RefreshRequest, RegisterRequest,
        SetActiveRequest, SetRoleRequest, TokenPairResponse, VerifyRequest,
    },
    permissions,
};
use crate::AppState;

/// POST /api/accounts/token
/// Exchange credentials for an access/refresh pair
pub async fn obtain_token_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenPairResponse>, AuthError> {
    request.validate()?;

    let pair = state.auth_service.login(&request.email, &request.password).await?;
    Ok(Json(pair))
}

/// POST /api/accounts/token/refresh
/// Redeem a refresh token for a new pair; the old token dies here
pub async fn refresh_token_handler(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<TokenPairResponse>, AuthError> {
    let pair = state.auth_service.refresh(&request.refresh).await?;
    Ok(Json(pair))
}

/// POST /api/accounts/token/verify
/// Check a token without touching the account
pub async fn verify_token_handler(
    State(state): State<AppState>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<serde_json::Value>, AuthError> {
    state.auth_service.verify(&request.token).await?;
    Ok(Json(json!({})))
}

/// POST /api/accounts/register
/// Public self-registration; role is always user
pub async fn register_handler(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), AuthError> {
    request.validate()?;

    let account = state.auth_service.register(request).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// GET /api/accounts/me
pub async fn me_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<AccountResponse>, AuthError> {
    let account = state.auth_service.current_account(user.user_id).await?;
    Ok(Json(account.into()))
}

/// PUT|PATCH /api/accounts/me
/// Name fields only; everything else needs the admin path
pub async fn update_me_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<ProfileUpdateRequest>,
) -> Result<Json<AccountResponse>, AuthError> {
    request.validate()?;

    let target = state.auth_service.current_account(user.user_id).await?;
    let account = state.auth_service.update_profile(&user, &target, request).await?;
    Ok(Json(account))
}

/// POST /api/accounts/me/change-password
pub async fn change_password_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<PasswordChangeRequest>,
) -> Result<Json<serde_json::Value>, AuthError> {
    request.validate()?;

    state.auth_service.change_password(user.user_id, request).await?;
    Ok(Json(json!({ "detail": "Contraseña cambiada." })))
}

/// GET /api/accounts/users (admin)
pub async fn list_users_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Vec<AccountResponse>>, AuthError> {
    permissions::require_admin(&user)?;

    let accounts = state.auth_service.list_accounts().await?;
    Ok(Json(accounts))
}

/// POST /api/accounts/users (admin)
/// Privileged creation; an explicit role is allowed here
pub async fn create_user_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<AdminCreateAccountRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), AuthError> {
    permissions::require_admin(&user)?;
    request.validate()?;

    let account = state.auth_service.create_account(request).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// GET /api/accounts/users/:id (admin)
pub async fn get_user_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<Json<AccountResponse>, AuthError> {
    permissions::require_admin(&user)?;

    let account = state.auth_service.get_account(id).await?;
    Ok(Json(account))
}

/// PUT|PATCH /api/accounts/users/:id (admin)
pub async fn update_user_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<AdminUpdateAccountRequest>,
) -> Result<Json<AccountResponse>, AuthError> {
    permissions::require_admin(&user)?;
    request.validate()?;

    let account = state.auth_service.update_account(&user, id, request).await?;
    Ok(Json(account))
}

/// DELETE /api/accounts/users/:id (admin)
pub async fn delete_user_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, AuthError> {
    permissions::require_admin(&user)?;

    state.auth_service.delete_account(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/accounts/users/:id/set-role (admin)
pub async fn set_role_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<SetRoleRequest>,
) -> Result<Json<AccountResponse>, AuthError> {
    permissions::require_admin(&user)?;

    let account = state.auth_service.set_role(id, request.role).await?;
    Ok(Json(account))
}

/// POST /api/accounts/users/:id/set-active (admin)
pub async fn set_active_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<SetActiveRequest>,
) -> Result<Json<AccountResponse>, AuthError> {
    permissions::require_admin(&user)?;

    let account = state.auth_service.set_active(id, request.is_active).await?;
    Ok(Json(account))
}
