// HTTP handlers for provider endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::accounts::middleware::AuthenticatedUser;
use crate::error::ApiError;
use crate::providers::models::{CreateProvider, Provider, UpdateProvider};
use crate::AppState;

/// Handler for POST /api/providers
pub async fn create_provider_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(payload): Json<CreateProvider>,
) -> Result<(StatusCode, Json<Provider>), ApiError> {
    payload.validate()?;

    let provider = sqlx::query_as::<_, Provider>(
        r#"
        INSERT INTO providers (name, email, phone)
        VALUES ($1, $2, $3)
        RETURNING id, name, email, phone, created_at, updated_at
        "#,
    )
    .bind(&payload.name)
    .bind(payload.email.as_deref().unwrap_or(""))
    .bind(payload.phone.as_deref().unwrap_or(""))
    .fetch_one(&state.db)
    .await?;

    tracing::info!("Successfully created provider with id: {}", provider.id);
    Ok((StatusCode::CREATED, Json(provider)))
}

/// Handler for GET /api/providers
pub async fn list_providers_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<Provider>>, ApiError> {
    let providers = sqlx::query_as::<_, Provider>(
        r#"
        SELECT id, name, email, phone, created_at, updated_at
        FROM providers
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(providers))
}

/// Handler for GET /api/providers/:id
pub async fn get_provider_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<Json<Provider>, ApiError> {
    let provider = sqlx::query_as::<_, Provider>(
        "SELECT id, name, email, phone, created_at, updated_at FROM providers WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::NotFound {
        resource: "Provider".to_string(),
        id: id.to_string(),
    })?;

    Ok(Json(provider))
}

/// Handler for PUT|PATCH /api/providers/:id
pub async fn update_provider_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateProvider>,
) -> Result<Json<Provider>, ApiError> {
    payload.validate()?;

    let existing = sqlx::query_as::<_, Provider>(
        "SELECT id, name, email, phone, created_at, updated_at FROM providers WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::NotFound {
        resource: "Provider".to_string(),
        id: id.to_string(),
    })?;

    let provider = sqlx::query_as::<_, Provider>(
        r#"
        UPDATE providers
        SET name = $1, email = $2, phone = $3, updated_at = NOW()
        WHERE id = $4
        RETURNING id, name, email, phone, created_at, updated_at
        "#,
    )
    .bind(payload.name.unwrap_or(existing.name))
    .bind(payload.email.unwrap_or(existing.email))
    .bind(payload.phone.unwrap_or(existing.phone))
    .bind(id)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(provider))
}

/// Handler for DELETE /api/providers/:id
pub async fn delete_provider_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let result = sqlx::query("DELETE FROM providers WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound {
            resource: "Provider".to_string(),
            id: id.to_string(),
        });
    }

    Ok(StatusCode::NO_CONTENT)
}
