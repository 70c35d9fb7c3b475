// HTTP handlers for warehouse endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::accounts::middleware::AuthenticatedUser;
use crate::error::ApiError;
use crate::warehouses::models::{CreateWarehouse, UpdateWarehouse, Warehouse};
use crate::AppState;

/// Handler for POST /api/warehouses
pub async fn create_warehouse_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(payload): Json<CreateWarehouse>,
) -> Result<(StatusCode, Json<Warehouse>), ApiError> {
    payload.validate()?;

    let warehouse = sqlx::query_as::<_, Warehouse>(
        "INSERT INTO warehouses (name) VALUES ($1) RETURNING id, name, created_at, updated_at",
    )
    .bind(&payload.name)
    .fetch_one(&state.db)
    .await?;

    tracing::info!("Successfully created warehouse with id: {}", warehouse.id);
    Ok((StatusCode::CREATED, Json(warehouse)))
}

/// Handler for GET /api/warehouses
pub async fn list_warehouses_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<Warehouse>>, ApiError> {
    let warehouses = sqlx::query_as::<_, Warehouse>(
        "SELECT id, name, created_at, updated_at FROM warehouses ORDER BY created_at DESC",
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(warehouses))
}

/// Handler for GET /api/warehouses/:id
pub async fn get_warehouse_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<Json<Warehouse>, ApiError> {
    let warehouse = sqlx::query_as::<_, Warehouse>(
        "SELECT id, name, created_at, updated_at FROM warehouses WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::NotFound {
        resource: "Warehouse".to_string(),
        id: id.to_string(),
    })?;

    Ok(Json(warehouse))
}

/// Handler for PUT|PATCH /api/warehouses/:id
pub async fn update_warehouse_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateWarehouse>,
) -> Result<Json<Warehouse>, ApiError> {
    payload.validate()?;

    let existing = sqlx::query_as::<_, Warehouse>(
        "SELECT id, name, created_at, updated_at FROM warehouses WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::NotFound {
        resource: "Warehouse".to_string(),
        id: id.to_string(),
    })?;

    let warehouse = sqlx::query_as::<_, Warehouse>(
        "UPDATE warehouses SET name = $1, updated_at = NOW() WHERE id = $2 \
         RETURNING id, name, created_at, updated_at",
    )
    .bind(payload.name.unwrap_or(existing.name))
    .bind(id)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(warehouse))
}

/// Handler for DELETE /api/warehouses/:id
pub async fn delete_warehouse_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let result = sqlx::query("DELETE FROM warehouses WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound {
            resource: "Warehouse".to_string(),
            id: id.to_string(),
        });
    }

    Ok(StatusCode::NO_CONTENT)
}
