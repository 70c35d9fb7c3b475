// HTTP handlers for client endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::accounts::middleware::AuthenticatedUser;
use crate::clients::models::{Client, CreateClient, UpdateClient};
use crate::error::ApiError;
use crate::AppState;

/// Handler for POST /api/clients
/// Creates a new client record
#[utoipa::path(
    post,
    path = "/api/clients",
    request_body = CreateClient,
    responses(
        (status = 201, description = "Client created successfully", body = Client),
        (status = 400, description = "Invalid input data"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "clients"
)]
pub async fn create_client_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(payload): Json<CreateClient>,
) -> Result<(StatusCode, Json<Client>), ApiError> {
    tracing::debug!("Creating new client: {}", payload.name);

    payload.validate()?;

    let client = sqlx::query_as::<_, Client>(
        r#"
        INSERT INTO clients (name, email, phone)
        VALUES ($1, $2, $3)
        RETURNING id, name, email, phone, created_at, updated_at
        "#,
    )
    .bind(&payload.name)
    .bind(payload.email.as_deref().unwrap_or(""))
    .bind(payload.phone.as_deref().unwrap_or(""))
    .fetch_one(&state.db)
    .await?;

    tracing::info!("Successfully created client with id: {}", client.id);
    Ok((StatusCode::CREATED, Json(client)))
}

/// Handler for GET /api/clients
/// Retrieves all clients, newest first
#[utoipa::path(
    get,
    path = "/api/clients",
    responses(
        (status = 200, description = "List of all clients", body = Vec<Client>),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "clients"
)]
pub async fn list_clients_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<Client>>, ApiError> {
    let clients = sqlx::query_as::<_, Client>(
        r#"
        SELECT id, name, email, phone, created_at, updated_at
        FROM clients
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    tracing::debug!("Retrieved {} clients", clients.len());
    Ok(Json(clients))
}

/// Handler for GET /api/clients/:id
#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    params(("id" = i32, Path, description = "Client ID")),
    responses(
        (status = 200, description = "Client found", body = Client),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Client not found")
    ),
    security(("bearer_auth" = [])),
    tag = "clients"
)]
pub async fn get_client_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<Json<Client>, ApiError> {
    let client = sqlx::query_as::<_, Client>(
        "SELECT id, name, email, phone, created_at, updated_at FROM clients WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::NotFound {
        resource: "Client".to_string(),
        id: id.to_string(),
    })?;

    Ok(Json(client))
}

/// Handler for PUT|PATCH /api/clients/:id
/// Updates a client, keeping existing values for omitted fields
#[utoipa::path(
    put,
    path = "/api/clients/{id}",
    params(("id" = i32, Path, description = "Client ID")),
    request_body = UpdateClient,
    responses(
        (status = 200, description = "Client updated successfully", body = Client),
        (status = 400, description = "Invalid input data"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Client not found")
    ),
    security(("bearer_auth" = [])),
    tag = "clients"
)]
pub async fn update_client_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateClient>,
) -> Result<Json<Client>, ApiError> {
    payload.validate()?;

    let existing = sqlx::query_as::<_, Client>(
        "SELECT id, name, email, phone, created_at, updated_at FROM clients WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::NotFound {
        resource: "Client".to_string(),
        id: id.to_string(),
    })?;

    let client = sqlx::query_as::<_, Client>(
        r#"
        UPDATE clients
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

    tracing::info!("Successfully updated client with id: {}", id);
    Ok(Json(client))
}

/// Handler for DELETE /api/clients/:id
#[utoipa::path(
    delete,
    path = "/api/clients/{id}",
    params(("id" = i32, Path, description = "Client ID")),
    responses(
        (status = 204, description = "Client deleted successfully"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Client not found")
    ),
    security(("bearer_auth" = [])),
    tag = "clients"
)]
pub async fn delete_client_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let result = sqlx::query("DELETE FROM clients WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound {
            resource: "Client".to_string(),
            id: id.to_string(),
        });
    }

    tracing::info!("Successfully deleted client with id: {}", id);
    Ok(StatusCode::NO_CONTENT)
}
