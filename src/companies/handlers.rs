// HTTP handlers for company endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::accounts::middleware::AuthenticatedUser;
use crate::companies::models::{Company, CreateCompany, UpdateCompany};
use crate::error::ApiError;
use crate::AppState;

const COMPANY_COLUMNS: &str = "id, name, is_primary, created_at, updated_at";

/// Handler for GET /api/companies
pub async fn list_companies_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<Company>>, ApiError> {
    let query = format!("SELECT {COMPANY_COLUMNS} FROM companies ORDER BY created_at DESC");

    let companies = sqlx::query_as::<_, Company>(&query)
        .fetch_all(&state.db)
        .await?;

    Ok(Json(companies))
}

/// Handler for GET /api/companies/primary
/// The company self-registrations attach to
pub async fn get_primary_company_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Company>, ApiError> {
    let query = format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE is_primary = TRUE LIMIT 1");

    let company = sqlx::query_as::<_, Company>(&query)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "Company".to_string(),
            id: "primary".to_string(),
        })?;

    Ok(Json(company))
}

/// Handler for GET /api/companies/:id
pub async fn get_company_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<Json<Company>, ApiError> {
    let query = format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE id = $1");

    let company = sqlx::query_as::<_, Company>(&query)
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "Company".to_string(),
            id: id.to_string(),
        })?;

    Ok(Json(company))
}

/// Handler for POST /api/companies
///
/// Creating a company marked primary demotes every other company in the same
/// transaction, so there is never a window with two primaries.
pub async fn create_company_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(payload): Json<CreateCompany>,
) -> Result<(StatusCode, Json<Company>), ApiError> {
    payload.validate()?;

    let mut tx = state.db.begin().await?;

    let query = format!(
        "INSERT INTO companies (name, is_primary) VALUES ($1, $2) RETURNING {COMPANY_COLUMNS}"
    );
    let company = sqlx::query_as::<_, Company>(&query)
        .bind(&payload.name)
        .bind(payload.is_primary)
        .fetch_one(&mut *tx)
        .await?;

    if company.is_primary {
        sqlx::query("UPDATE companies SET is_primary = FALSE WHERE id != $1")
            .bind(company.id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    tracing::info!("Created company {} (primary: {})", company.id, company.is_primary);
    Ok((StatusCode::CREATED, Json(company)))
}

/// Handler for PUT|PATCH /api/companies/:id
pub async fn update_company_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCompany>,
) -> Result<Json<Company>, ApiError> {
    payload.validate()?;

    let mut tx = state.db.begin().await?;

    let select = format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE id = $1");
    let existing = sqlx::query_as::<_, Company>(&select)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound {
            resource: "Company".to_string(),
            id: id.to_string(),
        })?;

    let update = format!(
        "UPDATE companies SET name = $1, is_primary = $2, updated_at = NOW() WHERE id = $3 \
         RETURNING {COMPANY_COLUMNS}"
    );
    let company = sqlx::query_as::<_, Company>(&update)
        .bind(payload.name.unwrap_or(existing.name))
        .bind(payload.is_primary.unwrap_or(existing.is_primary))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

    if company.is_primary {
        sqlx::query("UPDATE companies SET is_primary = FALSE WHERE id != $1")
            .bind(company.id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    Ok(Json(company))
}

/// Handler for DELETE /api/companies/:id
///
/// Deletion is blocked while accounts still reference the company; the FK
/// violation surfaces as 409.
pub async fn delete_company_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let result = sqlx::query("DELETE FROM companies WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    return ApiError::Conflict {
                        message: format!("Company {} still has accounts attached", id),
                    };
                }
            }
            ApiError::DatabaseError(e)
        })?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound {
            resource: "Company".to_string(),
            id: id.to_string(),
        });
    }

    tracing::info!("Deleted company {}", id);
    Ok(StatusCode::NO_CONTENT)
}
