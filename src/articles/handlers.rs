// HTTP handlers for article endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::accounts::middleware::AuthenticatedUser;
use crate::articles::models::{Article, CreateArticle, UpdateArticle};
use crate::error::ApiError;
use crate::AppState;

/// Handler for POST /api/articles
pub async fn create_article_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(payload): Json<CreateArticle>,
) -> Result<(StatusCode, Json<Article>), ApiError> {
    payload.validate()?;

    let article = sqlx::query_as::<_, Article>(
        "INSERT INTO articles (name) VALUES ($1) RETURNING id, name, created_at, updated_at",
    )
    .bind(&payload.name)
    .fetch_one(&state.db)
    .await?;

    tracing::info!("Successfully created article with id: {}", article.id);
    Ok((StatusCode::CREATED, Json(article)))
}

/// Handler for GET /api/articles
pub async fn list_articles_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<Article>>, ApiError> {
    let articles = sqlx::query_as::<_, Article>(
        "SELECT id, name, created_at, updated_at FROM articles ORDER BY created_at DESC",
    )
    .fetch_all(&state.db)
    .await?;

    Ok(Json(articles))
}

/// Handler for GET /api/articles/:id
pub async fn get_article_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<Json<Article>, ApiError> {
    let article = sqlx::query_as::<_, Article>(
        "SELECT id, name, created_at, updated_at FROM articles WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::NotFound {
        resource: "Article".to_string(),
        id: id.to_string(),
    })?;

    Ok(Json(article))
}

/// Handler for PUT|PATCH /api/articles/:id
pub async fn update_article_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateArticle>,
) -> Result<Json<Article>, ApiError> {
    payload.validate()?;

    let existing = sqlx::query_as::<_, Article>(
        "SELECT id, name, created_at, updated_at FROM articles WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::NotFound {
        resource: "Article".to_string(),
        id: id.to_string(),
    })?;

    let article = sqlx::query_as::<_, Article>(
        "UPDATE articles SET name = $1, updated_at = NOW() WHERE id = $2 \
         RETURNING id, name, created_at, updated_at",
    )
    .bind(payload.name.unwrap_or(existing.name))
    .bind(id)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(article))
}

/// Handler for DELETE /api/articles/:id
pub async fn delete_article_handler(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let result = sqlx::query("DELETE FROM articles WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound {
            resource: "Article".to_string(),
            id: id.to_string(),
        });
    }

    Ok(StatusCode::NO_CONTENT)
}
