mod accounts;
mod articles;
mod clients;
mod companies;
mod db;
mod error;
mod locations;
mod providers;
mod validation;
mod warehouses;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use sqlx::PgPool;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use accounts::{
    handlers as account_handlers, AccountRepository, AuthService, RequireRole, TokenRepository,
    TokenService,
};
use clients::models::{Client, CreateClient, UpdateClient};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        clients::handlers::create_client_handler,
        clients::handlers::list_clients_handler,
        clients::handlers::get_client_handler,
        clients::handlers::update_client_handler,
        clients::handlers::delete_client_handler,
    ),
    components(
        schemas(Client, CreateClient, UpdateClient)
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "clients", description = "Client record management endpoints")
    ),
    info(
        title = "Back-Office API",
        version = "1.0.0",
        description = "Multi-tenant back-office administration backend with JWT authentication"
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub auth_service: Arc<AuthService>,
    pub http: reqwest::Client,
}

/// Handler for GET /health
/// Liveness probe; touches neither the database nor the token layer
async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Role gate for the user-administration sub-router
async fn require_admin_layer(
    request: Request<Body>,
    next: Next,
) -> Result<Response, accounts::AuthError> {
    RequireRole::admin().middleware(request, next).await
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS middleware
pub fn create_router(db: PgPool) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    let jwt_secret = std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in environment");

    let auth_service = Arc::new(AuthService::new(
        AccountRepository::new(db.clone()),
        TokenRepository::new(db.clone()),
        TokenService::new(jwt_secret),
    ));

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()
        .expect("Failed to build HTTP client");

    let state = AppState {
        db,
        auth_service,
        http,
    };

    // Configure CORS to allow all origins, methods, and headers
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // User administration is admin-only as a whole; the role gate wraps the
    // sub-router before any handler runs
    let users_admin = Router::new()
        .route(
            "/users",
            get(account_handlers::list_users_handler).post(account_handlers::create_user_handler),
        )
        .route(
            "/users/:id",
            get(account_handlers::get_user_handler)
                .put(account_handlers::update_user_handler)
                .patch(account_handlers::update_user_handler)
                .delete(account_handlers::delete_user_handler),
        )
        .route("/users/:id/set-role", post(account_handlers::set_role_handler))
        .route(
            "/users/:id/set-active",
            post(account_handlers::set_active_handler),
        )
        .route_layer(middleware::from_fn(require_admin_layer));

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(health_handler))
        // Authentication and registration
        .route("/api/accounts/token", post(account_handlers::obtain_token_handler))
        .route(
            "/api/accounts/token/refresh",
            post(account_handlers::refresh_token_handler),
        )
        .route(
            "/api/accounts/token/verify",
            post(account_handlers::verify_token_handler),
        )
        .route("/api/accounts/register", post(account_handlers::register_handler))
        // Own profile
        .route(
            "/api/accounts/me",
            get(account_handlers::me_handler)
                .put(account_handlers::update_me_handler)
                .patch(account_handlers::update_me_handler),
        )
        .route(
            "/api/accounts/me/change-password",
            post(account_handlers::change_password_handler),
        )
        // User administration
        .nest("/api/accounts", users_admin)
        // Companies
        .route(
            "/api/companies",
            get(companies::list_companies_handler).post(companies::create_company_handler),
        )
        .route("/api/companies/primary", get(companies::get_primary_company_handler))
        .route(
            "/api/companies/:id",
            get(companies::get_company_handler)
                .put(companies::update_company_handler)
                .patch(companies::update_company_handler)
                .delete(companies::delete_company_handler),
        )
        // Clients
        .route(
            "/api/clients",
            get(clients::list_clients_handler).post(clients::create_client_handler),
        )
        .route(
            "/api/clients/:id",
            get(clients::get_client_handler)
                .put(clients::update_client_handler)
                .patch(clients::update_client_handler)
                .delete(clients::delete_client_handler),
        )
        // Providers
        .route(
            "/api/providers",
            get(providers::list_providers_handler).post(providers::create_provider_handler),
        )
        .route(
            "/api/providers/:id",
            get(providers::get_provider_handler)
                .put(providers::update_provider_handler)
                .patch(providers::update_provider_handler)
                .delete(providers::delete_provider_handler),
        )
        // Warehouses
        .route(
            "/api/warehouses",
            get(warehouses::list_warehouses_handler).post(warehouses::create_warehouse_handler),
        )
        .route(
            "/api/warehouses/:id",
            get(warehouses::get_warehouse_handler)
                .put(warehouses::update_warehouse_handler)
                .patch(warehouses::update_warehouse_handler)
                .delete(warehouses::delete_warehouse_handler),
        )
        // Articles
        .route(
            "/api/articles",
            get(articles::list_articles_handler).post(articles::create_article_handler),
        )
        .route(
            "/api/articles/:id",
            get(articles::get_article_handler)
                .put(articles::update_article_handler)
                .patch(articles::update_article_handler)
                .delete(articles::delete_article_handler),
        )
        // Third-party proxies
        .route(
            "/api/locations/get-city-name",
            post(locations::get_city_name_handler),
        )
        .route(
            "/api/locations/generate-description",
            post(locations::generate_description_handler),
        )
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Back-Office API - Starting...");

    // Get configuration from environment variables
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&database_url)
        .await
        .expect("Failed to create database pool");

    // Run SQLx migrations on startup
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    // Create the application router
    let app = create_router(db_pool);

    // Start the Axum server
    let addr = format!("{}:{}", host, port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Back-Office API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await.expect("Server error");
}

#[cfg(test)]
mod tests;
