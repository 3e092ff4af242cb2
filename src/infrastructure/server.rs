// Server module - assembles the HTTP application served by main.rs

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api;
use crate::api_docs::ApiDoc;
use crate::infrastructure::AppState;
use crate::infrastructure::config::Config;

/// Prefix of the book admin area
pub const BOOK_ADMIN_PREFIX: &str = "/manage/book";

/// Public path under which saved images are served
pub const UPLOADS_ROUTE: &str = "/uploads/books";

/// Build the full application router
pub fn build_router(state: AppState, config: &Config) -> Router {
    let mut cors_allowed_origins = Vec::new();
    for origin in &config.cors_allowed_origins {
        match origin.parse::<axum::http::HeaderValue>() {
            Ok(v) => cors_allowed_origins.push(v),
            Err(e) => tracing::error!("Failed to parse CORS origin '{}': {}", origin, e),
        }
    }

    let uploads = ServeDir::new(state.uploads.root());
    let admin = api::admin_router(state).layer(DefaultBodyLimit::max(config.max_body_bytes));

    Router::new()
        .merge(SwaggerUi::new("/api/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(api::health::health_check))
        .nest(BOOK_ADMIN_PREFIX, admin)
        .nest_service(UPLOADS_ROUTE, uploads)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(cors_allowed_origins)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
