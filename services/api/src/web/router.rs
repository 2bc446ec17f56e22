//! services/api/src/web/router.rs
//!
//! Assembles the full Axum application: API routes, CORS, body limits and the
//! Swagger UI.

use crate::error::ApiError;
use crate::web::middleware::log_requests;
use crate::web::rest::{
    end_session_handler, field_types_handler, generate_handler, health_handler,
    paginated_handler, ApiDoc,
};
use crate::web::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{header::{ACCEPT, CONTENT_TYPE}, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Generation requests are small; anything larger is a client mistake.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Builds the application router around the shared state.
pub fn build_router(app_state: Arc<AppState>) -> Result<Router, ApiError> {
    let origin = app_state
        .config
        .cors_origin
        .parse::<HeaderValue>()
        .map_err(|e| ApiError::Internal(format!("Invalid CORS origin: {}", e)))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    let api_router = Router::new()
        .route("/api/generate", post(generate_handler))
        .route("/api/generate/paginated", post(paginated_handler))
        .route("/api/sessions/{session_id}", delete(end_session_handler))
        .route("/api/field-types", get(field_types_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(axum_middleware::from_fn(log_requests))
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    Ok(Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())))
}
