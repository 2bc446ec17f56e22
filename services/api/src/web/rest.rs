//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::protocol::{
    ErrorResponse, FieldTypeInfo, GenerateRequest, GenerateResponse, HealthResponse,
    PaginatedRequest, PaginatedResponse, PaginationInfo,
};
use crate::web::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use fake_data_core::batch::generate_batch;
use fake_data_core::domain::{GenerationParams, Page};
use fake_data_core::ports::ArchivedPage;
use fake_data_core::PaginationError;
use std::sync::Arc;
use tracing::{debug, error, warn};
use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        generate_handler,
        paginated_handler,
        end_session_handler,
        field_types_handler,
        health_handler,
    ),
    components(
        schemas(
            GenerateRequest,
            GenerateResponse,
            PaginatedRequest,
            PaginatedResponse,
            PaginationInfo,
            FieldTypeInfo,
            HealthResponse,
            ErrorResponse
        )
    ),
    tags(
        (name = "Fake Data API", description = "Fake-data generation with reproducible pages.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Error Mapping
//=========================================================================================

/// The error half of every handler's return type.
pub type ApiFailure = (StatusCode, Json<ErrorResponse>);

fn reject(status: StatusCode, message: impl Into<String>) -> ApiFailure {
    (status, Json(ErrorResponse::new(message)))
}

fn bad_body(rejection: JsonRejection) -> ApiFailure {
    reject(StatusCode::BAD_REQUEST, rejection.body_text())
}

fn pagination_failure(err: PaginationError) -> ApiFailure {
    match err {
        PaginationError::Validation(e) => reject(StatusCode::BAD_REQUEST, e.to_string()),
        PaginationError::SessionNotFound => reject(StatusCode::NOT_FOUND, err.to_string()),
        PaginationError::PageOutOfRange { total_pages, .. } => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: err.to_string(),
                total_pages: Some(total_pages),
            }),
        ),
        PaginationError::Port(e) => {
            error!("Session store failure: {:?}", e);
            reject(StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate page")
        }
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Generate a one-off batch of records.
#[utoipa::path(
    post,
    path = "/api/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Records generated", body = GenerateResponse),
        (status = 400, description = "Missing or out-of-range parameter", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn generate_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiFailure> {
    let Json(req) = payload.map_err(bad_body)?;
    let registry = Arc::clone(app_state.pagination.registry());
    let limits = app_state.pagination.limits().clone();

    let params = GenerationParams::from(req);
    let records = tokio::task::spawn_blocking(move || generate_batch(&registry, params, &limits))
        .await
        .map_err(|e| {
            error!("Batch generation task failed: {:?}", e);
            reject(StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate records")
        })?
        .map_err(|e| reject(StatusCode::BAD_REQUEST, e.to_string()))?;

    debug!(count = records.len(), "Generated batch");
    Ok(Json(GenerateResponse {
        success: true,
        count: records.len(),
        data: records,
    }))
}

/// Start a paginated session, or fetch another page of an existing one.
///
/// The same `(sessionId, pageNumber)` always returns identical records while
/// the session is alive. Every successful request extends the session's lifetime.
#[utoipa::path(
    post,
    path = "/api/generate/paginated",
    request_body = PaginatedRequest,
    responses(
        (status = 200, description = "One page of records", body = PaginatedResponse),
        (status = 400, description = "Invalid parameter or bad page", body = ErrorResponse),
        (status = 404, description = "Session expired or unknown", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn paginated_handler(
    State(app_state): State<Arc<AppState>>,
    payload: Result<Json<PaginatedRequest>, JsonRejection>,
) -> Result<Json<PaginatedResponse>, ApiFailure> {
    let Json(req) = payload.map_err(bad_body)?;

    let plan = app_state
        .pagination
        .plan(req.into())
        .await
        .map_err(pagination_failure)?;

    let page = tokio::task::spawn_blocking(move || plan.render())
        .await
        .map_err(|e| {
            error!("Page generation task failed: {:?}", e);
            reject(StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate page")
        })?;

    mirror_page(&app_state, &page);
    Ok(Json(page.into()))
}

/// End a paginated session early.
#[utoipa::path(
    delete,
    path = "/api/sessions/{session_id}",
    responses(
        (status = 204, description = "Session removed"),
        (status = 404, description = "Session expired or unknown", body = ErrorResponse)
    ),
    params(
        ("session_id" = String, Path, description = "Identifier returned on session creation.")
    )
)]
pub async fn end_session_handler(
    State(app_state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, ApiFailure> {
    match app_state.pagination.end_session(&session_id).await {
        Ok(true) => Ok(StatusCode::NO_CONTENT),
        Ok(false) => Err(pagination_failure(PaginationError::SessionNotFound)),
        Err(e) => Err(pagination_failure(e)),
    }
}

/// List the recognised field types in catalog order.
#[utoipa::path(
    get,
    path = "/api/field-types",
    responses(
        (status = 200, description = "The field-type catalog", body = Vec<FieldTypeInfo>)
    )
)]
pub async fn field_types_handler(
    State(app_state): State<Arc<AppState>>,
) -> Json<Vec<FieldTypeInfo>> {
    let registry = app_state.pagination.registry();
    let catalog = registry
        .tags()
        .filter_map(|tag| registry.get(tag))
        .map(FieldTypeInfo::from)
        .collect();
    Json(catalog)
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
        (status = 500, description = "Session store unavailable", body = ErrorResponse)
    )
)]
pub async fn health_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<HealthResponse>, ApiFailure> {
    let active_sessions = app_state.pagination.store().count().await.map_err(|e| {
        error!("Session store failure: {:?}", e);
        reject(StatusCode::INTERNAL_SERVER_ERROR, "Session store unavailable")
    })?;
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        active_sessions,
    }))
}

//=========================================================================================
// Page Mirror
//=========================================================================================

/// Hands a copy of the page to the optional mirror without waiting for it.
/// Failures are logged and otherwise ignored.
fn mirror_page(app_state: &AppState, page: &Page) {
    let Some(archive) = app_state.archive.clone() else {
        return;
    };
    let archived = ArchivedPage {
        session_id: page.session_id.clone(),
        page_number: page.meta.current_page,
        records: page.records.clone(),
        expires_at: Utc::now() + app_state.config.archive_ttl,
    };
    tokio::spawn(async move {
        if let Err(e) = archive.archive_page(archived).await {
            warn!("Failed to mirror generated page: {:?}", e);
        }
    });
}
