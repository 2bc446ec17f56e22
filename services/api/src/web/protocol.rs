//! services/api/src/web/protocol.rs
//!
//! Defines the JSON request and response bodies exchanged with HTTP clients.
//! Field names are camelCase on the wire.

use fake_data_core::catalog::{FieldSpec, ValueKind};
use fake_data_core::domain::{GenerationParams, Page, PageRequest, PaginationMeta, Record};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

//=========================================================================================
// Requests FROM the Client
//=========================================================================================

/// Body of `POST /api/generate/paginated`.
///
/// Omit `sessionId` (or send an empty string) to start a new session; the
/// generation parameters are then required. When continuing a session only
/// `sessionId` and `pageNumber` are read.
#[derive(Deserialize, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedRequest {
    pub session_id: Option<String>,
    pub page_number: Option<i64>,
    pub num_fields: Option<i64>,
    pub num_objects: Option<i64>,
    pub num_nesting: Option<i64>,
    pub total_records: Option<i64>,
    pub nested_fields: Option<i64>,
    pub uniform_field_length: Option<bool>,
    pub records_per_page: Option<i64>,
    /// Optional ordered list of field-type tags replacing the standard catalog.
    pub field_types: Option<Vec<String>>,
}

impl From<PaginatedRequest> for PageRequest {
    fn from(req: PaginatedRequest) -> Self {
        PageRequest {
            session_id: req.session_id,
            page_number: req.page_number,
            params: GenerationParams {
                field_count: req.num_fields,
                nested_object_count: req.num_objects,
                nesting_depth: req.num_nesting,
                nested_field_count: req.nested_fields,
                total_records: req.total_records,
                records_per_page: req.records_per_page,
                uniform_length: req.uniform_field_length,
                field_types: req.field_types,
            },
        }
    }
}

/// Body of `POST /api/generate`.
#[derive(Deserialize, Debug, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub num_fields: Option<i64>,
    pub num_objects: Option<i64>,
    pub num_nesting: Option<i64>,
    pub num_records: Option<i64>,
    pub nested_fields: Option<i64>,
    pub uniform_field_length: Option<bool>,
    pub field_types: Option<Vec<String>>,
}

impl From<GenerateRequest> for GenerationParams {
    fn from(req: GenerateRequest) -> Self {
        GenerationParams {
            field_count: req.num_fields,
            nested_object_count: req.num_objects,
            nesting_depth: req.num_nesting,
            nested_field_count: req.nested_fields,
            total_records: req.num_records,
            records_per_page: None,
            uniform_length: req.uniform_field_length,
            field_types: req.field_types,
        }
    }
}

//=========================================================================================
// Responses TO the Client
//=========================================================================================

/// Position of the returned page within its session.
#[derive(Serialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInfo {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_records: u64,
    pub records_per_page: u32,
    pub records_in_current_page: u32,
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub next_page_number: Option<u64>,
    pub prev_page_number: Option<u64>,
}

impl From<PaginationMeta> for PaginationInfo {
    fn from(meta: PaginationMeta) -> Self {
        Self {
            current_page: meta.current_page,
            total_pages: meta.total_pages,
            total_records: meta.total_records,
            records_per_page: meta.records_per_page,
            records_in_current_page: meta.records_in_current_page,
            has_next_page: meta.has_next_page,
            has_previous_page: meta.has_previous_page,
            next_page_number: meta.next_page_number,
            prev_page_number: meta.prev_page_number,
        }
    }
}

/// One page of a paginated session.
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse {
    pub success: bool,
    pub session_id: String,
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<Record>,
    pub pagination: PaginationInfo,
}

impl From<Page> for PaginatedResponse {
    fn from(page: Page) -> Self {
        Self {
            success: true,
            session_id: page.session_id,
            data: page.records,
            pagination: page.meta.into(),
        }
    }
}

/// Records from the non-paginated endpoint.
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub success: bool,
    pub count: usize,
    #[schema(value_type = Vec<Object>)]
    pub data: Vec<Record>,
}

/// One entry of the field-type catalog.
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldTypeInfo {
    pub tag: String,
    /// One of `string`, `integer`, `number` or `boolean`.
    pub kind: String,
    /// Whether `uniformFieldLength` pads or truncates values of this type.
    pub length_normalised: bool,
}

impl From<&FieldSpec> for FieldTypeInfo {
    fn from(spec: &FieldSpec) -> Self {
        let kind = match spec.kind {
            ValueKind::Text => "string",
            ValueKind::Integer => "integer",
            ValueKind::Float => "number",
            ValueKind::Boolean => "boolean",
        };
        Self {
            tag: spec.tag.to_string(),
            kind: kind.to_string(),
            length_normalised: spec.is_length_normalised(),
        }
    }
}

/// Liveness information.
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub active_sessions: usize,
}

/// Body of every non-2xx response.
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    /// Present when a page number was out of range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            total_pages: None,
        }
    }
}
