//! crates/fake_data_core/src/domain.rs
//!
//! Defines the pure, core data structures for the generator.
//! These structs are independent of any transport or storage format.

use crate::assembler::NESTED_OBJECT_TAG;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A single generated record: field name -> scalar value or nested record.
pub type Record = Map<String, Value>;

//=========================================================================================
// Generation Configuration
//=========================================================================================

/// The shape of the records to generate. Immutable once a session is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    pub field_count: u32,
    pub nested_object_count: u32,
    pub nesting_depth: u32,
    pub nested_field_count: u32,
    pub total_records: u64,
    pub records_per_page: u32,
    pub uniform_length: bool,
    /// Client-supplied catalog order. `None` means the standard catalog.
    pub field_types: Option<Vec<String>>,
}

impl GenerationConfig {
    /// Number of pages needed to cover `total_records`.
    pub fn total_pages(&self) -> u64 {
        self.total_records
            .div_ceil(u64::from(self.records_per_page.max(1)))
    }

    /// Record count for a 1-based page number, or `None` if the page does not exist.
    pub fn records_on_page(&self, page_number: u64) -> Option<u32> {
        if page_number == 0 || page_number > self.total_pages() {
            return None;
        }
        let per_page = u64::from(self.records_per_page);
        let already_served = (page_number - 1) * per_page;
        let remaining = self.total_records - already_served;
        // `remaining.min(per_page)` always fits in `records_per_page`'s type.
        Some(remaining.min(per_page) as u32)
    }
}

/// Validation bounds applied to client-supplied parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    pub max_fields: u32,
    pub max_nested_objects: u32,
    pub max_nesting_depth: u32,
    pub max_nested_fields: u32,
    pub max_total_records: u64,
    pub min_records_per_page: u32,
    pub max_records_per_page: u32,
    pub default_records_per_page: u32,
    /// Upper bound for the non-paginated endpoint.
    pub max_batch_records: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_fields: 300,
            max_nested_objects: 5,
            max_nesting_depth: 3,
            max_nested_fields: 50,
            max_total_records: 1_000_000,
            min_records_per_page: 10,
            max_records_per_page: 1000,
            default_records_per_page: 100,
            max_batch_records: 1000,
        }
    }
}

/// A client parameter was missing or outside the configured bounds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

/// Raw, unvalidated generation parameters as a client sent them.
#[derive(Debug, Clone, Default)]
pub struct GenerationParams {
    pub field_count: Option<i64>,
    pub nested_object_count: Option<i64>,
    pub nesting_depth: Option<i64>,
    pub nested_field_count: Option<i64>,
    pub total_records: Option<i64>,
    pub records_per_page: Option<i64>,
    pub uniform_length: Option<bool>,
    pub field_types: Option<Vec<String>>,
}

impl GenerationParams {
    /// Validates the parameters for a paginated session.
    pub fn into_config(self, limits: &Limits) -> Result<GenerationConfig, ValidationError> {
        let total_records = bounded(
            "totalRecords",
            self.total_records,
            None,
            1,
            i64::try_from(limits.max_total_records).unwrap_or(i64::MAX),
        )?;
        let records_per_page = bounded(
            "recordsPerPage",
            self.records_per_page,
            Some(i64::from(limits.default_records_per_page)),
            i64::from(limits.min_records_per_page),
            i64::from(limits.max_records_per_page),
        )?;
        self.shape(limits, total_records as u64, records_per_page as u32)
    }

    /// Validates the parameters for a one-shot, non-paginated batch.
    /// `total_records` carries the requested record count.
    pub fn into_batch_config(self, limits: &Limits) -> Result<GenerationConfig, ValidationError> {
        let count = bounded(
            "numRecords",
            self.total_records,
            None,
            1,
            i64::from(limits.max_batch_records),
        )?;
        self.shape(limits, count as u64, count as u32)
    }

    fn shape(
        self,
        limits: &Limits,
        total_records: u64,
        records_per_page: u32,
    ) -> Result<GenerationConfig, ValidationError> {
        let field_count = bounded(
            "numFields",
            self.field_count,
            None,
            1,
            i64::from(limits.max_fields),
        )?;
        let nested_object_count = bounded(
            "numObjects",
            self.nested_object_count,
            Some(0),
            0,
            i64::from(limits.max_nested_objects),
        )?;
        let nesting_depth = bounded(
            "numNesting",
            self.nesting_depth,
            Some(0),
            0,
            i64::from(limits.max_nesting_depth),
        )?;
        let nested_field_count = bounded(
            "nestedFields",
            self.nested_field_count,
            Some(0),
            0,
            i64::from(limits.max_nested_fields),
        )?;

        let field_types = match self.field_types {
            Some(tags) if tags.iter().any(|t| t.trim().is_empty()) => {
                return Err(ValidationError(
                    "fieldTypes must not contain empty entries".to_string(),
                ))
            }
            Some(tags) if tags.iter().any(|t| t.trim() == NESTED_OBJECT_TAG) => {
                return Err(ValidationError(format!(
                    "fieldTypes must not contain the reserved type '{NESTED_OBJECT_TAG}'"
                )))
            }
            Some(tags) if tags.is_empty() => None,
            other => other,
        };

        // Every bound above is well inside u32, so the narrowing casts are lossless.
        Ok(GenerationConfig {
            field_count: field_count as u32,
            nested_object_count: nested_object_count as u32,
            nesting_depth: nesting_depth as u32,
            nested_field_count: nested_field_count as u32,
            total_records,
            records_per_page,
            uniform_length: self.uniform_length.unwrap_or(false),
            field_types,
        })
    }
}

fn bounded(
    name: &str,
    value: Option<i64>,
    default: Option<i64>,
    min: i64,
    max: i64,
) -> Result<i64, ValidationError> {
    let value = value
        .or(default)
        .ok_or_else(|| ValidationError(format!("{name} is required")))?;
    if value < min || value > max {
        return Err(ValidationError(format!(
            "{name} must be between {min} and {max}, got {value}"
        )));
    }
    Ok(value)
}

//=========================================================================================
// Length Schema
//=========================================================================================

/// Target rendered length for one field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthTarget {
    /// Every value of this type is coerced to exactly this many characters.
    Exact(usize),
    /// Values keep their natural length (fixed-format or non-string types).
    Natural,
}

/// Per-session mapping from field-type tag to its target length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LengthSchema {
    targets: BTreeMap<String, LengthTarget>,
}

impl LengthSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a target for `tag` unless one is already present. The first
    /// sampled occurrence of a type wins.
    pub fn insert_if_absent(&mut self, tag: &str, target: LengthTarget) {
        self.targets.entry(tag.to_string()).or_insert(target);
    }

    pub fn target(&self, tag: &str) -> Option<LengthTarget> {
        self.targets.get(tag).copied()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, LengthTarget)> {
        self.targets.iter().map(|(tag, target)| (tag.as_str(), *target))
    }
}

//=========================================================================================
// Session
//=========================================================================================

/// A paginated generation session held by the session store.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub config: GenerationConfig,
    pub length_schema: Option<LengthSchema>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

//=========================================================================================
// Pages
//=========================================================================================

/// A request for one page, either opening a new session or continuing one.
#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    /// `None` or an empty string opens a new session.
    pub session_id: Option<String>,
    pub page_number: Option<i64>,
    /// Only consulted when a new session is opened.
    pub params: GenerationParams,
}

/// Position of a page within its session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationMeta {
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

/// One generated page of a session.
#[derive(Debug, Clone)]
pub struct Page {
    pub session_id: String,
    pub records: Vec<Record>,
    pub meta: PaginationMeta,
}
