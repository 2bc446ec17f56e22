//! crates/fake_data_core/src/batch.rs
//!
//! One-shot generation without a session: validate, optionally sample a length
//! schema for this batch alone, and produce every record at once.

use crate::assembler::assemble_batch;
use crate::catalog::FieldRegistry;
use crate::domain::{GenerationParams, Limits, Record, ValidationError};
use crate::normalizer::sample_schema;

/// Generates `numRecords` unseeded records.
pub fn generate_batch(
    registry: &FieldRegistry,
    params: GenerationParams,
    limits: &Limits,
) -> Result<Vec<Record>, ValidationError> {
    let config = params.into_batch_config(limits)?;
    let schema = config
        .uniform_length
        .then(|| sample_schema(registry, &config));
    Ok(assemble_batch(
        registry,
        &config,
        schema.as_ref(),
        config.records_per_page,
    ))
}
