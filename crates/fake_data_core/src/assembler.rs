//! crates/fake_data_core/src/assembler.rs
//!
//! Builds records by cycling through the field catalog and asking the registry
//! for one value per field, recursing for nested objects.
//!
//! Every record gets its own `ChaCha8Rng`. Seeded records are therefore
//! reproducible regardless of what other requests are doing concurrently.

use crate::catalog::FieldRegistry;
use crate::domain::{GenerationConfig, LengthSchema, Record};
use crate::normalizer::normalize;
use crate::seed::record_seed;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde_json::Value;

/// Tag used for the keys of nested objects.
pub const NESTED_OBJECT_TAG: &str = "nestedObject";

/// Tag used when the catalog is empty.
const FALLBACK_TAG: &str = "field";

/// Field name for the `ordinal`-th (1-based) field of a given type.
pub fn field_name(tag: &str, ordinal: u32) -> String {
    format!("{tag}_{ordinal}")
}

/// Recovers the type tag from a field name produced by [`field_name`].
pub fn field_tag(key: &str) -> &str {
    key.rsplit_once('_').map_or(key, |(tag, _)| tag)
}

/// Assembles one record. With `seed` the output is fully determined by
/// `(config, schema, seed)`; without it the record is drawn from OS entropy.
pub fn assemble(
    registry: &FieldRegistry,
    config: &GenerationConfig,
    schema: Option<&LengthSchema>,
    seed: Option<u64>,
) -> Record {
    let mut rng = match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_os_rng(),
    };
    RecordBuilder::new(registry, config, schema).build(&mut rng)
}

/// Assembles the `count` records of one page. Record `i` is seeded with
/// `record_seed(page_seed, i)`.
pub fn assemble_page(
    registry: &FieldRegistry,
    config: &GenerationConfig,
    schema: Option<&LengthSchema>,
    page_seed: u32,
    count: u32,
) -> Vec<Record> {
    let builder = RecordBuilder::new(registry, config, schema);
    (0..u64::from(count))
        .map(|index| {
            let mut rng = ChaCha8Rng::seed_from_u64(record_seed(page_seed, index));
            builder.build(&mut rng)
        })
        .collect()
}

/// Assembles `count` unseeded records.
pub fn assemble_batch(
    registry: &FieldRegistry,
    config: &GenerationConfig,
    schema: Option<&LengthSchema>,
    count: u32,
) -> Vec<Record> {
    let builder = RecordBuilder::new(registry, config, schema);
    let mut rng = ChaCha8Rng::from_os_rng();
    (0..count).map(|_| builder.build(&mut rng)).collect()
}

//=========================================================================================
// Record Builder
//=========================================================================================

struct RecordBuilder<'a> {
    registry: &'a FieldRegistry,
    config: &'a GenerationConfig,
    schema: Option<&'a LengthSchema>,
    tags: Vec<&'a str>,
}

impl<'a> RecordBuilder<'a> {
    fn new(
        registry: &'a FieldRegistry,
        config: &'a GenerationConfig,
        schema: Option<&'a LengthSchema>,
    ) -> Self {
        let tags = match &config.field_types {
            Some(custom) => custom.iter().map(String::as_str).collect(),
            None => registry.tags().collect(),
        };
        Self {
            registry,
            config,
            schema,
            tags,
        }
    }

    fn build(&self, rng: &mut ChaCha8Rng) -> Record {
        let mut record = self.flat(self.config.field_count, rng);
        if let Some(depth) = self.config.nesting_depth.checked_sub(1) {
            self.attach_nested(&mut record, depth, rng);
        }
        record
    }

    fn nested(&self, depth: u32, rng: &mut ChaCha8Rng) -> Record {
        let mut object = self.flat(self.config.nested_field_count, rng);
        if let Some(next) = depth.checked_sub(1) {
            self.attach_nested(&mut object, next, rng);
        }
        object
    }

    fn attach_nested(&self, record: &mut Record, depth: u32, rng: &mut ChaCha8Rng) {
        for ordinal in 1..=self.config.nested_object_count {
            let object = self.nested(depth, rng);
            record.insert(field_name(NESTED_OBJECT_TAG, ordinal), Value::Object(object));
        }
    }

    fn flat(&self, count: u32, rng: &mut ChaCha8Rng) -> Record {
        let mut record = Record::new();
        for ordinal in 1..=count {
            let tag = self.tag_at(ordinal - 1);
            let raw = self.registry.generate(tag, rng);
            let value = match self.schema {
                Some(schema) => normalize(raw, tag, schema, rng),
                None => raw,
            };
            record.insert(field_name(tag, ordinal), value);
        }
        record
    }

    fn tag_at(&self, position: u32) -> &'a str {
        if self.tags.is_empty() {
            return FALLBACK_TAG;
        }
        let index = position as usize % self.tags.len();
        self.tags.get(index).copied().unwrap_or(FALLBACK_TAG)
    }
}
