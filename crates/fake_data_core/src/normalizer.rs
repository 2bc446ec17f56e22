//! crates/fake_data_core/src/normalizer.rs
//!
//! Uniform-length mode: sample one natural record to learn a target length per
//! field type, then pad or truncate every later string of that type to match.

use crate::assembler::{assemble, field_tag};
use crate::catalog::FieldRegistry;
use crate::domain::{GenerationConfig, LengthSchema, LengthTarget, Record};
use rand::distr::Alphanumeric;
use rand::Rng;
use serde_json::Value;

/// Builds a length schema from one freshly generated, un-normalised record.
pub fn sample_schema(registry: &FieldRegistry, config: &GenerationConfig) -> LengthSchema {
    let sample = assemble(registry, config, None, None);
    schema_from_record(registry, &sample)
}

/// Records the rendered length of every scalar field in `record`, recursing
/// into nested objects. Types that must keep their natural length are marked
/// [`LengthTarget::Natural`].
pub fn schema_from_record(registry: &FieldRegistry, record: &Record) -> LengthSchema {
    let mut schema = LengthSchema::new();
    collect_lengths(registry, record, &mut schema);
    schema
}

fn collect_lengths(registry: &FieldRegistry, record: &Record, schema: &mut LengthSchema) {
    for (key, value) in record {
        if let Value::Object(nested) = value {
            collect_lengths(registry, nested, schema);
            continue;
        }
        let tag = field_tag(key);
        let target = if registry.is_length_normalised(tag) {
            LengthTarget::Exact(render(value).chars().count())
        } else {
            LengthTarget::Natural
        };
        schema.insert_if_absent(tag, target);
    }
}

/// Coerces `value` to the schema's target length for `tag`.
///
/// Types marked natural, or absent from the schema, pass through untouched.
/// Longer strings are cut to exactly the target; shorter ones are right-padded
/// with alphanumerics drawn from `rng`.
pub fn normalize<R: Rng + ?Sized>(
    value: Value,
    tag: &str,
    schema: &LengthSchema,
    rng: &mut R,
) -> Value {
    match schema.target(tag) {
        Some(LengthTarget::Exact(length)) => {
            Value::String(fit_to_length(render(&value), length, rng))
        }
        Some(LengthTarget::Natural) | None => value,
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn fit_to_length<R: Rng + ?Sized>(mut text: String, length: usize, rng: &mut R) -> String {
    let current = text.chars().count();
    if current > length {
        return text.chars().take(length).collect();
    }
    text.extend((current..length).map(|_| char::from(rng.sample(Alphanumeric))));
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn registry() -> FieldRegistry {
        FieldRegistry::standard()
    }

    #[fixture]
    fn schema() -> LengthSchema {
        let mut schema = LengthSchema::new();
        schema.insert_if_absent("email", LengthTarget::Exact(10));
        schema.insert_if_absent("id", LengthTarget::Natural);
        schema
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(3)
    }

    #[rstest]
    fn truncates_long_values(schema: LengthSchema) {
        let out = normalize(json!("someone@example.com"), "email", &schema, &mut rng());
        assert_eq!(out, json!("someone@ex"));
    }

    #[rstest]
    fn pads_short_values_with_alphanumerics(schema: LengthSchema) {
        let out = normalize(json!("a@b.c"), "email", &schema, &mut rng());
        let s = out.as_str().unwrap();
        assert_eq!(s.chars().count(), 10);
        assert!(s.starts_with("a@b.c"));
        assert!(s[5..].chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[rstest]
    fn padding_is_deterministic_for_a_seed(schema: LengthSchema) {
        let a = normalize(json!("x"), "email", &schema, &mut rng());
        let b = normalize(json!("x"), "email", &schema, &mut rng());
        assert_eq!(a, b);
    }

    #[rstest]
    fn leaves_exact_length_alone(schema: LengthSchema) {
        let out = normalize(json!("0123456789"), "email", &schema, &mut rng());
        assert_eq!(out, json!("0123456789"));
    }

    #[rstest]
    #[case::natural("id", json!("550e8400-e29b-41d4-a716-446655440000"))]
    #[case::absent("city", json!("Springfield"))]
    #[case::number_absent("age", json!(42))]
    fn passes_through_untargeted(schema: LengthSchema, #[case] tag: &str, #[case] value: Value) {
        assert_eq!(normalize(value.clone(), tag, &schema, &mut rng()), value);
    }

    #[rstest]
    fn counts_characters_not_bytes() {
        let mut schema = LengthSchema::new();
        schema.insert_if_absent("city", LengthTarget::Exact(3));
        let out = normalize(json!("Zürich"), "city", &schema, &mut rng());
        assert_eq!(out, json!("Zür"));
    }

    #[rstest]
    fn schema_marks_non_string_and_fixed_types_natural(registry: FieldRegistry) {
        let record: Record = json!({
            "id_1": "550e8400-e29b-41d4-a716-446655440000",
            "age_2": 31,
            "isActive_3": true,
            "price_4": 9.99,
            "email_5": "abc@example.org",
            "nestedObject_1": { "city_1": "Paris", "email_2": "much-longer@example.org" }
        })
        .as_object()
        .cloned()
        .unwrap();

        let schema = schema_from_record(&registry, &record);
        assert_eq!(schema.target("id"), Some(LengthTarget::Natural));
        assert_eq!(schema.target("age"), Some(LengthTarget::Natural));
        assert_eq!(schema.target("isActive"), Some(LengthTarget::Natural));
        assert_eq!(schema.target("price"), Some(LengthTarget::Natural));
        assert_eq!(schema.target("email"), Some(LengthTarget::Exact(15)));
        assert_eq!(schema.target("city"), Some(LengthTarget::Exact(5)));
        assert_eq!(schema.target("nestedObject"), None);
    }

    #[rstest]
    fn sampled_schema_covers_every_generated_type(registry: FieldRegistry) {
        let config = GenerationConfig {
            field_count: registry.len() as u32,
            nested_object_count: 0,
            nesting_depth: 0,
            nested_field_count: 0,
            total_records: 1,
            records_per_page: 10,
            uniform_length: true,
            field_types: None,
        };
        let schema = sample_schema(&registry, &config);
        assert_eq!(schema.len(), registry.len());
    }
}
