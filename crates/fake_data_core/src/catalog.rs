//! crates/fake_data_core/src/catalog.rs
//!
//! The field-type catalog: one static table mapping every recognised type tag to
//! its value kind, its length semantics and the function that produces a value.
//! The table order is the order in which record fields are assigned.

use chrono::{DateTime, Utc};
use fake::faker::{
    address::en as address, barcode::en as barcode, company::en as company,
    creditcard::en as creditcard, currency::en as currency, filesystem::en as filesystem,
    internet::en as internet, job::en as job, lorem::en as lorem, name::en as name,
    phone_number::en as phone,
};
use fake::{Dummy, Fake};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

/// Upper bound (exclusive) for generated timestamps: 2030-01-01T00:00:00Z.
const MAX_TIMESTAMP_SECS: i64 = 1_893_456_000;

/// The JSON type a field's values take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Integer,
    Float,
    Boolean,
}

/// Produces one value from a record-local random source.
pub type GenerateFn = fn(&mut ChaCha8Rng) -> Value;

/// One entry of the catalog.
#[derive(Clone, Copy)]
pub struct FieldSpec {
    pub tag: &'static str,
    pub kind: ValueKind,
    /// The natural length carries meaning (identifiers, codes, formatted dates).
    pub fixed_format: bool,
    pub generate: GenerateFn,
}

impl std::fmt::Debug for FieldSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldSpec")
            .field("tag", &self.tag)
            .field("kind", &self.kind)
            .field("fixed_format", &self.fixed_format)
            .finish_non_exhaustive()
    }
}

impl FieldSpec {
    /// Whether uniform-length mode may pad or truncate values of this type.
    pub fn is_length_normalised(&self) -> bool {
        self.kind == ValueKind::Text && !self.fixed_format
    }
}

//=========================================================================================
// The Standard Table
//=========================================================================================

const fn field(
    tag: &'static str,
    kind: ValueKind,
    fixed_format: bool,
    generate: GenerateFn,
) -> FieldSpec {
    FieldSpec {
        tag,
        kind,
        fixed_format,
        generate,
    }
}

use ValueKind::{Boolean, Float, Integer, Text};

static STANDARD_FIELDS: &[FieldSpec] = &[
    field("id", Text, true, |rng| text(Uuid::from_u128(rng.random()).to_string())),
    field("firstName", Text, false, |rng| faked(name::FirstName(), rng)),
    field("lastName", Text, false, |rng| faked(name::LastName(), rng)),
    field("fullName", Text, false, |rng| faked(name::Name(), rng)),
    field("username", Text, false, |rng| faked(internet::Username(), rng)),
    field("email", Text, false, |rng| faked(internet::SafeEmail(), rng)),
    field("age", Integer, false, |rng| json!(rng.random_range(18..=90_u32))),
    field("isActive", Boolean, false, |rng| json!(rng.random_bool(0.5))),
    field("phoneNumber", Text, false, |rng| faked(phone::PhoneNumber(), rng)),
    field("cellNumber", Text, false, |rng| faked(phone::CellNumber(), rng)),
    field("streetAddress", Text, false, |rng| {
        let number: String = address::BuildingNumber().fake_with_rng(rng);
        let street: String = address::StreetName().fake_with_rng(rng);
        text(format!("{number} {street}"))
    }),
    field("city", Text, false, |rng| faked(address::CityName(), rng)),
    field("state", Text, false, |rng| faked(address::StateName(), rng)),
    field("stateAbbr", Text, true, |rng| faked(address::StateAbbr(), rng)),
    field("zipCode", Text, false, |rng| faked(address::ZipCode(), rng)),
    field("country", Text, false, |rng| faked(address::CountryName(), rng)),
    field("countryCode", Text, true, |rng| faked(address::CountryCode(), rng)),
    field("timeZone", Text, false, |rng| faked(address::TimeZone(), rng)),
    field("latitude", Float, false, |rng| rounded(rng.random_range(-90.0..=90.0), 6)),
    field("longitude", Float, false, |rng| rounded(rng.random_range(-180.0..=180.0), 6)),
    field("companyName", Text, false, |rng| faked(company::CompanyName(), rng)),
    field("industry", Text, false, |rng| faked(company::Industry(), rng)),
    field("buzzword", Text, false, |rng| faked(company::Buzzword(), rng)),
    field("profession", Text, false, |rng| faked(company::Profession(), rng)),
    field("jobTitle", Text, false, |rng| faked(job::Title(), rng)),
    field("price", Float, false, |rng| rounded(rng.random_range(1.0..1000.0), 2)),
    field("quantity", Integer, false, |rng| json!(rng.random_range(1..=1000_u32))),
    field("rating", Integer, false, |rng| json!(rng.random_range(1..=5_u32))),
    field("percentage", Float, false, |rng| rounded(rng.random_range(0.0..=100.0), 2)),
    field("currencyCode", Text, true, |rng| faked(currency::CurrencyCode(), rng)),
    field("currencyName", Text, false, |rng| faked(currency::CurrencyName(), rng)),
    field("creditCardNumber", Text, true, |rng| faked(creditcard::CreditCardNumber(), rng)),
    field("isVerified", Boolean, false, |rng| json!(rng.random_ratio(3, 4))),
    field("word", Text, false, |rng| faked(lorem::Word(), rng)),
    field("sentence", Text, false, |rng| faked(lorem::Sentence(4..10), rng)),
    field("paragraph", Text, false, |rng| faked(lorem::Paragraph(2..4), rng)),
    field("domainName", Text, false, |rng| {
        let word: String = lorem::Word().fake_with_rng(rng);
        let suffix: String = internet::DomainSuffix().fake_with_rng(rng);
        text(format!("{}.{suffix}", word.to_lowercase()))
    }),
    field("url", Text, false, |rng| {
        let word: String = lorem::Word().fake_with_rng(rng);
        let suffix: String = internet::DomainSuffix().fake_with_rng(rng);
        text(format!("https://www.{}.{suffix}", word.to_lowercase()))
    }),
    field("ipv4", Text, false, |rng| faked(internet::IPv4(), rng)),
    field("ipv6", Text, false, |rng| faked(internet::IPv6(), rng)),
    field("macAddress", Text, true, |rng| faked(internet::MACAddress(), rng)),
    field("userAgent", Text, false, |rng| faked(internet::UserAgent(), rng)),
    field("password", Text, false, |rng| faked(internet::Password(8..16), rng)),
    field("year", Integer, false, |rng| json!(rng.random_range(1950..=2030_u32))),
    field("date", Text, true, |rng| {
        text(random_timestamp(rng).format("%Y-%m-%d").to_string())
    }),
    field("dateTime", Text, true, |rng| text(random_timestamp(rng).to_rfc3339())),
    field("hexColor", Text, true, |rng| {
        text(format!("#{:06x}", rng.random_range(0..0x0100_0000_u32)))
    }),
    field("fileName", Text, false, |rng| faked(filesystem::FileName(), rng)),
    field("fileExtension", Text, false, |rng| faked(filesystem::FileExtension(), rng)),
    field("mimeType", Text, false, |rng| faked(filesystem::MimeType(), rng)),
    field("isbn", Text, true, |rng| faked(barcode::Isbn13(), rng)),
];

fn text(value: String) -> Value {
    Value::String(value)
}

fn faked<F>(faker: F, rng: &mut ChaCha8Rng) -> Value
where
    String: Dummy<F>,
{
    text(faker.fake_with_rng(rng))
}

fn rounded(value: f64, places: i32) -> Value {
    let factor = 10_f64.powi(places);
    json!((value * factor).round() / factor)
}

fn random_timestamp(rng: &mut ChaCha8Rng) -> DateTime<Utc> {
    let secs = rng.random_range(0..MAX_TIMESTAMP_SECS);
    DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default()
}

/// Value used for tags the catalog does not know.
fn fallback_value(rng: &mut ChaCha8Rng) -> Value {
    faked(lorem::Word(), rng)
}

//=========================================================================================
// Registry
//=========================================================================================

/// Lookup table over the catalog, built once at startup and shared.
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    fields: Vec<FieldSpec>,
    by_tag: HashMap<&'static str, usize>,
}

impl FieldRegistry {
    /// The built-in catalog.
    pub fn standard() -> Self {
        Self::from_fields(STANDARD_FIELDS.to_vec())
    }

    pub fn from_fields(fields: Vec<FieldSpec>) -> Self {
        let by_tag = fields
            .iter()
            .enumerate()
            .map(|(index, spec)| (spec.tag, index))
            .collect();
        Self { fields, by_tag }
    }

    pub fn get(&self, tag: &str) -> Option<&FieldSpec> {
        self.by_tag.get(tag).and_then(|&index| self.fields.get(index))
    }

    /// Tags in catalog order.
    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|spec| spec.tag)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Tags from `tags` that the catalog does not recognise.
    pub fn unknown_tags<'a>(&self, tags: &'a [String]) -> Vec<&'a str> {
        tags.iter()
            .map(String::as_str)
            .filter(|tag| self.get(tag).is_none())
            .collect()
    }

    /// Unknown tags produce a generic string, so they take part in normalisation.
    pub fn is_length_normalised(&self, tag: &str) -> bool {
        self.get(tag).map_or(true, FieldSpec::is_length_normalised)
    }

    /// Generates one value for `tag`. Never fails: unknown tags fall back to a
    /// generic word.
    pub fn generate(&self, tag: &str, rng: &mut ChaCha8Rng) -> Value {
        match self.get(tag) {
            Some(spec) => (spec.generate)(rng),
            None => {
                debug!(tag, "unknown field type, using fallback value");
                fallback_value(rng)
            }
        }
    }
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
