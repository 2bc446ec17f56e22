//! crates/fake_data_core/src/seed.rs
//!
//! Session identifiers and the deterministic seeds derived from them.
//!
//! A session id has the shape `session_{millis}_{suffix}`. Only the random suffix
//! feeds the page seed, so the seed for a page depends on nothing but the session
//! and the page number.

use chrono::{DateTime, Utc};
use uuid::Uuid;

const SESSION_PREFIX: &str = "session";

/// Stride between the seeds of consecutive records of one page.
pub const RECORD_SEED_STRIDE: u64 = 1000;

/// Builds a fresh session identifier from a timestamp and a random suffix.
pub fn new_session_id(now: DateTime<Utc>) -> String {
    format!(
        "{SESSION_PREFIX}_{}_{}",
        now.timestamp_millis(),
        Uuid::new_v4().simple()
    )
}

/// The random component of a session id: everything after the last `_`.
/// Ids without a separator are used whole.
pub fn random_suffix(session_id: &str) -> &str {
    session_id.rsplit('_').next().unwrap_or(session_id)
}

/// Seed for one page of a session.
///
/// Rolling polynomial hash (`h = h * 31 + unit`, wrapping at 32 bits, signed) over the
/// session's random suffix followed by the decimal page number, then the absolute value.
/// Hashes UTF-16 code units so ids containing non-ASCII text hash the same way
/// a JavaScript client would.
pub fn derive_seed(session_id: &str, page_number: u64) -> u32 {
    let page = page_number.to_string();
    let hash = random_suffix(session_id)
        .encode_utf16()
        .chain(page.encode_utf16())
        .fold(0_i32, |hash, unit| {
            hash.wrapping_mul(31).wrapping_add(i32::from(unit))
        });
    hash.unsigned_abs()
}

/// Seed for record `index` (0-based) of a page whose seed is `page_seed`.
pub fn record_seed(page_seed: u32, index: u64) -> u64 {
    u64::from(page_seed).wrapping_add(index.wrapping_mul(RECORD_SEED_STRIDE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;
    use std::collections::HashSet;

    #[test]
    fn session_id_has_timestamp_and_suffix() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let id = new_session_id(now);
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "session");
        assert_eq!(parts[1], now.timestamp_millis().to_string());
        assert_eq!(parts[2].len(), 32);
    }

    #[test]
    fn session_ids_do_not_collide() {
        let now = Utc::now();
        let ids: HashSet<String> = (0..1000).map(|_| new_session_id(now)).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[rstest]
    #[case("session_1700000000000_abc123", "abc123")]
    #[case("plain", "plain")]
    #[case("a_b_c", "c")]
    #[case("trailing_", "")]
    fn extracts_suffix(#[case] id: &str, #[case] suffix: &str) {
        assert_eq!(random_suffix(id), suffix);
    }

    #[test]
    fn known_hash_values() {
        // "a1": 97 * 31 + 49
        assert_eq!(derive_seed("session_1_a", 1), 3056);
        // Empty suffix: just the page digits.
        assert_eq!(derive_seed("x_", 7), 55);
    }

    #[test]
    fn seed_is_pure() {
        let id = "session_1700000000000_k3j4h5g6f";
        assert_eq!(derive_seed(id, 3), derive_seed(id, 3));
    }

    #[test]
    fn seed_ignores_timestamp_part() {
        assert_eq!(
            derive_seed("session_1_samesuffix", 9),
            derive_seed("session_2_samesuffix", 9)
        );
    }

    #[test]
    fn pages_get_distinct_seeds() {
        let id = new_session_id(Utc::now());
        let seeds: HashSet<u32> = (1..=100).map(|page| derive_seed(&id, page)).collect();
        assert_eq!(seeds.len(), 100);
    }

    #[test]
    fn wraps_instead_of_overflowing() {
        let long = format!("s_{}", "z".repeat(500));
        let _ = derive_seed(&long, u64::MAX);
    }

    #[test]
    fn record_seeds_step_by_stride() {
        assert_eq!(record_seed(5, 0), 5);
        assert_eq!(record_seed(5, 3), 3005);
        assert_eq!(record_seed(u32::MAX, 1), u64::from(u32::MAX) + 1000);
    }
}
