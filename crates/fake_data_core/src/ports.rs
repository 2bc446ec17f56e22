//! crates/fake_data_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the generator's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of where sessions live or where pages are mirrored.

use crate::domain::{GenerationConfig, LengthSchema, Record, Session};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Shared, concurrent storage for pagination sessions with a sliding TTL.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores a new session and returns its freshly generated identifier.
    async fn create(
        &self,
        config: GenerationConfig,
        length_schema: Option<LengthSchema>,
    ) -> PortResult<String>;

    /// Looks up a session and slides its expiry forward.
    ///
    /// Unknown and expired sessions both yield `PortError::NotFound`; an expired
    /// entry is deleted as part of the lookup.
    async fn get(&self, session_id: &str) -> PortResult<Session>;

    /// Evicts a session. Returns whether anything was removed.
    async fn remove(&self, session_id: &str) -> PortResult<bool>;

    /// Drops every session whose expiry has passed. Returns how many were removed.
    async fn sweep_expired(&self) -> PortResult<usize>;

    /// Number of sessions currently held, expired or not.
    async fn count(&self) -> PortResult<usize>;
}

/// One generated page as handed to the optional mirror store.
#[derive(Debug, Clone)]
pub struct ArchivedPage {
    pub session_id: String,
    pub page_number: u64,
    pub records: Vec<Record>,
    pub expires_at: DateTime<Utc>,
}

/// Best-effort mirror for generated pages. Failures never affect page generation.
#[async_trait]
pub trait PageArchive: Send + Sync {
    async fn archive_page(&self, page: ArchivedPage) -> PortResult<()>;

    /// Deletes mirrored pages past their expiry. Returns how many rows went away.
    async fn purge_expired(&self) -> PortResult<u64>;
}

/// Source of the current time, injectable so TTL behaviour can be tested.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
