//! services/api/src/adapters/memory.rs
//!
//! The in-process session store. Implements the `SessionStore` port with a single
//! mutex around a `HashMap` and a sliding time-to-live per session.

use async_trait::async_trait;
use chrono::Duration;
use fake_data_core::domain::{GenerationConfig, LengthSchema, Session};
use fake_data_core::ports::{Clock, PortError, PortResult, SessionStore, SystemClock};
use fake_data_core::seed::new_session_id;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// Sessions live only as long as the process, and only as long as they are used.
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, Session>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl InMemorySessionStore {
    /// Creates a store on the wall clock.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Creates a store that reads time from `clock`.
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
            clock,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

//=========================================================================================
// `SessionStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(
        &self,
        config: GenerationConfig,
        length_schema: Option<LengthSchema>,
    ) -> PortResult<String> {
        let now = self.clock.now();
        let mut sessions = self.sessions.lock().await;

        let mut id = new_session_id(now);
        while sessions.contains_key(&id) {
            id = new_session_id(now);
        }

        sessions.insert(
            id.clone(),
            Session {
                id: id.clone(),
                config,
                length_schema,
                created_at: now,
                expires_at: now + self.ttl,
            },
        );
        Ok(id)
    }

    async fn get(&self, session_id: &str) -> PortResult<Session> {
        let now = self.clock.now();
        let mut sessions = self.sessions.lock().await;

        match sessions.get_mut(session_id) {
            Some(session) if !session.is_expired_at(now) => {
                session.expires_at = now + self.ttl;
                return Ok(session.clone());
            }
            Some(_) => {
                sessions.remove(session_id);
                debug!(session_id, "Dropped expired session on access");
            }
            None => {}
        }
        Err(PortError::NotFound(format!("Session {} not found", session_id)))
    }

    async fn remove(&self, session_id: &str) -> PortResult<bool> {
        let now = self.clock.now();
        let removed = self.sessions.lock().await.remove(session_id);
        // An expired entry awaiting the sweep counts as absent.
        Ok(removed.is_some_and(|session| !session.is_expired_at(now)))
    }

    async fn sweep_expired(&self) -> PortResult<usize> {
        let now = self.clock.now();
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, session| now <= session.expires_at);
        Ok(before - sessions.len())
    }

    async fn count(&self) -> PortResult<usize> {
        Ok(self.sessions.lock().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use fake_data_core::ports::ManualClock;

    fn clock() -> Arc<ManualClock> {
        Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        ))
    }

    fn config() -> GenerationConfig {
        GenerationConfig {
            field_count: 3,
            nested_object_count: 0,
            nesting_depth: 0,
            nested_field_count: 0,
            total_records: 100,
            records_per_page: 10,
            uniform_length: false,
            field_types: None,
        }
    }

    fn store(clock: &Arc<ManualClock>) -> InMemorySessionStore {
        InMemorySessionStore::with_clock(Duration::minutes(10), clock.clone())
    }

    #[tokio::test]
    async fn create_then_get_returns_stored_config() {
        let clock = clock();
        let store = store(&clock);
        let id = store.create(config(), None).await.unwrap();
        let session = store.get(&id).await.unwrap();
        assert_eq!(session.id, id);
        assert_eq!(session.config, config());
        assert_eq!(session.expires_at, clock.now() + Duration::minutes(10));
    }

    #[tokio::test]
    async fn get_slides_expiry_forward() {
        let clock = clock();
        let store = store(&clock);
        let id = store.create(config(), None).await.unwrap();

        clock.advance(Duration::minutes(8));
        store.get(&id).await.unwrap();
        clock.advance(Duration::minutes(8));
        // 16 minutes after creation, but only 8 since the last access.
        let session = store.get(&id).await.unwrap();
        assert_eq!(session.expires_at, clock.now() + Duration::minutes(10));
    }

    #[tokio::test]
    async fn expired_session_is_not_found_and_deleted() {
        let clock = clock();
        let store = store(&clock);
        let id = store.create(config(), None).await.unwrap();

        clock.advance(Duration::minutes(10) + Duration::seconds(1));
        assert!(matches!(store.get(&id).await, Err(PortError::NotFound(_))));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn exactly_at_expiry_is_still_alive() {
        let clock = clock();
        let store = store(&clock);
        let id = store.create(config(), None).await.unwrap();
        clock.advance(Duration::minutes(10));
        assert!(store.get(&id).await.is_ok());
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let clock = clock();
        let store = store(&clock);
        assert!(matches!(store.get("session_0_x").await, Err(PortError::NotFound(_))));
    }

    #[tokio::test]
    async fn sweep_removes_only_expired_sessions() {
        let clock = clock();
        let store = store(&clock);
        let old = store.create(config(), None).await.unwrap();
        clock.advance(Duration::minutes(6));
        let fresh = store.create(config(), None).await.unwrap();
        clock.advance(Duration::minutes(6));

        assert_eq!(store.sweep_expired().await.unwrap(), 1);
        assert_eq!(store.count().await.unwrap(), 1);
        assert!(store.get(&fresh).await.is_ok());
        assert!(store.get(&old).await.is_err());
    }

    #[tokio::test]
    async fn remove_evicts() {
        let clock = clock();
        let store = store(&clock);
        let id = store.create(config(), None).await.unwrap();
        assert!(store.remove(&id).await.unwrap());
        assert!(!store.remove(&id).await.unwrap());
        assert!(store.get(&id).await.is_err());
    }

    #[tokio::test]
    async fn removing_an_expired_session_looks_like_removing_an_unknown_one() {
        let clock = clock();
        let store = store(&clock);
        let id = store.create(config(), None).await.unwrap();
        clock.advance(Duration::minutes(30));

        let expired = store.remove(&id).await.unwrap();
        let never_existed = store.remove("session_1_never").await.unwrap();
        assert_eq!(expired, never_existed);
        assert!(!expired);
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn concurrent_creates_yield_unique_ids() {
        let clock = clock();
        let store = Arc::new(store(&clock));
        let handles: Vec<_> = (0..50)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.create(config(), None).await.unwrap() })
            })
            .collect();

        let mut ids = std::collections::HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap());
        }
        assert_eq!(ids.len(), 50);
        assert_eq!(store.count().await.unwrap(), 50);
    }
}
