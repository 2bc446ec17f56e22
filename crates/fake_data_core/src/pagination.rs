//! crates/fake_data_core/src/pagination.rs
//!
//! The pagination controller. Each request either opens a session (page 1 only)
//! or continues one, and produces exactly one page. Nothing about "the current
//! page" is remembered: a page is fully determined by `(session id, page number)`.
//!
//! Work is split in two steps so callers can move the CPU-bound part off the
//! async runtime:
//! - [`PaginationController::plan`] talks to the session store and validates,
//! - [`PagePlan::render`] generates the records.

use crate::assembler::assemble_page;
use crate::catalog::FieldRegistry;
use crate::domain::{
    GenerationConfig, GenerationParams, LengthSchema, Limits, Page, PageRequest, PaginationMeta,
    ValidationError,
};
use crate::normalizer::sample_schema;
use crate::ports::{PortError, SessionStore};
use crate::seed::derive_seed;
use std::sync::Arc;
use tracing::{debug, info, warn};

//=========================================================================================
// Errors
//=========================================================================================

/// Every way a page request can fail. All of them are terminal for the request.
#[derive(Debug, thiserror::Error)]
pub enum PaginationError {
    /// A parameter is missing or out of bounds.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// Unknown and expired sessions are reported identically.
    #[error("Session not found or expired. Please start a new session.")]
    SessionNotFound,

    #[error("Page {requested} is out of range. Valid pages are 1 to {total_pages}.")]
    PageOutOfRange { requested: i64, total_pages: u64 },

    #[error("Service Port Error: {0}")]
    Port(PortError),
}

//=========================================================================================
// Controller
//=========================================================================================

/// Resolves page requests against the session store.
#[derive(Clone)]
pub struct PaginationController {
    store: Arc<dyn SessionStore>,
    registry: Arc<FieldRegistry>,
    limits: Limits,
}

impl PaginationController {
    pub fn new(store: Arc<dyn SessionStore>, registry: Arc<FieldRegistry>, limits: Limits) -> Self {
        Self {
            store,
            registry,
            limits,
        }
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn registry(&self) -> &Arc<FieldRegistry> {
        &self.registry
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Validates a request and resolves everything needed to render its page.
    pub async fn plan(&self, request: PageRequest) -> Result<PagePlan, PaginationError> {
        let session_id = request.session_id.filter(|id| !id.trim().is_empty());
        match session_id {
            None => self.open_session(request.page_number, request.params).await,
            Some(id) => self.continue_session(id, request.page_number).await,
        }
    }

    /// Plans and renders in one go.
    pub async fn fetch_page(&self, request: PageRequest) -> Result<Page, PaginationError> {
        Ok(self.plan(request).await?.render())
    }

    /// Evicts a session explicitly. Returns whether it existed.
    pub async fn end_session(&self, session_id: &str) -> Result<bool, PaginationError> {
        let removed = self
            .store
            .remove(session_id)
            .await
            .map_err(PaginationError::Port)?;
        if removed {
            info!(session_id, "Pagination session ended by client");
        }
        Ok(removed)
    }

    async fn open_session(
        &self,
        page_number: Option<i64>,
        params: GenerationParams,
    ) -> Result<PagePlan, PaginationError> {
        if let Some(page) = page_number.filter(|&page| page != 1) {
            return Err(ValidationError(format!(
                "pageNumber must be 1 when starting a new session, got {page}"
            ))
            .into());
        }

        let config = params.into_config(&self.limits)?;
        if let Some(tags) = &config.field_types {
            let unknown = self.registry.unknown_tags(tags);
            if !unknown.is_empty() {
                warn!(?unknown, "Unknown field types will use fallback values");
            }
        }

        let schema = config
            .uniform_length
            .then(|| sample_schema(&self.registry, &config));

        let session_id = self
            .store
            .create(config.clone(), schema.clone())
            .await
            .map_err(PaginationError::Port)?;

        match self.store.sweep_expired().await {
            Ok(0) => {}
            Ok(swept) => info!(swept, "Swept expired pagination sessions"),
            Err(e) => warn!("Failed to sweep expired sessions: {:?}", e),
        }

        info!(
            session_id = %session_id,
            total_pages = config.total_pages(),
            uniform_length = config.uniform_length,
            "Created pagination session"
        );
        self.plan_for(session_id, 1, config, schema)
    }

    async fn continue_session(
        &self,
        session_id: String,
        page_number: Option<i64>,
    ) -> Result<PagePlan, PaginationError> {
        let session = self.store.get(&session_id).await.map_err(|e| match e {
            PortError::NotFound(_) => PaginationError::SessionNotFound,
            other => PaginationError::Port(other),
        })?;

        let requested = page_number.unwrap_or(1);
        let page = u64::try_from(requested).unwrap_or(0);
        self.plan_for(session.id, page, session.config, session.length_schema)
            .map_err(|e| match e {
                PaginationError::PageOutOfRange { total_pages, .. } => {
                    PaginationError::PageOutOfRange {
                        requested,
                        total_pages,
                    }
                }
                other => other,
            })
    }

    fn plan_for(
        &self,
        session_id: String,
        page_number: u64,
        config: GenerationConfig,
        schema: Option<LengthSchema>,
    ) -> Result<PagePlan, PaginationError> {
        let record_count =
            config
                .records_on_page(page_number)
                .ok_or(PaginationError::PageOutOfRange {
                    requested: i64::try_from(page_number).unwrap_or(i64::MAX),
                    total_pages: config.total_pages(),
                })?;
        let seed = derive_seed(&session_id, page_number);
        debug!(session_id = %session_id, page_number, seed, record_count, "Planned page");

        Ok(PagePlan {
            registry: Arc::clone(&self.registry),
            session_id,
            page_number,
            config,
            schema,
            seed,
            record_count,
        })
    }
}

//=========================================================================================
// Page Plan
//=========================================================================================

/// Everything needed to render one page, detached from the session store.
#[derive(Debug, Clone)]
pub struct PagePlan {
    registry: Arc<FieldRegistry>,
    session_id: String,
    page_number: u64,
    config: GenerationConfig,
    schema: Option<LengthSchema>,
    seed: u32,
    record_count: u32,
}

impl PagePlan {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn page_number(&self) -> u64 {
        self.page_number
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn meta(&self) -> PaginationMeta {
        let current = self.page_number;
        let total_pages = self.config.total_pages();
        let has_next_page = current < total_pages;
        let has_previous_page = current > 1;
        PaginationMeta {
            current_page: current,
            total_pages,
            total_records: self.config.total_records,
            records_per_page: self.config.records_per_page,
            records_in_current_page: self.record_count,
            has_next_page,
            has_previous_page,
            next_page_number: has_next_page.then(|| current + 1),
            prev_page_number: has_previous_page.then(|| current - 1),
        }
    }

    /// Generates the page's records. CPU bound.
    pub fn render(self) -> Page {
        let schema = self.schema.as_ref().filter(|_| self.config.uniform_length);
        let records = assemble_page(
            &self.registry,
            &self.config,
            schema,
            self.seed,
            self.record_count,
        );
        let meta = self.meta();
        Page {
            session_id: self.session_id,
            records,
            meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Record, Session};
    use crate::ports::PortResult;
    use crate::seed::new_session_id;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Minimal store without expiry.
    #[derive(Default)]
    struct StubStore {
        sessions: Mutex<HashMap<String, Session>>,
    }

    #[async_trait]
    impl SessionStore for StubStore {
        async fn create(
            &self,
            config: GenerationConfig,
            length_schema: Option<LengthSchema>,
        ) -> PortResult<String> {
            let now = Utc::now();
            let id = new_session_id(now);
            let session = Session {
                id: id.clone(),
                config,
                length_schema,
                created_at: now,
                expires_at: now + Duration::minutes(10),
            };
            self.sessions.lock().unwrap().insert(id.clone(), session);
            Ok(id)
        }

        async fn get(&self, session_id: &str) -> PortResult<Session> {
            self.sessions
                .lock()
                .unwrap()
                .get(session_id)
                .cloned()
                .ok_or_else(|| PortError::NotFound(session_id.to_string()))
        }

        async fn remove(&self, session_id: &str) -> PortResult<bool> {
            Ok(self.sessions.lock().unwrap().remove(session_id).is_some())
        }

        async fn sweep_expired(&self) -> PortResult<usize> {
            Ok(0)
        }

        async fn count(&self) -> PortResult<usize> {
            Ok(self.sessions.lock().unwrap().len())
        }
    }

    fn controller() -> PaginationController {
        PaginationController::new(
            Arc::new(StubStore::default()),
            Arc::new(FieldRegistry::standard()),
            Limits::default(),
        )
    }

    fn new_session(total: i64, per_page: i64, uniform: bool) -> PageRequest {
        PageRequest {
            session_id: None,
            page_number: None,
            params: GenerationParams {
                field_count: Some(12),
                total_records: Some(total),
                records_per_page: Some(per_page),
                uniform_length: Some(uniform),
                ..Default::default()
            },
        }
    }

    fn continue_at(session_id: &str, page: i64) -> PageRequest {
        PageRequest {
            session_id: Some(session_id.to_string()),
            page_number: Some(page),
            params: GenerationParams::default(),
        }
    }

    #[tokio::test]
    async fn boundary_scenario_250_by_100() {
        let controller = controller();
        let first = controller.fetch_page(new_session(250, 100, false)).await.unwrap();
        assert_eq!(first.records.len(), 100);
        assert_eq!(first.meta.total_pages, 3);
        assert_eq!(first.meta.next_page_number, Some(2));
        assert_eq!(first.meta.prev_page_number, None);

        let id = first.session_id.clone();
        let second = controller.fetch_page(continue_at(&id, 2)).await.unwrap();
        assert_eq!(second.records.len(), 100);

        let third = controller.fetch_page(continue_at(&id, 3)).await.unwrap();
        assert_eq!(third.records.len(), 50);
        assert_eq!(third.meta.records_in_current_page, 50);
        assert!(!third.meta.has_next_page);
        assert_eq!(third.meta.prev_page_number, Some(2));

        let fourth = controller.fetch_page(continue_at(&id, 4)).await;
        assert!(matches!(
            fourth,
            Err(PaginationError::PageOutOfRange {
                requested: 4,
                total_pages: 3
            })
        ));
    }

    #[tokio::test]
    async fn first_page_is_reproducible_through_continuation() {
        let controller = controller();
        let first = controller.fetch_page(new_session(30, 10, true)).await.unwrap();
        let again = controller
            .fetch_page(continue_at(&first.session_id, 1))
            .await
            .unwrap();
        assert_eq!(first.records, again.records);
    }

    #[tokio::test]
    async fn new_session_rejects_later_pages() {
        let controller = controller();
        let request = PageRequest {
            page_number: Some(2),
            ..new_session(100, 10, false)
        };
        let result = controller.plan(request).await;
        assert!(matches!(result, Err(PaginationError::Validation(_))));
        assert_eq!(controller.store().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn empty_session_id_opens_a_new_session() {
        let controller = controller();
        let request = PageRequest {
            session_id: Some(String::new()),
            ..new_session(10, 10, false)
        };
        let page = controller.fetch_page(request).await.unwrap();
        assert!(page.session_id.starts_with("session_"));
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let result = controller().plan(continue_at("session_1_nope", 1)).await;
        assert!(matches!(result, Err(PaginationError::SessionNotFound)));
    }

    #[tokio::test]
    async fn page_zero_is_out_of_range() {
        let controller = controller();
        let first = controller.fetch_page(new_session(20, 10, false)).await.unwrap();
        let result = controller.plan(continue_at(&first.session_id, 0)).await;
        assert!(matches!(
            result,
            Err(PaginationError::PageOutOfRange { requested: 0, .. })
        ));
    }

    #[tokio::test]
    async fn uniform_lengths_hold_across_pages() {
        let controller = controller();
        let first = controller.fetch_page(new_session(40, 10, true)).await.unwrap();
        let session = controller.store().get(&first.session_id).await.unwrap();
        let schema = session.length_schema.unwrap();

        let mut pages: Vec<Vec<Record>> = vec![first.records];
        for page in 2..=4 {
            let next = controller
                .fetch_page(continue_at(&first.session_id, page))
                .await
                .unwrap();
            pages.push(next.records);
        }

        for record in pages.iter().flatten() {
            for (key, value) in record {
                let tag = crate::assembler::field_tag(key);
                if let Some(crate::domain::LengthTarget::Exact(len)) = schema.target(tag) {
                    assert_eq!(value.as_str().unwrap().chars().count(), len, "{key}");
                }
            }
        }
    }

    #[tokio::test]
    async fn ending_a_session_makes_it_unreachable() {
        let controller = controller();
        let first = controller.fetch_page(new_session(20, 10, false)).await.unwrap();
        assert!(controller.end_session(&first.session_id).await.unwrap());
        assert!(!controller.end_session(&first.session_id).await.unwrap());
        let result = controller.plan(continue_at(&first.session_id, 2)).await;
        assert!(matches!(result, Err(PaginationError::SessionNotFound)));
    }
}
