//! services/api/src/web/state.rs
//!
//! Defines the application state shared by every request handler.

use crate::config::Config;
use fake_data_core::ports::PageArchive;
use fake_data_core::PaginationController;
use std::sync::Arc;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pagination: PaginationController,
    /// Optional mirror for generated pages; `None` when no database is configured.
    pub archive: Option<Arc<dyn PageArchive>>,
}
