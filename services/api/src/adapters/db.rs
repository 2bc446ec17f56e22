//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `PageArchive` port from the `core` crate. It mirrors generated pages into
//! PostgreSQL using `sqlx`. Nothing in page generation depends on it succeeding.

use async_trait::async_trait;
use fake_data_core::ports::{ArchivedPage, PageArchive, PortError, PortResult};
use sqlx::types::Json;
use sqlx::PgPool;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `PageArchive` port.
#[derive(Clone)]
pub struct PgPageArchive {
    pool: PgPool,
}

impl PgPageArchive {
    /// Creates a new `PgPageArchive`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

//=========================================================================================
// `PageArchive` Trait Implementation
//=========================================================================================

#[async_trait]
impl PageArchive for PgPageArchive {
    async fn archive_page(&self, page: ArchivedPage) -> PortResult<()> {
        let page_number = i64::try_from(page.page_number)
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        sqlx::query(
            "INSERT INTO generated_pages (session_id, page_number, records, expires_at) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (session_id, page_number) \
             DO UPDATE SET records = EXCLUDED.records, expires_at = EXCLUDED.expires_at",
        )
        .bind(&page.session_id)
        .bind(page_number)
        .bind(Json(&page.records))
        .bind(page.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn purge_expired(&self) -> PortResult<u64> {
        let result = sqlx::query("DELETE FROM generated_pages WHERE expires_at < NOW()")
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(result.rows_affected())
    }
}
