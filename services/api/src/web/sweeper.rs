//! services/api/src/web/sweeper.rs
//!
//! Background task that evicts expired sessions (and expired mirrored pages)
//! on a fixed interval until shutdown is requested.

use fake_data_core::ports::{PageArchive, SessionStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Runs one sweep. Errors are logged and never stop the caller.
pub async fn sweep_once(store: &dyn SessionStore, archive: Option<&dyn PageArchive>) -> usize {
    let swept = match store.sweep_expired().await {
        Ok(swept) => swept,
        Err(e) => {
            warn!("Failed to sweep expired sessions: {:?}", e);
            0
        }
    };
    if swept > 0 {
        info!(swept, "Swept expired pagination sessions");
    }

    if let Some(archive) = archive {
        match archive.purge_expired().await {
            Ok(0) => {}
            Ok(purged) => debug!(purged, "Purged expired mirrored pages"),
            Err(e) => warn!("Failed to purge mirrored pages: {:?}", e),
        }
    }
    swept
}

/// Spawns the periodic sweeper. The task exits when `shutdown` is cancelled.
pub fn spawn_sweeper(
    store: Arc<dyn SessionStore>,
    archive: Option<Arc<dyn PageArchive>>,
    interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("Session sweeper stopping");
                    break;
                }
                _ = ticker.tick() => {
                    sweep_once(store.as_ref(), archive.as_deref()).await;
                }
            }
        }
    })
}
