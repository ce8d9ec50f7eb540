//! Periodic removal of expired documents.

use hastebin_core::DocumentStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Spawn a task that calls [`DocumentStore::purge_expired`] every `every`.
///
/// The sweep runs on the blocking pool since backends do synchronous I/O.
/// Failures are logged and the next tick tries again.
///
/// # Returns
/// Handle of the background task; abort it to stop sweeping.
pub fn spawn_expiry_sweeper(store: Arc<dyn DocumentStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let store = store.clone();
            match tokio::task::spawn_blocking(move || store.purge_expired()).await {
                Ok(Ok(0)) => tracing::debug!("Expiration sweep removed nothing"),
                Ok(Ok(removed)) => tracing::info!("Expired {} document(s)", removed),
                Ok(Err(err)) => tracing::warn!("Expiration sweep failed: {}", err),
                Err(err) => tracing::warn!("Expiration sweep task failed: {}", err),
            }
        }
    })
}
