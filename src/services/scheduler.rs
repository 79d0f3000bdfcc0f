use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::services::refresh_service::RefreshService;

/// Runs the refresh cycle on a fixed interval, forever.
pub struct RefreshScheduler {
    service: Arc<RefreshService>,
    interval: Duration,
}

impl RefreshScheduler {
    pub fn new(service: Arc<RefreshService>, interval: Duration) -> Self {
        Self { service, interval }
    }

    /// Sleeps first: the startup refresh is run separately before serving.
    pub async fn start(self) {
        info!("Starting refresh scheduler (interval: {:?})", self.interval);

        loop {
            tokio::time::sleep(self.interval).await;

            match self.service.refresh_all().await {
                Ok(stats) => {
                    info!(
                        "Scheduled refresh completed - updated: {}, skipped: {}, failed: {}",
                        stats.updated, stats.skipped, stats.failed
                    );
                }
                Err(e) => {
                    // keep looping; the next tick retries
                    tracing::warn!("Scheduled refresh failed: {:?}", e);
                }
            }
        }
    }
}
