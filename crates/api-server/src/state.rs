use std::sync::Arc;

use queue_core::{QueueRegistry, QueueService, SnapshotConfig, SnapshotEngine};

use crate::config::Config;

/// Shared application state: just the facade. The registry (and the
/// snapshot engine it owns) are created once at startup and torn down on
/// shutdown via `QueueService::shutdown`.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<QueueService>,
}

impl AppState {
    pub async fn new(config: &Config) -> Arc<Self> {
        let snapshot_config = SnapshotConfig {
            path: config.snapshot.path.clone(),
            tmp_path: config.snapshot.tmp_path.clone(),
            interval: config.snapshot.interval(),
        };
        let registry: Arc<QueueRegistry> = QueueRegistry::new(SnapshotEngine::new(snapshot_config)).await;
        Arc::new(Self {
            service: Arc::new(QueueService::new(registry)),
        })
    }
}
