use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::queue::Queue;
use crate::snapshot::SnapshotEngine;

/// Process-wide directory mapping queue-id to [`Queue`].
///
/// `create`/`remove`/`clear` serialize on `structural_lock` so the three
/// cannot interleave and leave the directory in an inconsistent state (spec
/// §5); plain reads (`get`, `all`) go straight through the lock-free
/// `DashMap`. The constructor loads any existing snapshot and starts the
/// periodic save task; `shutdown` stops that task and performs one final
/// save.
pub struct QueueRegistry {
    queues: DashMap<Uuid, Arc<Queue>>,
    structural_lock: Mutex<()>,
    snapshot: Arc<SnapshotEngine>,
    shutdown_signal: Arc<Notify>,
    background_task: Mutex<Option<JoinHandle<()>>>,
}

impl QueueRegistry {
    /// Build a registry backed by `snapshot`, load any existing snapshot
    /// file, and start the periodic save task.
    pub async fn new(snapshot: SnapshotEngine) -> Arc<Self> {
        let registry = Arc::new(Self {
            queues: DashMap::new(),
            structural_lock: Mutex::new(()),
            snapshot: Arc::new(snapshot),
            shutdown_signal: Arc::new(Notify::new()),
            background_task: Mutex::new(None),
        });

        if let Err(err) = registry.snapshot.load(&registry).await {
            tracing::warn!(error = %err, "snapshot load failed at startup; starting with an empty registry");
        }

        registry.spawn_periodic_snapshot();
        registry
    }

    fn spawn_periodic_snapshot(self: &Arc<Self>) {
        let registry = Arc::clone(self);
        let shutdown_signal = Arc::clone(&self.shutdown_signal);
        let interval = registry.snapshot.interval();

        let handle = tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(err) = registry.snapshot.save(&registry).await {
                            tracing::warn!(error = %err, "periodic snapshot save failed");
                        }
                    }
                    _ = shutdown_signal.notified() => break,
                }
            }
        });

        *self.background_task.lock().unwrap() = Some(handle);
    }

    /// Allocate a fresh queue-id, construct a `Queue`, insert it, and
    /// return it. Never rejects a name for content.
    pub fn create(&self, name: String) -> Arc<Queue> {
        let _guard = self.structural_lock.lock().unwrap();
        let id = Uuid::new_v4();
        let queue = Arc::new(Queue::new(id, name));
        self.queues.insert(id, Arc::clone(&queue));
        queue
    }

    /// Install a queue that already carries its own identifier. Used only
    /// by the snapshot-load path, which must preserve original ids.
    pub(crate) fn install(&self, queue: Queue) {
        let _guard = self.structural_lock.lock().unwrap();
        self.queues.insert(queue.id, Arc::new(queue));
    }

    pub fn get(&self, id: Uuid) -> Option<Arc<Queue>> {
        self.queues.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn remove(&self, id: Uuid) -> bool {
        let _guard = self.structural_lock.lock().unwrap();
        self.queues.remove(&id).is_some()
    }

    /// Empty the directory, returning the number of queues removed.
    pub fn clear(&self) -> usize {
        let _guard = self.structural_lock.lock().unwrap();
        let count = self.queues.len();
        self.queues.clear();
        count
    }

    /// A live view suitable for enumeration by the snapshot engine.
    /// Callers must not mutate the directory through it.
    pub fn all(&self) -> &DashMap<Uuid, Arc<Queue>> {
        &self.queues
    }

    /// Stop the periodic save task and perform one final snapshot save.
    pub async fn shutdown(&self) {
        self.shutdown_signal.notify_one();

        let handle = self.background_task.lock().unwrap().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }

        if let Err(err) = self.snapshot.save(self).await {
            tracing::error!(error = %err, "final snapshot save on shutdown failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SnapshotConfig;
    use tempfile::TempDir;

    async fn test_registry() -> (Arc<QueueRegistry>, TempDir) {
        let dir = TempDir::new().unwrap();
        let config = SnapshotConfig {
            path: dir.path().join("queue_snapshot.json"),
            tmp_path: dir.path().join("queue_snapshot.tmp"),
            interval: std::time::Duration::from_secs(3600),
        };
        let registry = QueueRegistry::new(SnapshotEngine::new(config)).await;
        (registry, dir)
    }

    #[tokio::test]
    async fn create_then_get_returns_the_same_queue() {
        let (registry, _dir) = test_registry().await;
        let queue = registry.create("orders".into());
        let fetched = registry.get(queue.id).unwrap();
        assert_eq!(fetched.name, "orders");
    }

    #[tokio::test]
    async fn remove_returns_true_only_once() {
        let (registry, _dir) = test_registry().await;
        let queue = registry.create("orders".into());
        assert!(registry.remove(queue.id));
        assert!(!registry.remove(queue.id));
    }

    #[tokio::test]
    async fn clear_empties_the_directory_and_reports_the_count() {
        let (registry, _dir) = test_registry().await;
        registry.create("a".into());
        registry.create("b".into());
        assert_eq!(registry.clear(), 2);
        assert_eq!(registry.all().len(), 0);
    }

    #[tokio::test]
    async fn shutdown_stops_the_background_task_without_panicking() {
        let (registry, _dir) = test_registry().await;
        registry.create("a".into());
        registry.shutdown().await;
    }
}
