use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::queue::Queue;
use crate::registry::QueueRegistry;
use crate::result::{LocalTimestamp, ResultStatus, TaskResult};
use crate::task::{Task, TaskStatus};

pub const SNAPSHOT_FORMAT_VERSION: &str = "1.0";

/// Where the snapshot engine reads and writes, and how often it saves.
#[derive(Debug, Clone)]
pub struct SnapshotConfig {
    pub path: PathBuf,
    pub tmp_path: PathBuf,
    pub interval: Duration,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("queue_snapshot.json"),
            tmp_path: PathBuf::from("queue_snapshot.tmp"),
            interval: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotFile {
    version: String,
    timestamp: i64,
    queues: Vec<QueueRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct QueueRecord {
    id: String,
    name: String,
    tasks: Vec<TaskRecord>,
    results: Vec<ResultRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TaskRecord {
    id: String,
    params: Option<String>,
    priority: i64,
    status: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct ResultRecord {
    task_id: String,
    output: Option<String>,
    status: String,
    timestamp: String,
}

/// Periodic and shutdown-driven serialization of the registry to a single
/// on-disk file, written atomically via write-temp-then-rename.
pub struct SnapshotEngine {
    config: SnapshotConfig,
    save_lock: tokio::sync::Mutex<()>,
}

impl SnapshotEngine {
    pub fn new(config: SnapshotConfig) -> Self {
        Self {
            config,
            save_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.config.interval
    }

    /// Build the snapshot file contents, write it to the temp path, delete
    /// the existing primary (best-effort), then rename temp over primary.
    /// Serialized by `save_lock` so concurrent callers (the periodic
    /// scheduler and the shutdown hook) cannot interleave writes.
    pub async fn save(&self, registry: &QueueRegistry) -> CoreResult<()> {
        let _guard = self.save_lock.lock().await;

        let mut queues = Vec::new();
        for entry in registry.all().iter() {
            let queue = entry.value();
            queues.push(QueueRecord {
                id: queue.id.to_string(),
                name: queue.name.clone(),
                tasks: queue
                    .snapshot_tasks()
                    .into_iter()
                    .map(|task| TaskRecord {
                        id: task.id.to_string(),
                        params: task.params,
                        priority: task.priority,
                        status: task.status.to_string(),
                    })
                    .collect(),
                results: queue
                    .snapshot_results()
                    .into_iter()
                    .map(|result| ResultRecord {
                        task_id: result.task_id.to_string(),
                        output: result.output,
                        status: result.status.to_string(),
                        timestamp: result.timestamp.0.format("%Y-%m-%dT%H:%M:%S").to_string(),
                    })
                    .collect(),
            });
        }

        let file = SnapshotFile {
            version: SNAPSHOT_FORMAT_VERSION.to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            queues,
        };

        let body = serde_json::to_vec_pretty(&file)
            .map_err(|e| CoreError::SerializationFailure(e.to_string()))?;

        tokio::fs::write(&self.config.tmp_path, &body)
            .await
            .map_err(|e| CoreError::IoFailure(format!("failed to write temp snapshot: {e}")))?;

        if self.config.path.exists() {
            if let Err(err) = tokio::fs::remove_file(&self.config.path).await {
                tracing::warn!(error = %err, "failed to remove existing snapshot before rename; continuing");
            }
        }

        tokio::fs::rename(&self.config.tmp_path, &self.config.path)
            .await
            .map_err(|e| CoreError::IoFailure(format!("failed to rename temp snapshot into place: {e}")))?;

        Ok(())
    }

    /// Populate `registry` from the primary snapshot file, tolerating
    /// per-record faults: a single corrupted task or result is skipped
    /// rather than discarding the whole snapshot.
    pub async fn load(&self, registry: &QueueRegistry) -> CoreResult<()> {
        let bytes = match tokio::fs::read(&self.config.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(err) => {
                return Err(CoreError::IoFailure(format!(
                    "failed to read snapshot file: {err}"
                )))
            }
        };

        if bytes.is_empty() {
            return Ok(());
        }

        let file: SnapshotFile = match serde_json::from_slice(&bytes) {
            Ok(file) => file,
            Err(err) => {
                tracing::warn!(error = %err, "snapshot file failed to parse; starting with an empty registry");
                return Ok(());
            }
        };

        for queue_record in file.queues {
            let Ok(queue_id) = Uuid::parse_str(&queue_record.id) else {
                tracing::warn!(raw_id = %queue_record.id, "skipping queue record with unparsable id");
                continue;
            };

            let queue = Queue::new(queue_id, queue_record.name);

            for task_record in queue_record.tasks {
                let parsed = Uuid::parse_str(&task_record.id)
                    .ok()
                    .zip(TaskStatus::from_str(&task_record.status).ok());
                let Some((task_id, status)) = parsed else {
                    tracing::warn!(raw_id = %task_record.id, "skipping task record that failed to parse");
                    continue;
                };
                let task = Task::restore(task_id, task_record.params, task_record.priority, status);
                queue.enqueue(Some(task));
            }

            for result_record in queue_record.results {
                let task_id = Uuid::parse_str(&result_record.task_id).ok();
                let status = ResultStatus::from_str(&result_record.status).ok();
                let timestamp = chrono::NaiveDateTime::parse_from_str(
                    &result_record.timestamp,
                    "%Y-%m-%dT%H:%M:%S",
                )
                .ok()
                .map(LocalTimestamp);

                let (Some(task_id), Some(status), Some(timestamp)) = (task_id, status, timestamp)
                else {
                    tracing::warn!(raw_task_id = %result_record.task_id, "skipping result record that failed to parse");
                    continue;
                };

                let result = TaskResult::restore(task_id, result_record.output, status, timestamp);
                queue.add_result(Some(result));
            }

            registry.install(queue);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> SnapshotConfig {
        SnapshotConfig {
            path: dir.path().join("queue_snapshot.json"),
            tmp_path: dir.path().join("queue_snapshot.tmp"),
            interval: Duration::from_secs(3600),
        }
    }

    #[tokio::test]
    #[serial]
    async fn load_with_no_primary_file_leaves_registry_empty() {
        let dir = TempDir::new().unwrap();
        let engine = SnapshotEngine::new(config_in(&dir));
        let registry = QueueRegistry::new(SnapshotEngine::new(config_in(&dir))).await;
        engine.load(&registry).await.unwrap();
        assert_eq!(registry.all().len(), 0);
    }

    #[tokio::test]
    #[serial]
    async fn save_then_load_round_trips_identifiers_names_and_results() {
        let dir = TempDir::new().unwrap();
        let registry = QueueRegistry::new(SnapshotEngine::new(config_in(&dir))).await;

        let queue = registry.create("orders".into());
        let task = Task::new(Some("payload".into()), 3);
        let task_id = task.id;
        queue.enqueue(Some(task));
        queue.add_result(Some(TaskResult::new(task_id, Some("done".into()), ResultStatus::Success)));

        let engine = SnapshotEngine::new(config_in(&dir));
        engine.save(&registry).await.unwrap();

        let reloaded = QueueRegistry::new(SnapshotEngine::new(config_in(&dir))).await;
        assert_eq!(reloaded.all().len(), 1);

        let restored_queue = reloaded.get(queue.id).unwrap();
        assert_eq!(restored_queue.name, "orders");
        assert_eq!(restored_queue.task_count(), 1);

        let restored_result = restored_queue.get_result(task_id).unwrap();
        assert_eq!(restored_result.output.as_deref(), Some("done"));
        assert_eq!(restored_result.status, ResultStatus::Success);
    }

    #[tokio::test]
    #[serial]
    async fn corrupt_snapshot_file_yields_an_empty_registry_without_erroring() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        tokio::fs::write(&config.path, b"{ not valid json")
            .await
            .unwrap();

        let registry = QueueRegistry::new(SnapshotEngine::new(config)).await;
        assert_eq!(registry.all().len(), 0);
    }

    #[tokio::test]
    #[serial]
    async fn a_single_corrupt_task_record_does_not_drop_the_rest_of_the_queue() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        let body = serde_json::json!({
            "version": "1.0",
            "timestamp": 0,
            "queues": [{
                "id": Uuid::new_v4().to_string(),
                "name": "q",
                "tasks": [
                    { "id": "not-a-uuid", "params": null, "priority": 1, "status": "PENDING" },
                    { "id": Uuid::new_v4().to_string(), "params": null, "priority": 2, "status": "PENDING" }
                ],
                "results": []
            }]
        });
        tokio::fs::write(&config.path, serde_json::to_vec(&body).unwrap())
            .await
            .unwrap();

        let registry = QueueRegistry::new(SnapshotEngine::new(config)).await;
        assert_eq!(registry.all().len(), 1);
        let queue = registry.all().iter().next().unwrap().value().clone();
        assert_eq!(queue.task_count(), 1);
    }
}
