use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::queue::QueueStatus;
use crate::registry::QueueRegistry;
use crate::result::{ResultStatus, TaskResult};
use crate::task::{Task, TaskStatus};

/// Response shape for a freshly created queue.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueSummary {
    pub id: Uuid,
    pub name: String,
    pub task_count: usize,
    pub result_count: usize,
}

/// Validates inputs, resolves queue-ids, and translates absence/argument
/// errors into the service's error taxonomy. This is the only layer that
/// knows about the taxonomy in [`CoreError`] — `Queue` and `QueueRegistry`
/// deal only in plain `Option`s and booleans.
pub struct QueueService {
    registry: Arc<QueueRegistry>,
}

impl QueueService {
    pub fn new(registry: Arc<QueueRegistry>) -> Self {
        Self { registry }
    }

    pub async fn shutdown(&self) {
        self.registry.shutdown().await;
    }

    /// Rejects an absent or whitespace-only name; trims surrounding
    /// whitespace before creating the queue.
    pub fn create_queue(&self, name: Option<String>) -> CoreResult<QueueSummary> {
        let trimmed = name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| CoreError::InvalidArgument("queue name must not be blank".into()))?;

        let queue = self.registry.create(trimmed.to_string());
        tracing::info!(queue_id = %queue.id, name = %queue.name, operation = "create_queue", "queue created");

        Ok(QueueSummary {
            id: queue.id,
            name: queue.name.clone(),
            task_count: 0,
            result_count: 0,
        })
    }

    /// Rejects an absent `queue_id` or an absent `priority`; reports
    /// queue-not-found if the queue does not exist.
    pub fn enqueue_task(
        &self,
        queue_id: Option<Uuid>,
        params: Option<String>,
        priority: Option<i64>,
    ) -> CoreResult<Task> {
        let queue_id = queue_id
            .ok_or_else(|| CoreError::InvalidArgument("queue id is required".into()))?;
        let priority =
            priority.ok_or_else(|| CoreError::InvalidArgument("priority is required".into()))?;

        let queue = self.resolve_queue(queue_id)?;

        let task = Task::new(params, priority);
        queue.enqueue(Some(task.clone()));

        tracing::info!(queue_id = %queue_id, task_id = %task.id, priority, operation = "enqueue_task", "task enqueued");
        Ok(task)
    }

    /// Dequeues the lowest-priority pending task and flips its status to
    /// `IN_PROGRESS` before returning it. Returns `Ok(None)` when the
    /// queue is empty.
    pub fn dequeue_task(&self, queue_id: Option<Uuid>) -> CoreResult<Option<Task>> {
        let queue_id = queue_id
            .ok_or_else(|| CoreError::InvalidArgument("queue id is required".into()))?;
        let queue = self.resolve_queue(queue_id)?;

        match queue.dequeue() {
            Some(mut task) => {
                task.set_status(TaskStatus::InProgress);
                tracing::info!(queue_id = %queue_id, task_id = %task.id, operation = "dequeue_task", "task dequeued");
                Ok(Some(task))
            }
            None => {
                tracing::warn!(queue_id = %queue_id, operation = "dequeue_task", "queue empty");
                Ok(None)
            }
        }
    }

    /// Rejects an absent `queue_id` (invalid-argument), an unresolvable
    /// queue (not-found), or an absent `task_id` (precondition-failed).
    pub fn submit_result(
        &self,
        queue_id: Option<Uuid>,
        task_id: Option<Uuid>,
        output: Option<String>,
        status: Option<ResultStatus>,
    ) -> CoreResult<TaskResult> {
        let queue_id = queue_id
            .ok_or_else(|| CoreError::InvalidArgument("queue id is required".into()))?;
        let queue = self.resolve_queue(queue_id)?;

        let task_id = task_id
            .ok_or_else(|| CoreError::PreconditionFailed("taskId is required".into()))?;
        let status =
            status.ok_or_else(|| CoreError::InvalidArgument("unknown result status".into()))?;

        let result = TaskResult::new(task_id, output, status);
        queue.add_result(Some(result.clone()));

        tracing::info!(queue_id = %queue_id, task_id = %task_id, operation = "submit_result", "result submitted");
        Ok(result)
    }

    /// Rejects an absent `queue_id` or `task_id`; reports queue-not-found;
    /// returns `Ok(None)` if no result exists for `task_id`.
    pub fn get_result(
        &self,
        queue_id: Option<Uuid>,
        task_id: Option<Uuid>,
    ) -> CoreResult<Option<TaskResult>> {
        let queue_id = queue_id
            .ok_or_else(|| CoreError::InvalidArgument("queue id is required".into()))?;
        let task_id =
            task_id.ok_or_else(|| CoreError::InvalidArgument("task id is required".into()))?;
        let queue = self.resolve_queue(queue_id)?;

        Ok(queue.get_result(task_id))
    }

    pub fn queue_status(&self, queue_id: Option<Uuid>) -> CoreResult<QueueStatus> {
        let queue_id = queue_id
            .ok_or_else(|| CoreError::InvalidArgument("queue id is required".into()))?;
        let queue = self.resolve_queue(queue_id)?;
        Ok(queue.status())
    }

    /// Empties the registry, returning the number of queues removed.
    pub fn clear_all(&self) -> usize {
        let count = self.registry.clear();
        tracing::info!(queues_cleared = count, operation = "clear_all", "registry cleared");
        count
    }

    fn resolve_queue(&self, queue_id: Uuid) -> CoreResult<Arc<crate::queue::Queue>> {
        self.registry.get(queue_id).ok_or_else(|| {
            tracing::warn!(queue_id = %queue_id, "queue not found");
            CoreError::NotFound(format!("queue {queue_id} not found"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{SnapshotConfig, SnapshotEngine};
    use tempfile::TempDir;

    async fn test_service() -> (QueueService, TempDir) {
        let dir = TempDir::new().unwrap();
        let config = SnapshotConfig {
            path: dir.path().join("queue_snapshot.json"),
            tmp_path: dir.path().join("queue_snapshot.tmp"),
            interval: std::time::Duration::from_secs(3600),
        };
        let registry = QueueRegistry::new(SnapshotEngine::new(config)).await;
        (QueueService::new(registry), dir)
    }

    #[tokio::test]
    async fn create_queue_rejects_blank_names() {
        let (service, _dir) = test_service().await;
        assert!(matches!(
            service.create_queue(Some("   ".into())),
            Err(CoreError::InvalidArgument(_))
        ));
        assert!(matches!(
            service.create_queue(None),
            Err(CoreError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn create_queue_trims_whitespace() {
        let (service, _dir) = test_service().await;
        let summary = service.create_queue(Some("  orders  ".into())).unwrap();
        assert_eq!(summary.name, "orders");
    }

    #[tokio::test]
    async fn full_flow_enqueue_dequeue_submit_get() {
        let (service, _dir) = test_service().await;
        let queue = service.create_queue(Some("Q1".into())).unwrap();

        let task = service
            .enqueue_task(Some(queue.id), Some("p".into()), Some(1))
            .unwrap();
        assert_eq!(task.status, TaskStatus::Pending);

        let dequeued = service.dequeue_task(Some(queue.id)).unwrap().unwrap();
        assert_eq!(dequeued.id, task.id);
        assert_eq!(dequeued.status, TaskStatus::InProgress);

        let result = service
            .submit_result(Some(queue.id), Some(task.id), Some("ok".into()), Some(ResultStatus::Success))
            .unwrap();
        assert_eq!(result.task_id, task.id);

        let fetched = service.get_result(Some(queue.id), Some(task.id)).unwrap().unwrap();
        assert_eq!(fetched.output.as_deref(), Some("ok"));
    }

    #[tokio::test]
    async fn dequeue_on_empty_queue_returns_none_not_an_error() {
        let (service, _dir) = test_service().await;
        let queue = service.create_queue(Some("E".into())).unwrap();
        assert!(service.dequeue_task(Some(queue.id)).unwrap().is_none());
    }

    #[tokio::test]
    async fn operations_against_unknown_queue_report_not_found() {
        let (service, _dir) = test_service().await;
        let bogus = Uuid::new_v4();
        assert!(matches!(
            service.dequeue_task(Some(bogus)),
            Err(CoreError::NotFound(_))
        ));
        assert!(matches!(
            service.queue_status(Some(bogus)),
            Err(CoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn submit_result_without_task_id_is_precondition_failed() {
        let (service, _dir) = test_service().await;
        let queue = service.create_queue(Some("Q".into())).unwrap();
        let err = service
            .submit_result(Some(queue.id), None, Some("x".into()), Some(ResultStatus::Success))
            .unwrap_err();
        assert!(matches!(err, CoreError::PreconditionFailed(_)));
    }

    #[tokio::test]
    async fn a_result_in_one_queue_is_invisible_from_another() {
        let (service, _dir) = test_service().await;
        let a = service.create_queue(Some("A".into())).unwrap();
        let b = service.create_queue(Some("B".into())).unwrap();

        let task = service.enqueue_task(Some(a.id), None, Some(1)).unwrap();
        service
            .submit_result(Some(a.id), Some(task.id), None, Some(ResultStatus::Success))
            .unwrap();

        assert!(service.get_result(Some(b.id), Some(task.id)).unwrap().is_none());
    }

    #[tokio::test]
    async fn clear_all_reports_the_number_of_queues_removed() {
        let (service, _dir) = test_service().await;
        service.create_queue(Some("A".into())).unwrap();
        service.create_queue(Some("B".into())).unwrap();
        assert_eq!(service.clear_all(), 2);
    }
}
