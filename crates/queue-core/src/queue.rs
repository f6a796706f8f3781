use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::sync::Mutex;

use serde::Serialize;
use uuid::Uuid;

use crate::task::Task;
use crate::result::TaskResult;

/// A named container of pending tasks and completed results.
///
/// The pending-task collection is a `Mutex`-guarded binary heap ordered so
/// that the lowest-priority value is always the next one dequeued; `Reverse`
/// turns `std::collections::BinaryHeap`'s natural max-heap into the min-heap
/// this queue needs. The results map is a separate `Mutex`-guarded
/// `HashMap`, held for the duration of every read/write so that
/// `add_result`/`get_result`/counts and snapshot reads all observe a
/// consistent, linearized view.
pub struct Queue {
    pub id: Uuid,
    pub name: String,
    pending: Mutex<BinaryHeap<Reverse<Task>>>,
    results: Mutex<HashMap<Uuid, TaskResult>>,
}

/// Point-in-time counts for a queue, used by both the facade's status
/// operation and the HTTP boundary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStatus {
    pub id: Uuid,
    pub name: String,
    pub pending_task_count: usize,
    pub completed_result_count: usize,
    pub has_pending_tasks: bool,
}

impl Queue {
    pub fn new(id: Uuid, name: String) -> Self {
        Self {
            id,
            name,
            pending: Mutex::new(BinaryHeap::new()),
            results: Mutex::new(HashMap::new()),
        }
    }

    /// Insert `task` into the pending collection. Returns `false` (no
    /// change) when `task` is absent, for a caller that may not have a
    /// task to offer.
    pub fn enqueue(&self, task: Option<Task>) -> bool {
        let Some(task) = task else {
            return false;
        };
        self.pending.lock().unwrap().push(Reverse(task));
        true
    }

    /// Atomically remove and return the task with the lowest priority, or
    /// `None` if the queue is empty. Does not alter the task's status —
    /// the facade does that after a successful dequeue.
    pub fn dequeue(&self) -> Option<Task> {
        self.pending.lock().unwrap().pop().map(|Reverse(task)| task)
    }

    /// Store `result` keyed by its `task_id`, overwriting any prior result
    /// for the same id. Returns `false` (no change) when `result` is
    /// absent.
    pub fn add_result(&self, result: Option<TaskResult>) -> bool {
        let Some(result) = result else {
            return false;
        };
        self.results.lock().unwrap().insert(result.task_id, result);
        true
    }

    pub fn get_result(&self, task_id: Uuid) -> Option<TaskResult> {
        self.results.lock().unwrap().get(&task_id).cloned()
    }

    pub fn task_count(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    pub fn result_count(&self) -> usize {
        self.results.lock().unwrap().len()
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.lock().unwrap().is_empty()
    }

    pub fn status(&self) -> QueueStatus {
        QueueStatus {
            id: self.id,
            name: self.name.clone(),
            pending_task_count: self.task_count(),
            completed_result_count: self.result_count(),
            has_pending_tasks: self.has_pending(),
        }
    }

    /// A point-in-time snapshot of pending tasks, for the snapshot engine.
    /// Does not drain the queue.
    pub fn snapshot_tasks(&self) -> Vec<Task> {
        self.pending
            .lock()
            .unwrap()
            .iter()
            .map(|Reverse(task)| task.clone())
            .collect()
    }

    /// A point-in-time snapshot of stored results, for the snapshot engine.
    pub fn snapshot_results(&self) -> Vec<TaskResult> {
        self.results.lock().unwrap().values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskStatus;
    use crate::result::ResultStatus;

    #[test]
    fn dequeue_returns_lowest_priority_first() {
        let queue = Queue::new(Uuid::new_v4(), "q".into());
        for priority in [5, 1, 3, 1, 0, -2] {
            queue.enqueue(Some(Task::new(None, priority)));
        }

        let mut seen = Vec::new();
        while let Some(task) = queue.dequeue() {
            seen.push(task.priority);
        }

        assert_eq!(seen, vec![-2, 0, 1, 1, 3, 5]);
    }

    #[test]
    fn dequeue_on_empty_queue_returns_none() {
        let queue = Queue::new(Uuid::new_v4(), "q".into());
        assert!(queue.dequeue().is_none());
    }

    #[test]
    fn enqueue_of_none_is_a_no_op() {
        let queue = Queue::new(Uuid::new_v4(), "q".into());
        assert!(!queue.enqueue(None));
        assert_eq!(queue.task_count(), 0);
    }

    #[test]
    fn conservation_holds_across_enqueue_dequeue() {
        let queue = Queue::new(Uuid::new_v4(), "q".into());
        let mut enqueued = 0;
        let mut dequeued = 0;

        for priority in [4, 2, 9, 1] {
            queue.enqueue(Some(Task::new(None, priority)));
            enqueued += 1;
        }
        queue.dequeue();
        dequeued += 1;
        queue.dequeue();
        dequeued += 1;

        assert_eq!(enqueued - dequeued, queue.task_count());
    }

    #[test]
    fn second_result_for_same_task_id_overwrites_the_first() {
        let queue = Queue::new(Uuid::new_v4(), "q".into());
        let task_id = Uuid::new_v4();

        queue.add_result(Some(TaskResult::new(task_id, Some("first".into()), ResultStatus::Success)));
        queue.add_result(Some(TaskResult::new(task_id, Some("second".into()), ResultStatus::Failure)));

        let stored = queue.get_result(task_id).unwrap();
        assert_eq!(stored.output.as_deref(), Some("second"));
        assert_eq!(stored.status, ResultStatus::Failure);
        assert_eq!(queue.result_count(), 1);
    }

    #[test]
    fn add_result_for_unknown_task_id_is_permitted() {
        let queue = Queue::new(Uuid::new_v4(), "q".into());
        let task_id = Uuid::new_v4();
        assert!(queue.add_result(Some(TaskResult::new(task_id, None, ResultStatus::Success))));
        assert!(queue.get_result(task_id).is_some());
    }

    #[test]
    fn dequeued_task_identifier_never_reappears_without_re_enqueue() {
        let queue = Queue::new(Uuid::new_v4(), "q".into());
        let task = Task::restore(Uuid::new_v4(), None, 1, TaskStatus::Pending);
        let id = task.id;
        queue.enqueue(Some(task));

        let first = queue.dequeue().unwrap();
        assert_eq!(first.id, id);
        assert!(queue.dequeue().is_none());
    }
}
