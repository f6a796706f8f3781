use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a [`Task`].
///
/// Transitions are advisory: the service never enforces a DAG over these
/// states. `Completed`/`Failed` are set only by external callers holding a
/// `Task` reference after out-of-band execution — the core never drives
/// them directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl std::str::FromStr for TaskStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(TaskStatus::Pending),
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "COMPLETED" => Ok(TaskStatus::Completed),
            "FAILED" => Ok(TaskStatus::Failed),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TaskStatus::Pending => "PENDING",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Completed => "COMPLETED",
            TaskStatus::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

/// A unit of work: an opaque identifier, opaque payload, an integer
/// priority (lower is more urgent), and a lifecycle status.
///
/// Equality and hashing are by `id` only; ordering is by `priority` only.
/// This is intentional (see spec §9 "Equality inconsistent with ordering")
/// so a `Task` can be located for removal by identity in a priority-ordered
/// collection without the collection mistaking equal-priority tasks for
/// duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub params: Option<String>,
    pub priority: i64,
    pub status: TaskStatus,
}

impl Task {
    /// Construct a fresh, pending task with a newly generated identifier.
    pub fn new(params: Option<String>, priority: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            params,
            priority,
            status: TaskStatus::Pending,
        }
    }

    /// Reconstruct a task with a caller-supplied identifier and status,
    /// used exclusively by the snapshot-load path.
    pub fn restore(id: Uuid, params: Option<String>, priority: i64, status: TaskStatus) -> Self {
        Self {
            id,
            params,
            priority,
            status,
        }
    }

    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Task {}

impl Hash for Task {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Task {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Task {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority.cmp(&other.priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_by_identifier_only() {
        let a = Task::new(None, 5);
        let b = Task::restore(a.id, Some("different".into()), 99, TaskStatus::Completed);
        let c = Task::new(None, 5);

        assert_eq!(a, b, "same id, different fields, must still be equal");
        assert_ne!(a, c, "different id, same priority, must not be equal");
    }

    #[test]
    fn ordering_is_by_priority_only() {
        let low = Task::new(None, 10);
        let high = Task::new(None, -5);
        assert!(high < low);
    }

    #[test]
    fn status_round_trips_through_display_and_from_str() {
        for status in [
            TaskStatus::Pending,
            TaskStatus::InProgress,
            TaskStatus::Completed,
            TaskStatus::Failed,
        ] {
            let s = status.to_string();
            assert_eq!(s.parse::<TaskStatus>().unwrap(), status);
        }
    }
}
