//! Core of a multi-tenant, in-memory priority task-queue service.
//!
//! Producers create named queues and submit tasks carrying opaque payloads
//! and integer priorities; anonymous workers poll for the next-highest-
//! priority task and later submit a result keyed by task id; consumers
//! retrieve results and poll queue status. The service tracks no worker
//! identity or session — atomicity of a single dequeue is what guarantees
//! each task is delivered to exactly one caller. State is periodically
//! snapshotted to a local file, written atomically, for crash recovery.

mod error;
mod facade;
mod queue;
mod registry;
mod result;
mod snapshot;
mod task;

pub use error::{CoreError, CoreResult};
pub use facade::{QueueService, QueueSummary};
pub use queue::{Queue, QueueStatus};
pub use registry::QueueRegistry;
pub use result::{LocalTimestamp, ResultStatus, TaskResult};
pub use snapshot::{SnapshotConfig, SnapshotEngine, SNAPSHOT_FORMAT_VERSION};
pub use task::{Task, TaskStatus};
