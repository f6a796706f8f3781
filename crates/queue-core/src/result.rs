use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Outcome of a completed task, as reported by the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultStatus {
    Success,
    Failure,
}

impl std::str::FromStr for ResultStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUCCESS" => Ok(ResultStatus::Success),
            "FAILURE" => Ok(ResultStatus::Failure),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ResultStatus::Success => "SUCCESS",
            ResultStatus::Failure => "FAILURE",
        };
        f.write_str(s)
    }
}

/// An ISO-8601 local date-time without an offset, e.g. `2024-01-01T12:00:00`.
///
/// A dedicated newtype keeps the wire format pinned to this second-precision
/// shape, independent of whatever default `chrono` or a future dependency
/// bump would otherwise pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalTimestamp(pub NaiveDateTime);

impl LocalTimestamp {
    pub fn now() -> Self {
        Self(Local::now().naive_local())
    }
}

impl Serialize for LocalTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.format(TIMESTAMP_FORMAT).to_string())
    }
}

impl<'de> Deserialize<'de> for LocalTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT)
            .map(LocalTimestamp)
            .map_err(serde::de::Error::custom)
    }
}

/// The outcome record for a single task, keyed by `task_id`. Immutable after
/// construction; a queue stores at most one `TaskResult` per `task_id`,
/// overwriting any prior one on a repeat submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResult {
    pub task_id: Uuid,
    pub output: Option<String>,
    pub status: ResultStatus,
    pub timestamp: LocalTimestamp,
}

impl TaskResult {
    pub fn new(task_id: Uuid, output: Option<String>, status: ResultStatus) -> Self {
        Self {
            task_id,
            output,
            status,
            timestamp: LocalTimestamp::now(),
        }
    }

    /// Reconstruct a result with a caller-supplied timestamp, used
    /// exclusively by the snapshot-load path.
    pub fn restore(
        task_id: Uuid,
        output: Option<String>,
        status: ResultStatus,
        timestamp: LocalTimestamp,
    ) -> Self {
        Self {
            task_id,
            output,
            status,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_round_trips_through_json() {
        let ts = LocalTimestamp::now();
        let json = serde_json::to_string(&ts).unwrap();
        let back: LocalTimestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts.0.format(TIMESTAMP_FORMAT).to_string(), back.0.format(TIMESTAMP_FORMAT).to_string());
    }

    #[test]
    fn timestamp_has_no_offset_suffix() {
        let ts = LocalTimestamp::now();
        let json = serde_json::to_string(&ts).unwrap();
        assert!(!json.contains('+') && !json.contains('Z'));
    }
}
