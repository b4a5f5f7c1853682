//! Constants and helpers shared by both ends of the executor WebSocket.

use crate::task::{Operation, Task};

/// Reserved attribute carrying an element's OID.
pub const OID_ATTRIBUTE: &str = "data-oid";

/// Separator between child-path segments, as in `"div > span"`.
pub const CHILD_PATH_SEPARATOR: char = '>';

/// Note returned when the relay gives up waiting for the executor.
pub const PENDING_NOTE: &str = "no response yet, may still be executing";

/// Error returned when the executor's reply cannot be parsed.
pub const INVALID_REPLY_ERROR: &str = "invalid response";

/// Status marker reported by `TEST_CONNECTION`.
pub const ALIVE_STATUS: &str = "alive";

/// The unsolicited frame the executor sends on its heartbeat timer.
pub fn heartbeat_task() -> Task {
    Task::new(vec![Operation::TestConnection])
}

/// Whether a task is a heartbeat rather than real work.
pub fn is_heartbeat(task: &Task) -> bool {
    matches!(task.ops.as_slice(), [Operation::TestConnection])
}

/// Split a child path into trimmed segments. An empty segment matches
/// every child.
pub fn child_path_segments(path: &str) -> Vec<&str> {
    path.split(CHILD_PATH_SEPARATOR).map(str::trim).collect()
}
