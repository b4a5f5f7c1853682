//! Result envelopes returned by the executor and surfaced to callers.

use serde::{Deserialize, Serialize};

use crate::protocol::{INVALID_REPLY_ERROR, PENDING_NOTE};

/// Outcome of a single operation.
///
/// Exactly one of `result` / `error` is populated, depending on `success`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    /// Wire name of the operation, e.g. `"CREATE_PAGE"`.
    pub op: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OperationResult {
    pub fn succeeded(op: impl Into<String>, result: serde_json::Value) -> Self {
        Self {
            op: op.into(),
            success: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failed(op: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            op: op.into(),
            success: false,
            result: None,
            error: Some(error.into()),
        }
    }
}

/// Aggregated response for one task.
///
/// `ok: true` with `result` means the executor ran the batch; individual
/// entries may still have failed. `ok: true` with only a `note` means the
/// relay stopped waiting before the executor answered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Vec<OperationResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TaskResponse {
    /// The executor ran every operation; `results` is in input order.
    pub fn completed(results: Vec<OperationResult>) -> Self {
        Self {
            ok: true,
            result: Some(results),
            note: None,
            error: None,
        }
    }

    /// The relay timed out. The outcome is unknown, so this claims neither
    /// success nor failure of any operation.
    pub fn pending() -> Self {
        Self {
            ok: true,
            result: None,
            note: Some(PENDING_NOTE.to_string()),
            error: None,
        }
    }

    /// The executor replied with something that is not a task response.
    pub fn invalid_reply() -> Self {
        Self::rejected(INVALID_REPLY_ERROR)
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            result: None,
            note: None,
            error: Some(error.into()),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.ok && self.result.is_none() && self.note.as_deref() == Some(PENDING_NOTE)
    }
}
