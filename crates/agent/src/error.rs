use crate::assets::AssetError;
use crate::document::DocumentError;

/// Failure of a single operation.
///
/// Recorded into that operation's result; the rest of the task still runs.
#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    #[error("no valid parent to append to")]
    NoValidParent,

    #[error("target not found: {0}")]
    TargetNotFound(String),

    #[error("no text target in {0}")]
    NoTextTarget(String),

    #[error("parent not found or cannot hold children: {0}")]
    ParentNotFound(String),

    #[error("asset fetch failed: {0}")]
    AssetFetch(#[from] AssetError),

    #[error(transparent)]
    Document(#[from] DocumentError),
}
