//! Shared response envelope types for the site endpoints.
//!
//! Task submissions answer with the bare task response the executor sent,
//! so only boundary endpoints use the `{ "data": ... }` envelope.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
