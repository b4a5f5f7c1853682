//! Shared wire model for the flowbridge relay and executor.
//!
//! Both sides of the WebSocket speak the types defined here: the relay
//! forwards a [`task::Task`] verbatim and expects a
//! [`result::TaskResponse`] back.

pub mod error;
pub mod protocol;
pub mod result;
pub mod task;
pub mod types;
