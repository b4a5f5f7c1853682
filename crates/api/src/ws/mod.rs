//! Executor WebSocket infrastructure.
//!
//! Provides the single-peer connection registry, the per-connection reply
//! correlation state, keep-alive pings and the HTTP upgrade handler.

mod handler;
mod heartbeat;
mod monitor;
pub mod peer;
pub mod registry;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use monitor::start_monitor;
pub use peer::{Delivery, PeerConnection};
pub use registry::ConnectionRegistry;
