//! Flowbridge relay server library.
//!
//! Exposes the building blocks (config, state, error handling, relay,
//! routes, executor WebSocket infrastructure) so integration tests and the
//! binary entrypoint can both access them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod relay;
pub mod response;
pub mod router;
pub mod routes;
pub mod site_api;
pub mod state;
pub mod ws;
