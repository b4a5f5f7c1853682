//! `flowbridge-agent` library crate.
//!
//! The executor side of the relay: a live document model, the tree
//! builder, OID addressing, the operation interpreter and the WebSocket
//! session that feeds it. The binary entrypoint lives in `main.rs`.

pub mod assets;
pub mod builder;
pub mod config;
pub mod document;
pub mod error;
pub mod interpreter;
pub mod resolver;
pub mod session;
