//! WebSocket infrastructure for live project updates.
//!
//! Provides connection management, heartbeat monitoring, the cache push
//! task, and the HTTP upgrade handler used by Axum routes.

mod handler;
mod heartbeat;
pub mod manager;
pub mod push;

pub use handler::ws_handler;
pub use heartbeat::{start_heartbeat, HEARTBEAT_INTERVAL};
pub use manager::WsManager;
pub use push::{projects_message, start_cache_push};
