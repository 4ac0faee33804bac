//! Real-time room chat server library.
//!
//! Sessions join rooms over a WebSocket, messages are persisted through a
//! write queue before they are broadcast, and a small HTTP API manages rooms,
//! memberships and history.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod realtime;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerConfig;
pub use ui::run;
