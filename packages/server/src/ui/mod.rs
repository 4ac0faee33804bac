//! HTTP and WebSocket surface of the chat server.

mod error;
mod handler;
mod runner;
mod signal;
pub mod state;

pub use error::ApiError;
pub use runner::{build_app, build_state, run};
pub use state::AppState;
