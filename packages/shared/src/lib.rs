//! Shared utilities for Roomcast.

pub mod logger;
pub mod time;
