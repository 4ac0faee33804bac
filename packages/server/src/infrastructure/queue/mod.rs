//! Durable-write queue implementations.

pub mod inprocess;

pub use inprocess::{InProcessMessageQueue, QueueSettings};
