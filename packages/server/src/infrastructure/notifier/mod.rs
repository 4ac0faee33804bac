//! Notification sinks.

pub mod webhook;

pub use webhook::{NoopNotifier, WebhookNotifier};
