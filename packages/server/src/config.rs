//! Server configuration from command-line flags and environment.

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::infrastructure::queue::QueueSettings;

#[derive(Debug, Clone, Parser)]
#[command(name = "roomcast-server", version, about = "Real-time room chat server")]
pub struct ServerConfig {
    #[arg(long, env = "ROOMCAST_HOST", default_value = "127.0.0.1")]
    pub host: String,

    #[arg(long, env = "ROOMCAST_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Shared secret for HS256 access tokens
    #[arg(long, env = "ROOMCAST_JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Endpoint that receives event notifications as JSON
    #[arg(long, env = "ROOMCAST_WEBHOOK_URL")]
    pub webhook_url: Option<String>,

    /// JSON file with users, rooms and memberships to preload
    #[arg(long, env = "ROOMCAST_SEED")]
    pub seed: Option<PathBuf>,

    /// Per-session outbound event buffer
    #[arg(long, env = "ROOMCAST_OUTBOUND_BUFFER", default_value_t = 256)]
    pub outbound_buffer: usize,

    #[arg(long, env = "ROOMCAST_QUEUE_CAPACITY", default_value_t = 1024)]
    pub queue_capacity: usize,

    #[arg(long, env = "ROOMCAST_QUEUE_MAX_ATTEMPTS", default_value_t = 3)]
    pub queue_max_attempts: u32,

    #[arg(long, env = "ROOMCAST_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn queue_settings(&self) -> QueueSettings {
        QueueSettings {
            capacity: self.queue_capacity,
            max_attempts: self.queue_max_attempts.max(1),
            retry_delay: Duration::from_millis(100),
        }
    }
}
