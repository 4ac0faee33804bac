//! Initial data for the in-memory repository.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::{Membership, Room, User};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid seed file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Users, rooms and memberships loaded at start-up
#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub memberships: Vec<Membership>,
}

impl SeedData {
    pub fn from_json(path: &str, json: &str) -> Result<Self, SeedError> {
        serde_json::from_str(json).map_err(|source| SeedError::Parse {
            path: path.to_string(),
            source,
        })
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| SeedError::Io {
                path: display.clone(),
                source,
            })?;
        Self::from_json(&display, &json)
    }
}
