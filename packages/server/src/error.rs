//! Start-up errors of the server binary.

use thiserror::Error;

use crate::infrastructure::repository::SeedError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to load seed data: {0}")]
    Seed(#[from] SeedError),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}
