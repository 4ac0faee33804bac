//! Infrastructure layer: concrete collaborators and transport DTOs.

pub mod auth;
pub mod dto;
pub mod notifier;
pub mod queue;
pub mod repository;
