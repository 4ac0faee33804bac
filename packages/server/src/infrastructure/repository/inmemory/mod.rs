pub mod chat;
pub mod seed;

pub use chat::InMemoryChatRepository;
pub use seed::{SeedData, SeedError};
