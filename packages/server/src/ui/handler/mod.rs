//! Handler modules for HTTP and WebSocket endpoints.

pub mod http;
pub mod websocket;

// Re-export HTTP handlers
pub use http::{
    add_member, admin_list_rooms, admin_list_users, create_room, delete_room, health_check,
    list_members, list_messages, list_rooms,
};

// Re-export WebSocket handlers
pub use websocket::websocket_handler;
