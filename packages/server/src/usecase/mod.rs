//! UseCase 層
//!
//! ドメイン層の trait と realtime 層のレジストリを組み合わせて、
//! アプリケーションの操作を提供する。

mod auth;
pub mod add_member;
pub mod admin_list_rooms;
pub mod admin_list_users;
pub mod connect_session;
pub mod create_room;
pub mod delete_message;
pub mod delete_room;
pub mod disconnect_session;
pub mod error;
pub mod ingest;
pub mod join_room;
pub mod leave_room;
pub mod list_messages;
pub mod list_rooms;
pub mod send_message;

#[cfg(test)]
mod scenario_tests;
#[cfg(test)]
pub(crate) mod test_support;

pub use add_member::AddMemberUseCase;
pub use admin_list_rooms::{AdminListRoomsUseCase, RoomOverview};
pub use admin_list_users::AdminListUsersUseCase;
pub use connect_session::ConnectSessionUseCase;
pub use create_room::CreateRoomUseCase;
pub use delete_message::DeleteMessageUseCase;
pub use delete_room::DeleteRoomUseCase;
pub use disconnect_session::DisconnectSessionUseCase;
pub use error::ChatError;
pub use ingest::{IngestSignal, IngestStage, IngestTracker};
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use list_messages::ListMessagesUseCase;
pub use list_rooms::ListRoomsUseCase;
pub use send_message::SendMessageUseCase;
