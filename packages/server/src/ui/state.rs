//! Server state shared by every handler.

use std::sync::Arc;

use crate::{
    domain::{ChatRepository, IdentityVerifier, MessageQueue, Notifier},
    realtime::{BroadcastDispatcher, RoomRegistry, SessionManager},
    usecase::{
        AddMemberUseCase, AdminListRoomsUseCase, AdminListUsersUseCase, ConnectSessionUseCase,
        CreateRoomUseCase, DeleteMessageUseCase, DeleteRoomUseCase, DisconnectSessionUseCase,
        JoinRoomUseCase, LeaveRoomUseCase, ListMessagesUseCase, ListRoomsUseCase,
        SendMessageUseCase,
    },
};

/// Shared application state
pub struct AppState {
    pub verifier: Arc<dyn IdentityVerifier>,
    pub repository: Arc<dyn ChatRepository>,
    pub queue: Arc<dyn MessageQueue>,
    pub notifier: Arc<dyn Notifier>,
    /// Live room membership
    pub registry: Arc<RoomRegistry>,
    pub sessions: Arc<SessionManager>,
    pub dispatcher: BroadcastDispatcher,
}

impl AppState {
    pub fn new(
        verifier: Arc<dyn IdentityVerifier>,
        repository: Arc<dyn ChatRepository>,
        queue: Arc<dyn MessageQueue>,
        notifier: Arc<dyn Notifier>,
        outbound_buffer: usize,
    ) -> Self {
        let registry = Arc::new(RoomRegistry::new());
        Self {
            verifier,
            repository,
            queue,
            notifier,
            dispatcher: BroadcastDispatcher::new(registry.clone()),
            registry,
            sessions: Arc::new(SessionManager::new(outbound_buffer)),
        }
    }

    pub fn connect_session(&self) -> ConnectSessionUseCase {
        ConnectSessionUseCase::new(self.sessions.clone(), self.registry.clone())
    }

    pub fn disconnect_session(&self) -> DisconnectSessionUseCase {
        DisconnectSessionUseCase::new(self.sessions.clone(), self.registry.clone())
    }

    pub fn join_room(&self) -> JoinRoomUseCase {
        JoinRoomUseCase::new(
            self.verifier.clone(),
            self.repository.clone(),
            self.registry.clone(),
            self.notifier.clone(),
        )
    }

    pub fn leave_room(&self) -> LeaveRoomUseCase {
        LeaveRoomUseCase::new(self.registry.clone())
    }

    pub fn send_message(&self) -> SendMessageUseCase {
        SendMessageUseCase::new(
            self.verifier.clone(),
            self.repository.clone(),
            self.queue.clone(),
            self.dispatcher.clone(),
            self.notifier.clone(),
        )
    }

    pub fn delete_message(&self) -> DeleteMessageUseCase {
        DeleteMessageUseCase::new(
            self.verifier.clone(),
            self.repository.clone(),
            self.dispatcher.clone(),
            self.notifier.clone(),
        )
    }

    pub fn create_room(&self) -> CreateRoomUseCase {
        CreateRoomUseCase::new(
            self.verifier.clone(),
            self.repository.clone(),
            self.notifier.clone(),
        )
    }

    pub fn add_member(&self) -> AddMemberUseCase {
        AddMemberUseCase::new(
            self.verifier.clone(),
            self.repository.clone(),
            self.notifier.clone(),
        )
    }

    pub fn list_messages(&self) -> ListMessagesUseCase {
        ListMessagesUseCase::new(self.verifier.clone(), self.repository.clone())
    }

    pub fn list_rooms(&self) -> ListRoomsUseCase {
        ListRoomsUseCase::new(self.verifier.clone(), self.repository.clone())
    }

    pub fn delete_room(&self) -> DeleteRoomUseCase {
        DeleteRoomUseCase::new(
            self.verifier.clone(),
            self.repository.clone(),
            self.registry.clone(),
            self.notifier.clone(),
        )
    }

    pub fn admin_list_users(&self) -> AdminListUsersUseCase {
        AdminListUsersUseCase::new(self.verifier.clone(), self.repository.clone())
    }

    pub fn admin_list_rooms(&self) -> AdminListRoomsUseCase {
        AdminListRoomsUseCase::new(self.verifier.clone(), self.repository.clone())
    }
}
