//! InMemory Chat Repository 実装
//!
//! ドメイン層が定義する ChatRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。単一の Mutex で全テーブルを
//! 保護するため、create-if-absent 系の操作はアトミックに行われます。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ChatRepository, Membership, Message, MessageId, RepositoryError, Room, RoomId, User, UserId,
};

use super::seed::SeedData;

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<UserId, User>,
    rooms: HashMap<RoomId, Room>,
    memberships: HashMap<(UserId, RoomId), Membership>,
    /// Insertion sequence breaks ties between equal timestamps
    messages: HashMap<MessageId, (u64, Message)>,
    next_seq: u64,
}

/// インメモリ Chat Repository 実装
#[derive(Debug, Default)]
pub struct InMemoryChatRepository {
    tables: Mutex<Tables>,
}

impl InMemoryChatRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 初期データを投入した Repository を作成
    pub fn from_seed(seed: SeedData) -> Self {
        let mut tables = Tables::default();
        for user in seed.users {
            tables.users.insert(user.id.clone(), user);
        }
        for room in seed.rooms {
            tables.rooms.insert(room.id.clone(), room);
        }
        for membership in seed.memberships {
            tables.memberships.insert(
                (membership.user_id.clone(), membership.room_id.clone()),
                membership,
            );
        }
        Self {
            tables: Mutex::new(tables),
        }
    }

    pub async fn insert_user(&self, user: User) {
        self.tables.lock().await.users.insert(user.id.clone(), user);
    }

    pub async fn count_memberships(&self, room_id: &RoomId) -> usize {
        let tables = self.tables.lock().await;
        tables
            .memberships
            .keys()
            .filter(|(_, room)| room == room_id)
            .count()
    }
}

#[async_trait]
impl ChatRepository for InMemoryChatRepository {
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.tables.lock().await.users.get(id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, RepositoryError> {
        let tables = self.tables.lock().await;
        let mut users: Vec<User> = tables.users.values().cloned().collect();
        users.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(users)
    }

    async fn find_room(&self, id: &RoomId) -> Result<Option<Room>, RepositoryError> {
        Ok(self.tables.lock().await.rooms.get(id).cloned())
    }

    async fn create_room(&self, room: Room) -> Result<Room, RepositoryError> {
        let mut tables = self.tables.lock().await;
        if tables.rooms.contains_key(&room.id) {
            return Err(RepositoryError::Storage(format!(
                "room {} already exists",
                room.id
            )));
        }
        tables.rooms.insert(room.id.clone(), room.clone());
        Ok(room)
    }

    async fn list_rooms(&self) -> Result<Vec<Room>, RepositoryError> {
        let tables = self.tables.lock().await;
        Ok(sorted_rooms(tables.rooms.values()))
    }

    async fn list_rooms_for_user(&self, user_id: &UserId) -> Result<Vec<Room>, RepositoryError> {
        let tables = self.tables.lock().await;
        let rooms = tables
            .memberships
            .keys()
            .filter(|(user, _)| user == user_id)
            .filter_map(|(_, room_id)| tables.rooms.get(room_id));
        Ok(sorted_rooms(rooms))
    }

    async fn list_room_users(&self, room_id: &RoomId) -> Result<Vec<User>, RepositoryError> {
        let tables = self.tables.lock().await;
        let mut users: Vec<User> = tables
            .memberships
            .keys()
            .filter(|(_, room)| room == room_id)
            .filter_map(|(user_id, _)| tables.users.get(user_id).cloned())
            .collect();
        users.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(users)
    }

    async fn delete_room(&self, id: &RoomId) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().await;
        if tables.rooms.remove(id).is_none() {
            return Err(RepositoryError::NotFound(id.to_string()));
        }
        tables.memberships.retain(|(_, room), _| room != id);
        tables.messages.retain(|_, (_, message)| &message.room_id != id);
        Ok(())
    }

    async fn create_membership(
        &self,
        membership: Membership,
    ) -> Result<Membership, RepositoryError> {
        let mut tables = self.tables.lock().await;
        let key = (membership.user_id.clone(), membership.room_id.clone());
        Ok(tables.memberships.entry(key).or_insert(membership).clone())
    }

    async fn save_membership(&self, membership: Membership) -> Result<Membership, RepositoryError> {
        let mut tables = self.tables.lock().await;
        let key = (membership.user_id.clone(), membership.room_id.clone());
        tables.memberships.insert(key, membership.clone());
        Ok(membership)
    }

    async fn find_membership(
        &self,
        user_id: &UserId,
        room_id: &RoomId,
    ) -> Result<Option<Membership>, RepositoryError> {
        let tables = self.tables.lock().await;
        Ok(tables
            .memberships
            .get(&(user_id.clone(), room_id.clone()))
            .cloned())
    }

    async fn create_message(&self, message: Message) -> Result<(), RepositoryError> {
        let mut tables = self.tables.lock().await;
        if tables.messages.contains_key(&message.id) {
            // 重複配信は冪等に扱う
            return Ok(());
        }
        let seq = tables.next_seq;
        tables.next_seq += 1;
        tables.messages.insert(message.id.clone(), (seq, message));
        Ok(())
    }

    async fn find_message(&self, id: &MessageId) -> Result<Option<Message>, RepositoryError> {
        let tables = self.tables.lock().await;
        Ok(tables.messages.get(id).map(|(_, message)| message.clone()))
    }

    async fn delete_message(&self, id: &MessageId) -> Result<(), RepositoryError> {
        self.tables
            .lock()
            .await
            .messages
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    async fn list_messages(&self, room_id: &RoomId) -> Result<Vec<Message>, RepositoryError> {
        let tables = self.tables.lock().await;
        let mut messages: Vec<&(u64, Message)> = tables
            .messages
            .values()
            .filter(|(_, message)| &message.room_id == room_id)
            .collect();
        messages.sort_by_key(|(seq, message)| (message.created_at, *seq));
        Ok(messages
            .into_iter()
            .map(|(_, message)| message.clone())
            .collect())
    }
}

fn sorted_rooms<'a>(rooms: impl Iterator<Item = &'a Room>) -> Vec<Room> {
    let mut rooms: Vec<Room> = rooms.cloned().collect();
    rooms.sort_by(|a, b| (a.created_at, &a.id).cmp(&(b.created_at, &b.id)));
    rooms
}
