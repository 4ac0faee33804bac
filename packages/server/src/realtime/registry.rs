//! Room membership registry.
//!
//! Authoritative in-memory mapping of room -> live sessions and
//! session -> joined rooms. Both directions are always changed together.
//!
//! Locking:
//! - each room has its own mutex (`RoomSlot`), which is also the ordering
//!   point for every broadcast into that room;
//! - each session has its own mutex over its joined-room set;
//! - the outer maps are only held long enough to clone an `Arc`.
//!
//! Lock order is room slot, then session set. No task waits on a slot while
//! holding an outer map read guard.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use serde::Serialize;
use tokio::sync::{Mutex, RwLock};

use crate::domain::{BroadcastEvent, Identity, RoomId, SessionId, Timestamp, UserId};

use super::dispatcher::{Outbound, fan_out};

/// A session's presence in one room
#[derive(Debug, Clone)]
pub struct RoomMember {
    pub session_id: SessionId,
    pub identity: Identity,
    pub outbound: Outbound,
    pub joined_at: Timestamp,
}

/// Read-only copy of a member, safe to hand out
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberSnapshot {
    pub session_id: SessionId,
    pub user_id: UserId,
    pub username: String,
    pub joined_at: Timestamp,
}

impl From<&RoomMember> for MemberSnapshot {
    fn from(member: &RoomMember) -> Self {
        Self {
            session_id: member.session_id.clone(),
            user_id: member.identity.user_id.clone(),
            username: member.identity.username.clone(),
            joined_at: member.joined_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// First join for this session and room; `MemberJoined` went to `delivered` sessions
    Joined { delivered: usize },
    /// Already a member; nothing changed and nothing was emitted
    AlreadyMember,
    /// The session is unknown or being torn down
    SessionClosed,
}

#[derive(Debug, Clone)]
pub enum LeaveOutcome {
    Left { member: RoomMember, delivered: usize },
    NotMember,
}

#[derive(Debug, Default)]
struct RoomSlot {
    /// Join order is preserved
    members: Vec<RoomMember>,
    /// Set once the slot has been removed from the map; never reused
    retired: bool,
}

impl RoomSlot {
    fn position(&self, session_id: &SessionId) -> Option<usize> {
        self.members.iter().position(|m| &m.session_id == session_id)
    }

    fn usernames(&self) -> Vec<String> {
        self.members
            .iter()
            .map(|m| m.identity.username.clone())
            .collect()
    }
}

#[derive(Debug, Default)]
struct SessionRooms {
    rooms: HashSet<RoomId>,
    /// Set by `leave_all`; joins are refused afterwards
    sealed: bool,
}

/// Registry of live room membership
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: RwLock<HashMap<RoomId, Arc<Mutex<RoomSlot>>>>,
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<SessionRooms>>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a session known to the registry. Must precede any join.
    pub async fn register_session(&self, session_id: SessionId) {
        self.sessions.write().await.entry(session_id).or_default();
    }

    /// Add the session to the room and announce it to every member.
    ///
    /// Idempotent: a second join of the same pair changes nothing and emits
    /// nothing.
    pub async fn join(
        &self,
        session_id: &SessionId,
        identity: &Identity,
        outbound: &Outbound,
        room_id: &RoomId,
    ) -> JoinOutcome {
        let Some(session_rooms) = self.session_entry(session_id).await else {
            return JoinOutcome::SessionClosed;
        };

        loop {
            let slot = self.slot_or_create(room_id).await;
            let mut room = slot.lock().await;
            if room.retired {
                continue;
            }

            let mut joined = session_rooms.lock().await;
            if joined.sealed {
                drop(joined);
                if room.members.is_empty() {
                    room.retired = true;
                    self.remove_slot(room_id, &slot).await;
                }
                return JoinOutcome::SessionClosed;
            }
            if room.position(session_id).is_some() {
                return JoinOutcome::AlreadyMember;
            }

            room.members.push(RoomMember {
                session_id: session_id.clone(),
                identity: identity.clone(),
                outbound: outbound.clone(),
                joined_at: Timestamp::now(),
            });
            joined.rooms.insert(room_id.clone());
            drop(joined);

            let event = BroadcastEvent::MemberJoined {
                room_id: room_id.clone(),
                user_id: identity.user_id.clone(),
                username: identity.username.clone(),
                members: room.usernames(),
            };
            let delivered = fan_out(&room.members, event);
            return JoinOutcome::Joined { delivered };
        }
    }

    /// Remove the session from the room and announce the departure to the
    /// remaining members. Absent membership is a no-op.
    pub async fn leave(&self, session_id: &SessionId, room_id: &RoomId) -> LeaveOutcome {
        let session_rooms = self.session_entry(session_id).await;
        self.remove_member(room_id, session_id, session_rooms.as_ref())
            .await
    }

    /// Remove the session from every room it joined and seal it.
    ///
    /// Each departure is announced under its room lock with the identity the
    /// session joined that room as. Returns the rooms it was removed from.
    pub async fn leave_all(&self, session_id: &SessionId) -> Vec<RoomId> {
        let removed = self.sessions.write().await.remove(session_id);
        let Some(session_rooms) = removed else {
            return Vec::new();
        };

        let rooms: Vec<RoomId> = {
            let mut joined = session_rooms.lock().await;
            joined.sealed = true;
            joined.rooms.iter().cloned().collect()
        };

        let mut left = Vec::with_capacity(rooms.len());
        for room_id in rooms {
            let outcome = self
                .remove_member(&room_id, session_id, Some(&session_rooms))
                .await;
            if let LeaveOutcome::Left { .. } = outcome {
                left.push(room_id);
            }
        }
        left
    }

    /// Tell every member the room is gone, then drop the room entirely.
    ///
    /// Returns the number of sessions that were evicted.
    pub async fn evict_room(&self, room_id: &RoomId) -> usize {
        let slot = self.rooms.read().await.get(room_id).cloned();
        let Some(slot) = slot else {
            return 0;
        };

        let mut room = slot.lock().await;
        if room.retired {
            return 0;
        }
        fan_out(
            &room.members,
            BroadcastEvent::RoomClosed {
                room_id: room_id.clone(),
            },
        );
        let members = std::mem::take(&mut room.members);
        for member in &members {
            if let Some(entry) = self.session_entry(&member.session_id).await {
                entry.lock().await.rooms.remove(room_id);
            }
        }
        room.retired = true;
        self.remove_slot(room_id, &slot).await;
        members.len()
    }

    /// Whether the session is registered and not yet torn down.
    pub async fn is_open(&self, session_id: &SessionId) -> bool {
        match self.session_entry(session_id).await {
            Some(entry) => !entry.lock().await.sealed,
            None => false,
        }
    }

    /// Snapshot of a room's live members in join order.
    pub async fn members_of(&self, room_id: &RoomId) -> Vec<MemberSnapshot> {
        self.with_members(room_id, |members| {
            members.iter().map(MemberSnapshot::from).collect()
        })
        .await
        .unwrap_or_default()
    }

    /// Snapshot of the rooms a session is in.
    pub async fn rooms_of(&self, session_id: &SessionId) -> HashSet<RoomId> {
        match self.session_entry(session_id).await {
            Some(entry) => entry.lock().await.rooms.clone(),
            None => HashSet::new(),
        }
    }

    /// Number of rooms with at least one live member.
    pub async fn active_room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    /// Run `f` over a room's members while holding the room lock.
    ///
    /// Returns `None` when the room has no live members.
    pub async fn with_members<R>(
        &self,
        room_id: &RoomId,
        f: impl FnOnce(&[RoomMember]) -> R,
    ) -> Option<R> {
        let slot = self.rooms.read().await.get(room_id).cloned();
        let room = slot?.lock_owned().await;
        if room.retired {
            return None;
        }
        Some(f(&room.members))
    }

    async fn session_entry(&self, session_id: &SessionId) -> Option<Arc<Mutex<SessionRooms>>> {
        self.sessions.read().await.get(session_id).cloned()
    }

    async fn slot_or_create(&self, room_id: &RoomId) -> Arc<Mutex<RoomSlot>> {
        if let Some(slot) = self.rooms.read().await.get(room_id) {
            return Arc::clone(slot);
        }
        let mut rooms = self.rooms.write().await;
        Arc::clone(rooms.entry(room_id.clone()).or_default())
    }

    async fn remove_member(
        &self,
        room_id: &RoomId,
        session_id: &SessionId,
        session_rooms: Option<&Arc<Mutex<SessionRooms>>>,
    ) -> LeaveOutcome {
        let slot = self.rooms.read().await.get(room_id).cloned();
        let Some(slot) = slot else {
            if let Some(entry) = session_rooms {
                entry.lock().await.rooms.remove(room_id);
            }
            return LeaveOutcome::NotMember;
        };

        let mut room = slot.lock().await;
        if let Some(entry) = session_rooms {
            entry.lock().await.rooms.remove(room_id);
        }
        let Some(position) = room.position(session_id) else {
            return LeaveOutcome::NotMember;
        };
        let member = room.members.remove(position);

        let delivered = if room.members.is_empty() {
            0
        } else {
            let event = BroadcastEvent::MemberLeft {
                room_id: room_id.clone(),
                user_id: member.identity.user_id.clone(),
                username: member.identity.username.clone(),
            };
            fan_out(&room.members, event)
        };

        if room.members.is_empty() {
            room.retired = true;
            self.remove_slot(room_id, &slot).await;
        }

        LeaveOutcome::Left { member, delivered }
    }

    /// Drop a retired slot from the map unless it was already replaced.
    async fn remove_slot(&self, room_id: &RoomId, slot: &Arc<Mutex<RoomSlot>>) {
        let mut rooms = self.rooms.write().await;
        if rooms.get(room_id).is_some_and(|s| Arc::ptr_eq(s, slot)) {
            rooms.remove(room_id);
        }
    }
}
