//! Message authorization policy.

use super::entity::{Identity, Membership, Message};

/// Decide whether `identity` may delete `message`.
///
/// Allowed for the author, or for a user holding `can_manage` in the
/// message's room. A membership row for another user or another room grants
/// nothing.
pub fn can_delete(identity: &Identity, message: &Message, membership: Option<&Membership>) -> bool {
    if identity.user_id == message.author_id {
        return true;
    }

    membership.is_some_and(|m| {
        m.can_manage && m.user_id == identity.user_id && m.room_id == message.room_id
    })
}
