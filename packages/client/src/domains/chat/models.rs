use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{MessageId, RoomId, UserId};

/// A 1:1 chat room as shown in the room list.
///
/// Immutable snapshot, replaced wholesale on every room-list emission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRoomSummary {
    pub id: RoomId,
    pub participant_ids: BTreeSet<UserId>,
    pub last_message_preview: String,
    pub last_message_time: DateTime<Utc>,
}

impl ChatRoomSummary {
    pub fn new(id: RoomId, participants: impl IntoIterator<Item = UserId>) -> Self {
        Self {
            id,
            participant_ids: participants.into_iter().collect(),
            last_message_preview: String::new(),
            last_message_time: Utc::now(),
        }
    }

    pub fn is_participant(&self, user_id: UserId) -> bool {
        self.participant_ids.contains(&user_id)
    }

    /// The other participant of a 1:1 room.
    ///
    /// `None` unless `me` is a participant and exactly one other exists.
    pub fn counterpart(&self, me: UserId) -> Option<UserId> {
        if !self.is_participant(me) {
            return None;
        }
        let mut others = self.participant_ids.iter().filter(|id| **id != me);
        match (others.next(), others.next()) {
            (Some(other), None) => Some(*other),
            _ => None,
        }
    }
}

/// One message in a chat room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub room_id: RoomId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Reserved for read receipts; no session operation changes it.
    pub is_read: bool,
}

impl ChatMessage {
    /// A new unread message stamped with the current time.
    pub fn outgoing(
        room_id: RoomId,
        sender_id: UserId,
        receiver_id: UserId,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: MessageId::new(),
            room_id,
            sender_id,
            receiver_id,
            content: content.into(),
            timestamp: Utc::now(),
            is_read: false,
        }
    }
}

/// Newest conversation first.
pub fn sort_rooms(rooms: &mut [ChatRoomSummary]) {
    rooms.sort_by(|a, b| b.last_message_time.cmp(&a.last_message_time));
}

/// Oldest message first.
pub fn sort_messages(messages: &mut [ChatMessage]) {
    messages.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
}
