use serde::Serialize;
use viewstate::Snapshot;

use super::models::{ChatMessage, ChatRoomSummary};

/// Data shown on the chat screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChatState {
    /// Newest activity first.
    pub rooms: Vec<ChatRoomSummary>,
    pub selected_room: Option<ChatRoomSummary>,
    /// Messages of `selected_room`, oldest first.
    pub messages: Vec<ChatMessage>,
    pub draft: String,
    /// A send is in flight.
    pub sending: bool,

    /// Generation of the message subscription `messages` belongs to.
    #[serde(skip)]
    pub subscription: u64,
    /// Generation of the live room-list subscription.
    #[serde(skip)]
    pub rooms_subscription: u64,
    #[serde(skip)]
    pub(crate) awaiting_rooms: bool,
    #[serde(skip)]
    pub(crate) awaiting_messages: bool,
}

impl ChatState {
    /// Whether either live query is still waiting for its first emission.
    pub(crate) fn awaiting_first_emission(&self) -> bool {
        self.awaiting_rooms || self.awaiting_messages
    }
}

pub type ChatSessionState = Snapshot<ChatState>;
