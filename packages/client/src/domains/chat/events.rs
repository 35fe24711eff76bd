use super::models::{ChatMessage, ChatRoomSummary};

/// UI events accepted by the chat screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// Subscribe to the current user's room list. Fired on construction.
    LoadRooms,
    SelectRoom(ChatRoomSummary),
    UnselectRoom,
    UpdateDraft(String),
    SendMessage,
    ClearError,
}

/// Facts folded into chat state by [`ChatReducer`](super::ChatReducer).
///
/// Room and message facts carry the generation of the subscription that
/// produced them; the reducer drops those from superseded subscriptions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatFact {
    RoomsRequested {
        generation: u64,
    },
    RoomsLoaded {
        generation: u64,
        rooms: Vec<ChatRoomSummary>,
    },
    RoomsFailed {
        generation: u64,
        message: String,
    },
    /// The room stream completed.
    RoomsEnded {
        generation: u64,
    },
    RoomSelected {
        room: ChatRoomSummary,
        generation: u64,
    },
    RoomUnselected {
        generation: u64,
    },
    MessagesLoaded {
        generation: u64,
        messages: Vec<ChatMessage>,
    },
    MessagesFailed {
        generation: u64,
        message: String,
    },
    /// The message stream completed.
    MessagesEnded {
        generation: u64,
    },
    DraftChanged(String),
    SendStarted,
    MessageSent,
    SendFailed(String),
    /// A send rejected before any IO.
    Rejected(String),
    ErrorCleared,
}
