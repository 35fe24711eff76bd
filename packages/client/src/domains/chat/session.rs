//! Chat session - room list, the open room's message stream, and sending.
//!
//! # Subscriptions
//!
//! The room list and the open room's messages are live queries, each held
//! in its own [`TaskSlot`]. Selecting a room supersedes the previous message
//! subscription before the new one starts, and every room and message fact
//! is tagged with its subscription's generation so a late emission from an
//! aborted stream is dropped by the reducer. A stream that completes before
//! emitting still clears `loading`.
//!
//! # Sending
//!
//! A send is precondition-checked against the current state (open room,
//! non-blank draft, resolvable receiver) before any IO. Once started it runs
//! to completion: success clears the draft, failure keeps it and surfaces
//! the error.

use std::sync::Arc;

use futures::StreamExt;
use tracing::{debug, trace, warn};
use viewstate::{Reducer, Session, StateContainer, TaskSlot};

use super::events::{ChatEvent, ChatFact};
use super::models::{ChatMessage, ChatRoomSummary};
use super::reducer::ChatReducer;
use super::state::ChatState;
use crate::common::{SessionError, SessionResult, UserId};
use crate::kernel::RemoteStore;

pub struct ChatSession {
    container: StateContainer<ChatState>,
    store: Arc<dyn RemoteStore>,
    rooms: TaskSlot,
    messages: TaskSlot,
}

impl ChatSession {
    /// Create the session and start loading the current user's rooms.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        let session = Self {
            container: StateContainer::named("chat", ChatState::default()),
            store,
            rooms: TaskSlot::new(),
            messages: TaskSlot::new(),
        };
        session.dispatch(ChatEvent::LoadRooms);
        session
    }

    pub fn current_user_id(&self) -> Option<UserId> {
        self.store.current_user_id()
    }

    /// The other participant of `room`, if it is a valid 1:1 room for the
    /// current user.
    pub fn counterpart_of(&self, room: &ChatRoomSummary) -> Option<UserId> {
        self.current_user_id().and_then(|me| room.counterpart(me))
    }

    /// Whether the send button should be enabled.
    pub fn can_send_message(&self) -> bool {
        let state = self.container.snapshot();
        state.data.selected_room.is_some()
            && !state.data.draft.trim().is_empty()
            && !state.data.sending
            && !state.loading
    }

    fn apply(&self, fact: ChatFact) {
        self.container.apply(&ChatReducer, &fact);
    }

    fn load_rooms(&self) {
        let Some(user_id) = self.current_user_id() else {
            let error = SessionError::NotSignedIn;
            warn!(kind = ?error.kind(), "chat opened without a signed-in user");
            self.apply(ChatFact::Rejected(error.to_string()));
            return;
        };

        let generation = self.rooms.begin();
        self.apply(ChatFact::RoomsRequested { generation });

        let mut stream = self.store.subscribe_rooms(user_id);
        let handle = self.container.run_supervised_with(
            move |state, message| {
                *state = ChatReducer.reduce(state, &ChatFact::RoomsFailed { generation, message })
            },
            move |state| async move {
                while let Some(rooms) = stream.next().await {
                    state.apply(
                        &ChatReducer,
                        &ChatFact::RoomsLoaded {
                            generation,
                            rooms: rooms?,
                        },
                    );
                }
                debug!(generation, "room stream ended");
                state.apply(&ChatReducer, &ChatFact::RoomsEnded { generation });
                Ok::<_, SessionError>(())
            },
        );
        self.rooms.attach(generation, handle);
        debug!(%user_id, generation, "room list subscribed");
    }

    fn select_room(&self, room: ChatRoomSummary) {
        // Abort the previous subscription before anything of the new one exists
        let generation = self.messages.begin();
        let room_id = room.id;
        self.apply(ChatFact::RoomSelected { room, generation });

        let mut stream = self.store.subscribe_messages(room_id);
        let handle = self.container.run_supervised_with(
            move |state, message| {
                *state = ChatReducer.reduce(state, &ChatFact::MessagesFailed { generation, message })
            },
            move |state| async move {
                while let Some(messages) = stream.next().await {
                    state.apply(
                        &ChatReducer,
                        &ChatFact::MessagesLoaded {
                            generation,
                            messages: messages?,
                        },
                    );
                }
                debug!(generation, "message stream ended");
                state.apply(&ChatReducer, &ChatFact::MessagesEnded { generation });
                Ok::<_, SessionError>(())
            },
        );
        self.messages.attach(generation, handle);
        debug!(%room_id, generation, "room selected");
    }

    fn unselect_room(&self) {
        if self.container.snapshot().data.selected_room.is_none() {
            return;
        }
        let generation = self.messages.cancel();
        self.apply(ChatFact::RoomUnselected { generation });
        debug!(generation, "room unselected");
    }

    fn send_message(&self) {
        let current = self.container.snapshot();
        let Some(room) = current.data.selected_room else {
            return;
        };
        let content = current.data.draft.trim();
        if content.is_empty() || current.data.sending {
            return;
        }

        let message = match self.compose(&room, content) {
            Ok(message) => message,
            Err(e) => {
                warn!(room_id = %room.id, kind = ?e.kind(), error = %e, "message rejected");
                self.apply(ChatFact::Rejected(e.to_string()));
                return;
            }
        };

        self.apply(ChatFact::SendStarted);
        let store = Arc::clone(&self.store);
        self.container.run_supervised_with(
            |state, error| *state = ChatReducer.reduce(state, &ChatFact::SendFailed(error)),
            move |state| async move {
                store.send_message(&message).await?;
                debug!(message_id = %message.id, room_id = %message.room_id, "message sent");
                state.apply(&ChatReducer, &ChatFact::MessageSent);
                Ok::<_, SessionError>(())
            },
        );
    }

    fn compose(&self, room: &ChatRoomSummary, content: &str) -> SessionResult<ChatMessage> {
        let sender = self.current_user_id().ok_or(SessionError::NotSignedIn)?;
        let receiver = room
            .counterpart(sender)
            .ok_or(SessionError::MalformedRoom { room_id: room.id })?;
        Ok(ChatMessage::outgoing(room.id, sender, receiver, content))
    }
}

impl Session for ChatSession {
    type Event = ChatEvent;
    type State = ChatState;

    fn dispatch(&self, event: ChatEvent) {
        trace!(?event, "chat event");
        match event {
            ChatEvent::LoadRooms => self.load_rooms(),
            ChatEvent::SelectRoom(room) => self.select_room(room),
            ChatEvent::UnselectRoom => self.unselect_room(),
            ChatEvent::UpdateDraft(text) => self.apply(ChatFact::DraftChanged(text)),
            ChatEvent::SendMessage => self.send_message(),
            ChatEvent::ClearError => self.apply(ChatFact::ErrorCleared),
        }
    }

    fn container(&self) -> &StateContainer<ChatState> {
        &self.container
    }
}
