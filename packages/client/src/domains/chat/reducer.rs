//! Chat reducer - folds chat facts into the chat screen state.

use viewstate::Reducer;

use super::events::ChatFact;
use super::models::{sort_messages, sort_rooms};
use super::state::ChatSessionState;

/// Pure transitions of the chat screen.
///
/// `loading` is derived from which live queries still await their first
/// emission or have yet to end. A failure stops its own query and sets
/// `error` in the same step.
pub struct ChatReducer;

impl Reducer<ChatFact, ChatSessionState> for ChatReducer {
    fn reduce(&self, state: &ChatSessionState, fact: &ChatFact) -> ChatSessionState {
        let mut next = state.clone();
        match fact {
            ChatFact::RoomsRequested { generation } => {
                next.data.rooms_subscription = *generation;
                next.data.awaiting_rooms = true;
                next.loading = true;
                next.error = None;
            }
            ChatFact::RoomsLoaded { generation, rooms } => {
                if state.data.rooms_subscription != *generation {
                    return state.clone();
                }
                let mut rooms = rooms.clone();
                sort_rooms(&mut rooms);
                // Keep the open room's preview in step with the list
                if let Some(selected) = next.data.selected_room.as_mut() {
                    if let Some(fresh) = rooms.iter().find(|room| room.id == selected.id) {
                        *selected = fresh.clone();
                    }
                }
                next.data.rooms = rooms;
                next.data.awaiting_rooms = false;
                next.loading = next.data.awaiting_first_emission();
            }
            ChatFact::RoomsFailed {
                generation,
                message,
            } => {
                if state.data.rooms_subscription != *generation {
                    return state.clone();
                }
                next.data.awaiting_rooms = false;
                fail_keeping_pending(&mut next, message);
            }
            ChatFact::RoomsEnded { generation } => {
                if state.data.rooms_subscription != *generation {
                    return state.clone();
                }
                next.data.awaiting_rooms = false;
                next.loading = next.data.awaiting_first_emission();
            }
            ChatFact::RoomSelected { room, generation } => {
                next.data.selected_room = Some(room.clone());
                next.data.messages.clear();
                next.data.subscription = *generation;
                next.data.awaiting_messages = true;
                next.loading = true;
            }
            ChatFact::RoomUnselected { generation } => {
                next.data.selected_room = None;
                next.data.messages.clear();
                next.data.subscription = *generation;
                next.data.awaiting_messages = false;
                next.loading = next.data.awaiting_first_emission();
            }
            ChatFact::MessagesLoaded {
                generation,
                messages,
            } => {
                if !is_current(state, *generation) {
                    return state.clone();
                }
                let mut messages = messages.clone();
                sort_messages(&mut messages);
                next.data.messages = messages;
                next.data.awaiting_messages = false;
                next.loading = next.data.awaiting_first_emission();
            }
            ChatFact::MessagesFailed {
                generation,
                message,
            } => {
                if !is_current(state, *generation) {
                    return state.clone();
                }
                next.data.awaiting_messages = false;
                fail_keeping_pending(&mut next, message);
            }
            ChatFact::MessagesEnded { generation } => {
                if !is_current(state, *generation) {
                    return state.clone();
                }
                next.data.awaiting_messages = false;
                next.loading = next.data.awaiting_first_emission();
            }
            ChatFact::DraftChanged(text) => {
                next.data.draft = text.clone();
            }
            ChatFact::SendStarted => {
                next.data.sending = true;
            }
            ChatFact::MessageSent => {
                next.data.sending = false;
                next.data.draft.clear();
            }
            ChatFact::SendFailed(message) => {
                next.data.sending = false;
                fail_keeping_pending(&mut next, message);
            }
            ChatFact::Rejected(message) => {
                next.error = Some(message.clone());
            }
            ChatFact::ErrorCleared => {
                next.clear_error();
            }
        }
        next
    }
}

/// Surface `message` while leaving `loading` set for a live query that is
/// still waiting on its first emission.
fn fail_keeping_pending(next: &mut ChatSessionState, message: &str) {
    next.error = Some(message.to_string());
    next.loading = next.data.awaiting_first_emission();
}

/// Whether a message fact belongs to the subscription of the open room.
fn is_current(state: &ChatSessionState, generation: u64) -> bool {
    state.data.selected_room.is_some() && state.data.subscription == generation
}
