//! Chat session: room list, message subscriptions, and sending.

mod common;

use std::sync::Arc;

use common::*;
use jobjet_client::domains::chat::{ChatEvent, ChatSession};
use jobjet_client::kernel::{MockOp, MockRemoteStore, StoreCall, StoreError};
use test_context::test_context;
use viewstate::testing::{settle, wait_for};
use viewstate::Session;

// ============================================================================
// Room list
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn rooms_are_loaded_on_construction_newest_first(ctx: &TestHarness) {
    let chat = ChatSession::new(ctx.remote());
    let mut rx = chat.state();

    assert!(chat.snapshot().loading);
    assert_eq!(
        ctx.store.calls(),
        vec![StoreCall::SubscribeRooms(ctx.me.id)]
    );

    let participants = [ctx.me.id, ctx.other.id];
    let t1 = room(&participants, at(10, 0));
    let t2 = room(&participants, at(9, 0));
    let t3 = room(&participants, at(11, 0));
    ctx.store
        .push_rooms(ctx.me.id, vec![t1.clone(), t2.clone(), t3.clone()]);

    let state = wait_for(&mut rx, |s| s.data.rooms.len() == 3).await;
    assert_eq!(state.data.rooms, vec![t3, t1, t2]);
    assert!(!state.loading);
    assert_eq!(state.error, None);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn each_room_emission_replaces_the_list(ctx: &TestHarness) {
    let chat = ChatSession::new(ctx.remote());
    let mut rx = chat.state();
    let participants = [ctx.me.id, ctx.other.id];

    ctx.store
        .push_rooms(ctx.me.id, vec![room(&participants, at(9, 0))]);
    wait_for(&mut rx, |s| s.data.rooms.len() == 1).await;

    let replacement = vec![room(&participants, at(10, 0)), room(&participants, at(11, 0))];
    ctx.store.push_rooms(ctx.me.id, replacement);
    let state = wait_for(&mut rx, |s| s.data.rooms.len() == 2).await;
    assert_eq!(state.data.rooms[0].last_message_time, at(11, 0));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn room_stream_failure_surfaces_error(ctx: &TestHarness) {
    let chat = ChatSession::new(ctx.remote());
    let mut rx = chat.state();

    ctx.store.fail_rooms(ctx.me.id, StoreError::PermissionDenied);

    let state = wait_for(&mut rx, |s| s.error.is_some()).await;
    assert_eq!(state.error.as_deref(), Some("permission denied"));
    assert!(!state.loading);
}

#[tokio::test]
async fn chat_without_a_session_reports_error_and_subscribes_nothing() {
    init_tracing();
    let store = Arc::new(MockRemoteStore::new());
    let chat = ChatSession::new(store.clone());

    let state = chat.snapshot();
    assert_eq!(state.error.as_deref(), Some("You must be signed in"));
    assert!(!state.loading);
    assert!(store.calls().is_empty());
}

// ============================================================================
// Selecting rooms
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn selecting_a_room_streams_its_messages_oldest_first(ctx: &TestHarness) {
    let chat = ChatSession::new(ctx.remote());
    let mut rx = chat.state();
    let r1 = room(&[ctx.me.id, ctx.other.id], at(10, 0));

    chat.dispatch(ChatEvent::SelectRoom(r1.clone()));

    let selected = chat.snapshot();
    assert_eq!(selected.data.selected_room, Some(r1.clone()));
    assert!(selected.data.messages.is_empty());
    assert!(selected.loading);

    let late = message(&r1, ctx.other.id, ctx.me.id, "second", at(10, 5));
    let early = message(&r1, ctx.me.id, ctx.other.id, "first", at(10, 1));
    ctx.store.push_messages(r1.id, vec![late.clone(), early.clone()]);

    let state = wait_for(&mut rx, |s| !s.data.messages.is_empty()).await;
    assert_eq!(state.data.messages, vec![early, late]);
    // The room list has not emitted yet, so the session is still loading it
    assert!(state.loading);

    ctx.store.push_rooms(ctx.me.id, vec![r1]);
    let state = wait_for(&mut rx, |s| !s.loading).await;
    assert_eq!(state.data.messages.len(), 2);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn reselecting_cancels_the_previous_subscription(ctx: &TestHarness) {
    let chat = ChatSession::new(ctx.remote());
    let mut rx = chat.state();
    let participants = [ctx.me.id, ctx.other.id];
    let r1 = room(&participants, at(10, 0));
    let r2 = room(&participants, at(11, 0));

    chat.dispatch(ChatEvent::SelectRoom(r1.clone()));
    chat.dispatch(ChatEvent::SelectRoom(r2.clone()));

    // Whatever the old subscription still delivers must not reach state
    let stale = message(&r1, ctx.other.id, ctx.me.id, "stale", at(10, 1));
    ctx.store.push_messages(r1.id, vec![stale]);

    let fresh = message(&r2, ctx.other.id, ctx.me.id, "fresh", at(11, 1));
    ctx.store.push_messages(r2.id, vec![fresh.clone()]);

    let state = wait_for(&mut rx, |s| !s.data.messages.is_empty()).await;
    assert_eq!(state.data.selected_room, Some(r2.clone()));
    assert_eq!(state.data.messages, vec![fresh.clone()]);

    eventually(|| ctx.store.active_message_feeds_for(r1.id) == 0).await;
    assert_eq!(ctx.store.active_message_feeds(), 1);
    assert_eq!(ctx.store.push_messages(r1.id, vec![]), 0);

    settle().await;
    assert_eq!(chat.snapshot().data.messages, vec![fresh]);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn at_most_one_message_subscription_is_active(ctx: &TestHarness) {
    let chat = ChatSession::new(ctx.remote());
    let rooms: Vec<_> = (0..4)
        .map(|hour| room(&[ctx.me.id, ctx.other.id], at(8 + hour, 0)))
        .collect();

    for index in [0, 2, 1, 2, 3, 0] {
        chat.dispatch(ChatEvent::SelectRoom(rooms[index].clone()));
        eventually(|| ctx.store.active_message_feeds() == 1).await;
        assert_eq!(ctx.store.active_message_feeds_for(rooms[index].id), 1);
    }

    let subscriptions = ctx
        .store
        .count_calls(|call| matches!(call, StoreCall::SubscribeMessages(_)));
    assert_eq!(subscriptions, 6);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn unselecting_cancels_the_subscription_and_clears_messages(ctx: &TestHarness) {
    let chat = ChatSession::new(ctx.remote());
    let mut rx = chat.state();
    let r1 = room(&[ctx.me.id, ctx.other.id], at(10, 0));

    chat.dispatch(ChatEvent::SelectRoom(r1.clone()));
    ctx.store.push_messages(
        r1.id,
        vec![message(&r1, ctx.other.id, ctx.me.id, "hello", at(10, 1))],
    );
    wait_for(&mut rx, |s| !s.data.messages.is_empty()).await;

    chat.dispatch(ChatEvent::UnselectRoom);

    let state = chat.snapshot();
    assert_eq!(state.data.selected_room, None);
    assert!(state.data.messages.is_empty());
    eventually(|| ctx.store.active_message_feeds() == 0).await;

    // A late emission from the cancelled stream changes nothing
    ctx.store.push_messages(
        r1.id,
        vec![message(&r1, ctx.other.id, ctx.me.id, "late", at(10, 2))],
    );
    settle().await;
    assert!(chat.snapshot().data.messages.is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn unselect_without_a_selection_is_a_noop(ctx: &TestHarness) {
    let chat = ChatSession::new(ctx.remote());
    let before = chat.snapshot();

    chat.dispatch(ChatEvent::UnselectRoom);

    assert_eq!(chat.snapshot(), before);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn message_stream_failure_keeps_displayed_messages(ctx: &TestHarness) {
    let chat = ChatSession::new(ctx.remote());
    let mut rx = chat.state();
    let r1 = room(&[ctx.me.id, ctx.other.id], at(10, 0));
    let shown = message(&r1, ctx.other.id, ctx.me.id, "already shown", at(10, 1));

    chat.dispatch(ChatEvent::SelectRoom(r1.clone()));
    ctx.store.push_messages(r1.id, vec![shown.clone()]);
    wait_for(&mut rx, |s| !s.data.messages.is_empty()).await;

    ctx.store.fail_messages(r1.id, StoreError::PermissionDenied);

    let state = wait_for(&mut rx, |s| s.error.is_some()).await;
    assert_eq!(state.error.as_deref(), Some("permission denied"));
    assert_eq!(state.data.messages, vec![shown]);
    assert!(!state.loading);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn streams_ending_before_their_first_emission_clear_loading(ctx: &TestHarness) {
    let chat = ChatSession::new(ctx.remote());
    let mut rx = chat.state();
    let r1 = room(&[ctx.me.id, ctx.other.id], at(10, 0));

    assert_eq!(ctx.store.end_rooms(ctx.me.id), 1);
    let state = wait_for(&mut rx, |s| !s.loading).await;
    assert!(state.data.rooms.is_empty());
    assert_eq!(state.error, None);

    chat.dispatch(ChatEvent::SelectRoom(r1.clone()));
    assert!(chat.snapshot().loading);
    assert_eq!(ctx.store.end_messages(r1.id), 1);

    let state = wait_for(&mut rx, |s| !s.loading).await;
    assert!(state.data.messages.is_empty());
    assert_eq!(state.error, None);
    eventually(|| chat.container().active_tasks() == 0).await;

    chat.dispatch(ChatEvent::UpdateDraft("anyone there?".to_string()));
    assert!(chat.can_send_message());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn ended_subscription_of_a_previous_room_leaves_loading_alone(ctx: &TestHarness) {
    let chat = ChatSession::new(ctx.remote());
    let mut rx = chat.state();
    let participants = [ctx.me.id, ctx.other.id];
    let (r1, r2) = (room(&participants, at(10, 0)), room(&participants, at(11, 0)));
    ctx.store.push_rooms(ctx.me.id, vec![r1.clone(), r2.clone()]);
    wait_for(&mut rx, |s| !s.loading).await;

    chat.dispatch(ChatEvent::SelectRoom(r1.clone()));
    chat.dispatch(ChatEvent::SelectRoom(r2.clone()));
    ctx.store.end_messages(r1.id);

    settle().await;
    let state = chat.snapshot();
    assert!(state.loading);
    assert_eq!(state.data.selected_room, Some(r2));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn dropping_the_session_cancels_every_subscription(ctx: &TestHarness) {
    let chat = ChatSession::new(ctx.remote());
    chat.dispatch(ChatEvent::SelectRoom(room(&[ctx.me.id, ctx.other.id], at(10, 0))));
    assert_eq!(ctx.store.active_room_feeds(), 1);
    assert_eq!(ctx.store.active_message_feeds(), 1);

    drop(chat);

    eventually(|| {
        ctx.store.active_room_feeds() == 0 && ctx.store.active_message_feeds() == 0
    })
    .await;
}

// ============================================================================
// Sending
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn send_goes_to_the_other_participant_and_clears_draft(ctx: &TestHarness) {
    let chat = ChatSession::new(ctx.remote());
    let mut rx = chat.state();
    let r1 = room(&[ctx.me.id, ctx.other.id], at(10, 0));

    chat.dispatch(ChatEvent::SelectRoom(r1.clone()));
    ctx.store.push_rooms(ctx.me.id, vec![r1.clone()]);
    ctx.store.push_messages(r1.id, vec![]);
    chat.dispatch(ChatEvent::UpdateDraft("hi".to_string()));
    wait_for(&mut rx, |s| !s.loading).await;
    assert!(chat.can_send_message());

    chat.dispatch(ChatEvent::SendMessage);
    assert!(chat.snapshot().data.sending);

    let state = wait_for(&mut rx, |s| s.data.draft.is_empty()).await;
    assert_eq!(state.error, None);
    assert!(!state.data.sending);

    let sent = ctx.store.sent_messages();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].sender_id, ctx.me.id);
    assert_eq!(sent[0].receiver_id, ctx.other.id);
    assert_eq!(sent[0].room_id, r1.id);
    assert_eq!(sent[0].content, "hi");
    assert!(!sent[0].is_read);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn blank_draft_never_reaches_the_store(ctx: &TestHarness) {
    let chat = ChatSession::new(ctx.remote());

    // No room selected
    chat.dispatch(ChatEvent::UpdateDraft("hello".to_string()));
    chat.dispatch(ChatEvent::SendMessage);

    // Room selected, blank draft
    chat.dispatch(ChatEvent::SelectRoom(room(&[ctx.me.id, ctx.other.id], at(10, 0))));
    for blank in ["", "   ", "\n\t"] {
        chat.dispatch(ChatEvent::UpdateDraft(blank.to_string()));
        chat.dispatch(ChatEvent::SendMessage);
    }
    settle().await;

    assert!(ctx.store.sent_messages().is_empty());
    assert!(!chat.can_send_message());
    assert_eq!(chat.snapshot().error, None);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn send_failure_keeps_draft_and_sets_error(ctx: &TestHarness) {
    ctx.store
        .fail(MockOp::SendMessage, StoreError::remote("network unreachable"));
    let chat = ChatSession::new(ctx.remote());
    let mut rx = chat.state();

    chat.dispatch(ChatEvent::SelectRoom(room(&[ctx.me.id, ctx.other.id], at(10, 0))));
    chat.dispatch(ChatEvent::UpdateDraft("hi".to_string()));
    chat.dispatch(ChatEvent::SendMessage);

    let state = wait_for(&mut rx, |s| s.error.is_some()).await;
    assert_eq!(state.error.as_deref(), Some("network unreachable"));
    assert_eq!(state.data.draft, "hi");
    assert!(!state.data.sending);

    // The user retries by sending again
    ctx.store.clear_failure(MockOp::SendMessage);
    chat.dispatch(ChatEvent::ClearError);
    chat.dispatch(ChatEvent::SendMessage);

    let state = wait_for(&mut rx, |s| s.data.draft.is_empty()).await;
    assert_eq!(state.error, None);
    assert_eq!(ctx.store.sent_messages().len(), 2);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn send_failure_while_rooms_load_keeps_loading(ctx: &TestHarness) {
    ctx.store
        .fail(MockOp::SendMessage, StoreError::remote("network unreachable"));
    let chat = ChatSession::new(ctx.remote());
    let mut rx = chat.state();
    let r1 = room(&[ctx.me.id, ctx.other.id], at(10, 0));

    chat.dispatch(ChatEvent::SelectRoom(r1.clone()));
    ctx.store.push_messages(r1.id, vec![]);
    chat.dispatch(ChatEvent::UpdateDraft("hi".to_string()));
    chat.dispatch(ChatEvent::SendMessage);

    let state = wait_for(&mut rx, |s| s.error.is_some()).await;
    assert_eq!(state.error.as_deref(), Some("network unreachable"));
    assert!(!state.data.sending);
    // The room list has not emitted yet
    assert!(state.loading);
    assert!(!chat.can_send_message());

    ctx.store.push_rooms(ctx.me.id, vec![r1]);
    wait_for(&mut rx, |s| !s.loading).await;
    assert!(chat.can_send_message());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn send_trims_the_draft(ctx: &TestHarness) {
    let chat = ChatSession::new(ctx.remote());
    let mut rx = chat.state();

    chat.dispatch(ChatEvent::SelectRoom(room(&[ctx.me.id, ctx.other.id], at(10, 0))));
    chat.dispatch(ChatEvent::UpdateDraft("  see you then \n".to_string()));
    chat.dispatch(ChatEvent::SendMessage);

    wait_for(&mut rx, |s| s.data.draft.is_empty()).await;
    assert_eq!(ctx.store.sent_messages()[0].content, "see you then");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn room_without_a_second_participant_is_rejected_before_io(ctx: &TestHarness) {
    let chat = ChatSession::new(ctx.remote());
    let lonely = room(&[ctx.me.id], at(10, 0));

    chat.dispatch(ChatEvent::SelectRoom(lonely));
    chat.dispatch(ChatEvent::UpdateDraft("anyone?".to_string()));
    let loading_before = chat.snapshot().loading;

    chat.dispatch(ChatEvent::SendMessage);

    let state = chat.snapshot();
    let error = state.error.expect("malformed room should surface an error");
    assert!(error.contains("exactly one other participant"));
    assert_eq!(state.loading, loading_before);
    assert_eq!(state.data.draft, "anyone?");
    settle().await;
    assert!(ctx.store.sent_messages().is_empty());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn clear_error_without_an_error_is_a_noop(ctx: &TestHarness) {
    let chat = ChatSession::new(ctx.remote());
    let before = chat.snapshot();
    assert_eq!(before.error, None);

    chat.dispatch(ChatEvent::ClearError);

    assert_eq!(chat.snapshot(), before);
}
