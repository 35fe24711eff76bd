// TestDependencies - mock RemoteStore for session tests
//
// Records every call, serves canned documents, and lets tests drive live
// queries by hand: each subscribe_* call opens a feed the test pushes
// emissions into.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use super::traits::{RemoteStore, StoreError, StoreResult, StoreStream};
use crate::common::{JobId, RoomId, UserId};
use crate::domains::chat::{ChatMessage, ChatRoomSummary};
use crate::domains::jobs::{sort_jobs, Job};
use crate::domains::profile::{UserProfile, UserRole};

// =============================================================================
// Recorded calls
// =============================================================================

/// Operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOp {
    Authenticate,
    Register,
    FetchProfile,
    SaveProfile,
    PostJob,
    FetchJobs,
    FetchJob,
    SendMessage,
}

/// A call made against the mock, with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    Authenticate { email: String },
    Register { email: String, name: String, role: UserRole },
    SignOut,
    FetchProfile(UserId),
    SaveProfile(UserProfile),
    PostJob(Job),
    FetchJobs,
    FetchJob(JobId),
    SubscribeRooms(UserId),
    SubscribeMessages(RoomId),
    SendMessage(ChatMessage),
}

type Feed<T> = mpsc::UnboundedSender<StoreResult<T>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Mock Remote Store
// =============================================================================

#[derive(Default)]
pub struct MockRemoteStore {
    current_user: Mutex<Option<UserId>>,
    password: Mutex<Option<String>>,
    profiles: Mutex<HashMap<UserId, UserProfile>>,
    jobs: Mutex<Vec<Job>>,
    failures: Mutex<HashMap<MockOp, StoreError>>,
    calls: Arc<Mutex<Vec<StoreCall>>>,
    room_feeds: Mutex<HashMap<UserId, Vec<Feed<Vec<ChatRoomSummary>>>>>,
    message_feeds: Mutex<HashMap<RoomId, Vec<Feed<Vec<ChatMessage>>>>>,
}

impl MockRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `user_id` signed in.
    pub fn signed_in_as(self, user_id: UserId) -> Self {
        *lock(&self.current_user) = Some(user_id);
        self
    }

    /// Only this password is accepted by `authenticate`. Without one, any
    /// password is.
    pub fn with_password(self, password: &str) -> Self {
        *lock(&self.password) = Some(password.to_string());
        self
    }

    pub fn with_profile(self, profile: UserProfile) -> Self {
        lock(&self.profiles).insert(profile.id, profile);
        self
    }

    pub fn with_jobs(self, jobs: Vec<Job>) -> Self {
        lock(&self.jobs).extend(jobs);
        self
    }

    /// Make every call of `op` fail with `error` until cleared.
    pub fn with_failure(self, op: MockOp, error: StoreError) -> Self {
        self.fail(op, error);
        self
    }

    pub fn fail(&self, op: MockOp, error: StoreError) {
        lock(&self.failures).insert(op, error);
    }

    pub fn clear_failure(&self, op: MockOp) {
        lock(&self.failures).remove(&op);
    }

    fn check(&self, op: MockOp) -> StoreResult<()> {
        match lock(&self.failures).get(&op) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn record(&self, call: StoreCall) {
        lock(&self.calls).push(call);
    }

    // --- Call inspection ---

    pub fn calls(&self) -> Vec<StoreCall> {
        lock(&self.calls).clone()
    }

    pub fn sent_messages(&self) -> Vec<ChatMessage> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::SendMessage(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn saved_profiles(&self) -> Vec<UserProfile> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::SaveProfile(profile) => Some(profile),
                _ => None,
            })
            .collect()
    }

    pub fn posted_jobs(&self) -> Vec<Job> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::PostJob(job) => Some(job),
                _ => None,
            })
            .collect()
    }

    /// Number of recorded calls matching `predicate`.
    pub fn count_calls(&self, predicate: impl Fn(&StoreCall) -> bool) -> usize {
        lock(&self.calls).iter().filter(|call| predicate(call)).count()
    }

    // --- Live query feeds ---

    /// Emit a room list to every open room subscription of `user_id`.
    ///
    /// Returns how many subscriptions received it.
    pub fn push_rooms(&self, user_id: UserId, rooms: Vec<ChatRoomSummary>) -> usize {
        Self::push(lock(&self.room_feeds).get(&user_id), Ok(rooms))
    }

    pub fn fail_rooms(&self, user_id: UserId, error: StoreError) -> usize {
        Self::push(lock(&self.room_feeds).get(&user_id), Err(error))
    }

    /// Emit a message list to every open subscription of `room_id`.
    ///
    /// Returns how many subscriptions received it; feeds whose subscriber
    /// was cancelled do not count.
    pub fn push_messages(&self, room_id: RoomId, messages: Vec<ChatMessage>) -> usize {
        Self::push(lock(&self.message_feeds).get(&room_id), Ok(messages))
    }

    pub fn fail_messages(&self, room_id: RoomId, error: StoreError) -> usize {
        Self::push(lock(&self.message_feeds).get(&room_id), Err(error))
    }

    /// Complete every open room subscription of `user_id`.
    pub fn end_rooms(&self, user_id: UserId) -> usize {
        lock(&self.room_feeds).remove(&user_id).map_or(0, |feeds| feeds.len())
    }

    /// Complete every open subscription of `room_id`.
    pub fn end_messages(&self, room_id: RoomId) -> usize {
        lock(&self.message_feeds).remove(&room_id).map_or(0, |feeds| feeds.len())
    }

    fn push<T: Clone>(feeds: Option<&Vec<Feed<T>>>, item: StoreResult<T>) -> usize {
        feeds
            .into_iter()
            .flatten()
            .filter(|feed| feed.send(item.clone()).is_ok())
            .count()
    }

    /// Message subscriptions whose subscriber is still listening, across all rooms.
    pub fn active_message_feeds(&self) -> usize {
        lock(&self.message_feeds)
            .values()
            .flatten()
            .filter(|feed| !feed.is_closed())
            .count()
    }

    pub fn active_message_feeds_for(&self, room_id: RoomId) -> usize {
        lock(&self.message_feeds)
            .get(&room_id)
            .into_iter()
            .flatten()
            .filter(|feed| !feed.is_closed())
            .count()
    }

    pub fn active_room_feeds(&self) -> usize {
        lock(&self.room_feeds)
            .values()
            .flatten()
            .filter(|feed| !feed.is_closed())
            .count()
    }

    fn open_feed<K, T>(feeds: &Mutex<HashMap<K, Vec<Feed<T>>>>, key: K) -> StoreStream<T>
    where
        K: std::hash::Hash + Eq,
        T: Send + 'static,
    {
        let (sender, receiver) = mpsc::unbounded_channel();
        lock(feeds).entry(key).or_default().push(sender);
        UnboundedReceiverStream::new(receiver).boxed()
    }
}

#[async_trait]
impl RemoteStore for MockRemoteStore {
    async fn authenticate(&self, email: &str, password: &str) -> StoreResult<()> {
        self.record(StoreCall::Authenticate {
            email: email.to_string(),
        });
        self.check(MockOp::Authenticate)?;

        if let Some(expected) = lock(&self.password).as_deref() {
            if expected != password {
                return Err(StoreError::InvalidCredentials);
            }
        }

        let user_id = lock(&self.profiles)
            .values()
            .find(|profile| profile.email.eq_ignore_ascii_case(email))
            .map(|profile| profile.id)
            .unwrap_or_default();
        *lock(&self.current_user) = Some(user_id);
        Ok(())
    }

    async fn register(
        &self,
        email: &str,
        _password: &str,
        name: &str,
        role: UserRole,
    ) -> StoreResult<()> {
        self.record(StoreCall::Register {
            email: email.to_string(),
            name: name.to_string(),
            role,
        });
        self.check(MockOp::Register)?;

        let profile = UserProfile {
            id: UserId::new(),
            email: email.to_string(),
            name: name.to_string(),
            role,
        };
        *lock(&self.current_user) = Some(profile.id);
        lock(&self.profiles).insert(profile.id, profile);
        Ok(())
    }

    fn current_user_id(&self) -> Option<UserId> {
        *lock(&self.current_user)
    }

    async fn sign_out(&self) {
        self.record(StoreCall::SignOut);
        *lock(&self.current_user) = None;
    }

    async fn fetch_profile(&self, user_id: UserId) -> StoreResult<UserProfile> {
        self.record(StoreCall::FetchProfile(user_id));
        self.check(MockOp::FetchProfile)?;
        lock(&self.profiles)
            .get(&user_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("User", user_id))
    }

    async fn save_profile(&self, profile: &UserProfile) -> StoreResult<()> {
        self.record(StoreCall::SaveProfile(profile.clone()));
        self.check(MockOp::SaveProfile)?;
        lock(&self.profiles).insert(profile.id, profile.clone());
        Ok(())
    }

    async fn post_job(&self, job: &Job) -> StoreResult<()> {
        self.record(StoreCall::PostJob(job.clone()));
        self.check(MockOp::PostJob)?;
        lock(&self.jobs).push(job.clone());
        Ok(())
    }

    async fn fetch_jobs(&self) -> StoreResult<Vec<Job>> {
        self.record(StoreCall::FetchJobs);
        self.check(MockOp::FetchJobs)?;
        let mut jobs = lock(&self.jobs).clone();
        sort_jobs(&mut jobs);
        Ok(jobs)
    }

    async fn fetch_job(&self, job_id: JobId) -> StoreResult<Job> {
        self.record(StoreCall::FetchJob(job_id));
        self.check(MockOp::FetchJob)?;
        lock(&self.jobs)
            .iter()
            .find(|job| job.id == job_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("Job", job_id))
    }

    fn subscribe_rooms(&self, user_id: UserId) -> StoreStream<Vec<ChatRoomSummary>> {
        self.record(StoreCall::SubscribeRooms(user_id));
        Self::open_feed(&self.room_feeds, user_id)
    }

    fn subscribe_messages(&self, room_id: RoomId) -> StoreStream<Vec<ChatMessage>> {
        self.record(StoreCall::SubscribeMessages(room_id));
        Self::open_feed(&self.message_feeds, room_id)
    }

    async fn send_message(&self, message: &ChatMessage) -> StoreResult<()> {
        self.record(StoreCall::SendMessage(message.clone()));
        self.check(MockOp::SendMessage)
    }
}
