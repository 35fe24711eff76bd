// Trait definitions for dependency injection
//
// RemoteStore is the only path from a session to the backend. Sessions receive
// it at construction; tests substitute MockRemoteStore.

use async_trait::async_trait;
use futures::stream::BoxStream;
use thiserror::Error;

use crate::common::{JobId, RoomId, UserId};
use crate::domains::chat::{ChatMessage, ChatRoomSummary};
use crate::domains::jobs::Job;
use crate::domains::profile::{UserProfile, UserRole};

// =============================================================================
// Errors
// =============================================================================

/// A rejected RemoteStore call or stream. Every variant displays as a
/// human-readable message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("an account already exists for {email}")]
    EmailInUse { email: String },

    #[error("not signed in")]
    NotAuthenticated,

    #[error("permission denied")]
    PermissionDenied,

    #[error("{0}")]
    Remote(String),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote(message.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A live query: every item is the full current result set.
pub type StoreStream<T> = BoxStream<'static, StoreResult<T>>;

// =============================================================================
// RemoteStore Trait (Infrastructure - auth + document store)
// =============================================================================

#[async_trait]
pub trait RemoteStore: Send + Sync {
    // --- Authentication ---

    /// Sign in with email and password.
    async fn authenticate(&self, email: &str, password: &str) -> StoreResult<()>;

    /// Create an account and its profile, then sign in as it.
    async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: UserRole,
    ) -> StoreResult<()>;

    /// The signed-in user, if any.
    fn current_user_id(&self) -> Option<UserId>;

    async fn sign_out(&self);

    // --- Profiles ---

    async fn fetch_profile(&self, user_id: UserId) -> StoreResult<UserProfile>;

    /// Overwrite a profile (last write wins).
    async fn save_profile(&self, profile: &UserProfile) -> StoreResult<()>;

    // --- Jobs ---

    async fn post_job(&self, job: &Job) -> StoreResult<()>;

    /// All jobs, newest posting first. Single snapshot, not live.
    async fn fetch_jobs(&self) -> StoreResult<Vec<Job>>;

    async fn fetch_job(&self, job_id: JobId) -> StoreResult<Job>;

    // --- Chat ---

    /// Rooms where `user_id` participates, newest activity first.
    fn subscribe_rooms(&self, user_id: UserId) -> StoreStream<Vec<ChatRoomSummary>>;

    /// Messages of one room, oldest first.
    fn subscribe_messages(&self, room_id: RoomId) -> StoreStream<Vec<ChatMessage>>;

    async fn send_message(&self, message: &ChatMessage) -> StoreResult<()>;
}
