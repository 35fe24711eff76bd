//! Typed IDs for the JobJet entities.
//!
//! ```rust,ignore
//! let user: UserId = UserId::new();
//! let room: RoomId = RoomId::new();
//!
//! // Compile error, the marker types differ:
//! // let wrong: RoomId = user;
//! ```

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for user accounts (job seekers and employers).
pub struct User;

/// Marker type for 1:1 chat rooms.
pub struct ChatRoom;

/// Marker type for chat messages.
pub struct Message;

/// Marker type for job postings.
pub struct JobPosting;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

pub type UserId = Id<User>;

pub type RoomId = Id<ChatRoom>;

pub type MessageId = Id<Message>;

/// Typed ID for job postings.
pub type JobId = Id<JobPosting>;
