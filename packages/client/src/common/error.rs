use serde::Serialize;
use thiserror::Error;

use super::RoomId;
use crate::kernel::StoreError;

/// Failures a session can surface in its `error` slot.
///
/// `Validation` and `MalformedRoom` are detected before any IO and written
/// straight to state. `Remote` is folded in by the supervised launcher.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Remote(#[from] StoreError),

    #[error("{0}")]
    Validation(String),

    #[error("Chat room {room_id} must have exactly one other participant")]
    MalformedRoom { room_id: RoomId },

    #[error("You must be signed in")]
    NotSignedIn,
}

/// Coarse classification of a [`SessionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A RemoteStore call or stream rejected.
    RemoteFailure,
    /// Locally detected invalid input.
    Validation,
    /// A chat room without a valid second participant.
    MalformedRoom,
}

impl SessionError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Remote(_) => ErrorKind::RemoteFailure,
            Self::Validation(_) | Self::NotSignedIn => ErrorKind::Validation,
            Self::MalformedRoom { .. } => ErrorKind::MalformedRoom,
        }
    }
}

pub type SessionResult<T> = Result<T, SessionError>;
