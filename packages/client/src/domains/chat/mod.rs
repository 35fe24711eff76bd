//! Chat domain - room list, per-room message streaming, and sending.

pub mod events;
pub mod models;
pub mod reducer;
pub mod session;
pub mod state;

pub use events::{ChatEvent, ChatFact};
pub use models::*;
pub use reducer::ChatReducer;
pub use session::ChatSession;
pub use state::{ChatSessionState, ChatState};
