//! Profile domain - load, edit, save, and logout.

pub mod events;
pub mod models;
pub mod reducer;
pub mod session;
pub mod state;

pub use events::{ProfileEvent, ProfileFact};
pub use models::*;
pub use reducer::ProfileReducer;
pub use session::ProfileSession;
pub use state::{ProfileSessionState, ProfileState};
