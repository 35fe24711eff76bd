//! Session trait - the per-screen controller.
//!
//! A session owns one [`StateContainer`] and is the only thing that mutates
//! it. The UI observes the container and talks back through a single entry
//! point, [`Session::dispatch`].

use std::fmt::Debug;

use tokio::sync::watch;

use crate::container::{Snapshot, StateContainer};

/// A per-screen controller that turns UI events into state changes.
///
/// Each session is polymorphic only over its own event enum; there is no
/// shared base type to override.
///
/// # Guarantees
///
/// - `dispatch` never blocks: IO is started as supervised work
/// - Synchronous transitions (draft edits, clearing errors) are visible as
///   soon as `dispatch` returns
/// - Dropping the session cancels every stream and call it started
pub trait Session: Send + Sync {
    /// UI events this session accepts.
    type Event: Debug + Send;

    /// Screen data held in the container.
    type State: Clone + PartialEq + Send + Sync + 'static;

    /// Handle one UI event.
    ///
    /// Must be called from within a Tokio runtime.
    fn dispatch(&self, event: Self::Event);

    /// The container this session owns.
    fn container(&self) -> &StateContainer<Self::State>;

    /// Observe the session state.
    fn state(&self) -> watch::Receiver<Snapshot<Self::State>> {
        self.container().subscribe()
    }

    /// Clone the current session state.
    fn snapshot(&self) -> Snapshot<Self::State> {
        self.container().snapshot()
    }
}
