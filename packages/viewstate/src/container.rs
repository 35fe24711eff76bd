//! State container: the reactive holder of one screen's view state.
//!
//! # Guarantees
//!
//! - **Last writer wins**: every update sees the freshest state, no merging
//! - **Run to completion**: updates are applied under the channel lock, one at a time
//! - **Quiet no-ops**: an update that leaves the state unchanged notifies nobody
//! - **Owned tasks**: supervised tasks are aborted when the container is dropped

use std::fmt::{self, Display};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::{FutureExt, Stream, StreamExt};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::{AbortHandle, JoinSet};
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, error, warn};

use crate::reducer::Reducer;
use crate::supervise::{failure_message, panic_message};

/// The observable value of one screen.
///
/// `loading` and `error` are shared by every operation the screen runs.
/// A failing operation clears `loading` in the same update that sets `error`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot<S> {
    pub data: S,
    pub loading: bool,
    pub error: Option<String>,
}

impl<S> Snapshot<S> {
    /// Wrap screen data with no operation in flight and no error.
    pub fn new(data: S) -> Self {
        Self {
            data,
            loading: false,
            error: None,
        }
    }

    /// Record a failure: stop loading and surface the message.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
    }

    /// Dismiss the current error, if any.
    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

/// Cheap, cloneable write access to a container's state.
///
/// Handed to supervised tasks so they can fold results back into state
/// without keeping the container (and its task set) alive.
pub struct StateHandle<S> {
    sender: Arc<watch::Sender<Snapshot<S>>>,
    name: &'static str,
}

impl<S> Clone for StateHandle<S> {
    fn clone(&self) -> Self {
        Self {
            sender: Arc::clone(&self.sender),
            name: self.name,
        }
    }
}

impl<S> fmt::Debug for StateHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateHandle")
            .field("name", &self.name)
            .field("observers", &self.sender.receiver_count())
            .finish()
    }
}

impl<S> StateHandle<S>
where
    S: Clone + PartialEq + Send + Sync + 'static,
{
    /// Apply a transformation to the current state.
    ///
    /// Observers are notified only if the state actually changed.
    pub fn update<F>(&self, reducer: F)
    where
        F: FnOnce(&mut Snapshot<S>),
    {
        let changed = self.sender.send_if_modified(|state| {
            let before = state.clone();
            reducer(state);
            *state != before
        });
        if changed {
            debug!(container = self.name, "state updated");
        }
    }

    /// Apply a pure reducer for the given event.
    pub fn apply<E, R>(&self, reducer: &R, event: &E)
    where
        R: Reducer<E, Snapshot<S>> + ?Sized,
    {
        self.update(|state| *state = reducer.reduce(state, event));
    }

    /// Clone the current state.
    pub fn snapshot(&self) -> Snapshot<S> {
        self.sender.borrow().clone()
    }
}

/// Generic holder of `{data, loading, error}` for one screen.
///
/// The container is owned by exactly one session. It exposes read-only
/// observation ([`subscribe`](Self::subscribe), [`current`](Self::current),
/// [`loading`](Self::loading), [`errors`](Self::errors)) and a supervised
/// task launcher that funnels failures into the `error` slot.
///
/// # Task Ownership
///
/// Every task started with [`run_supervised`](Self::run_supervised) belongs
/// to the container. Dropping the container aborts them all, so tearing a
/// screen down cancels its streams.
///
/// # Example
///
/// ```ignore
/// let container = StateContainer::named("profile", ProfileState::default());
/// let mut rx = container.subscribe();
///
/// container.update(|state| state.loading = true);
/// container.run_supervised(|state| async move {
///     let profile = store.fetch_profile(user_id).await?;
///     state.update(|s| {
///         s.data.profile = Some(profile);
///         s.loading = false;
///     });
///     Ok::<_, SessionError>(())
/// });
/// ```
pub struct StateContainer<S> {
    handle: StateHandle<S>,
    tasks: Mutex<JoinSet<()>>,
}

impl<S> StateContainer<S>
where
    S: Clone + PartialEq + Send + Sync + 'static,
{
    /// Create a container holding `initial` with no loading and no error.
    pub fn new(initial: S) -> Self {
        Self::named("state", initial)
    }

    /// Create a container with a name used in log lines.
    pub fn named(name: &'static str, initial: S) -> Self {
        let (sender, _) = watch::channel(Snapshot::new(initial));
        Self {
            handle: StateHandle {
                sender: Arc::new(sender),
                name,
            },
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    /// Write access for code running outside the container.
    pub fn handle(&self) -> StateHandle<S> {
        self.handle.clone()
    }

    /// See [`StateHandle::update`].
    pub fn update<F>(&self, reducer: F)
    where
        F: FnOnce(&mut Snapshot<S>),
    {
        self.handle.update(reducer);
    }

    /// See [`StateHandle::apply`].
    pub fn apply<E, R>(&self, reducer: &R, event: &E)
    where
        R: Reducer<E, Snapshot<S>> + ?Sized,
    {
        self.handle.apply(reducer, event);
    }

    /// Clone the current state.
    pub fn snapshot(&self) -> Snapshot<S> {
        self.handle.snapshot()
    }

    /// Observe the whole snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<S>> {
        self.handle.sender.subscribe()
    }

    /// Stream of `data`, starting with the current value.
    pub fn current(&self) -> impl Stream<Item = S> + Send + 'static {
        WatchStream::new(self.subscribe()).map(|state| state.data)
    }

    /// Stream of the `loading` flag, starting with the current value.
    pub fn loading(&self) -> impl Stream<Item = bool> + Send + 'static {
        WatchStream::new(self.subscribe()).map(|state| state.loading)
    }

    /// Stream of the `error` slot, starting with the current value.
    pub fn errors(&self) -> impl Stream<Item = Option<String>> + Send + 'static {
        WatchStream::new(self.subscribe()).map(|state| state.error)
    }

    /// Run `operation` as a supervised task.
    ///
    /// If the operation returns `Err` or panics, its message (or
    /// [`UNKNOWN_ERROR`](crate::UNKNOWN_ERROR) when blank) is written to
    /// `error` and `loading` is cleared. The failure is swallowed.
    ///
    /// Returns an [`AbortHandle`] so the caller can cancel superseded work.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime.
    pub fn run_supervised<F, Fut, E>(&self, operation: F) -> AbortHandle
    where
        F: FnOnce(StateHandle<S>) -> Fut,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        self.run_supervised_with(|state, message| state.fail(message), operation)
    }

    /// Run `operation` as a supervised task with a custom failure fold.
    ///
    /// `fold` receives the freshest state and the failure message. It runs
    /// inside a single update, so it can check whether the failure still
    /// concerns the current state before recording it.
    pub fn run_supervised_with<G, F, Fut, E>(&self, fold: G, operation: F) -> AbortHandle
    where
        G: FnOnce(&mut Snapshot<S>, String) + Send + 'static,
        F: FnOnce(StateHandle<S>) -> Fut,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let handle = self.handle.clone();
        let future = operation(handle.clone());

        let task = async move {
            let message = match AssertUnwindSafe(future).catch_unwind().await {
                Ok(Ok(())) => return,
                Ok(Err(e)) => {
                    let message = failure_message(&e);
                    warn!(container = handle.name, error = %message, "supervised task failed");
                    message
                }
                Err(panic) => {
                    let message = panic_message(panic.as_ref());
                    error!(container = handle.name, panic = %message, "supervised task panicked");
                    message
                }
            };
            handle.update(move |state| fold(state, message));
        };

        let mut tasks = self.lock_tasks();
        // Reap finished tasks so the set does not grow without bound
        while tasks.try_join_next().is_some() {}
        tasks.spawn(task)
    }

    /// Number of supervised tasks still running.
    pub fn active_tasks(&self) -> usize {
        let mut tasks = self.lock_tasks();
        while tasks.try_join_next().is_some() {}
        tasks.len()
    }

    /// Abort every supervised task owned by this container.
    pub fn shutdown(&self) {
        let mut tasks = self.lock_tasks();
        if !tasks.is_empty() {
            debug!(container = self.handle.name, count = tasks.len(), "aborting supervised tasks");
        }
        tasks.abort_all();
    }

    fn lock_tasks(&self) -> MutexGuard<'_, JoinSet<()>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S> fmt::Debug for StateContainer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateContainer")
            .field("name", &self.handle.name)
            .field("observers", &self.handle.sender.receiver_count())
            .finish_non_exhaustive()
    }
}
