//! Generation-fenced slot for a single superseding task.
//!
//! A session that follows one stream at a time (the messages of the selected
//! chat room, say) keeps it in a [`TaskSlot`]. Starting new work bumps the
//! generation and aborts whatever was running. Aborting is asynchronous,
//! so a stale task may still deliver one last value; tagging each value with
//! the generation it was started under lets reducers drop it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::task::AbortHandle;
use tracing::trace;

/// Holds at most one live task plus the generation it belongs to.
///
/// # Example
///
/// ```ignore
/// let generation = slot.begin();          // aborts the previous task
/// let handle = container.run_supervised(move |state| async move {
///     while let Some(batch) = stream.next().await {
///         state.apply(&Reducer, &Fact::Loaded { generation, batch: batch? });
///     }
///     Ok::<_, Error>(())
/// });
/// slot.attach(generation, handle);
/// ```
#[derive(Debug, Default)]
pub struct TaskSlot {
    generation: AtomicU64,
    current: Mutex<Option<(u64, AbortHandle)>>,
}

impl TaskSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, aborting the task of the previous one.
    ///
    /// Returns the new generation to tag the replacement task with.
    pub fn begin(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((previous, handle)) = self.lock().take() {
            trace!(previous, generation, "superseding slot task");
            handle.abort();
        }
        generation
    }

    /// Store the task started for `generation`.
    ///
    /// If the slot has already moved on to a newer generation, the task is
    /// aborted immediately instead of being stored.
    pub fn attach(&self, generation: u64, handle: AbortHandle) {
        let mut current = self.lock();
        if self.is_current(generation) {
            if let Some((_, previous)) = current.replace((generation, handle)) {
                previous.abort();
            }
        } else {
            handle.abort();
        }
    }

    /// Abort the current task and move to a fresh generation.
    ///
    /// Returns the new generation; no task is attached to it.
    pub fn cancel(&self) -> u64 {
        self.begin()
    }

    /// The most recent generation handed out.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Whether `generation` is still the most recent one.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation() == generation
    }

    /// Whether a task is attached and has not finished.
    pub fn is_active(&self) -> bool {
        self.lock()
            .as_ref()
            .is_some_and(|(_, handle)| !handle.is_finished())
    }

    fn lock(&self) -> MutexGuard<'_, Option<(u64, AbortHandle)>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for TaskSlot {
    fn drop(&mut self) {
        if let Some((_, handle)) = self.lock().take() {
            handle.abort();
        }
    }
}
