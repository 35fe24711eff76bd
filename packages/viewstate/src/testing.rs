//! Testing utilities for reducers and sessions.
//!
//! # Feature Flag
//!
//! This module is only available with the `testing` feature:
//!
//! ```toml
//! [dev-dependencies]
//! viewstate = { path = "../viewstate", features = ["testing"] }
//! ```
//!
//! # Philosophy
//!
//! Tests should wait for meaning, not time. [`wait_for`] resolves as soon as
//! the state satisfies a predicate instead of sleeping a fixed interval.
//!
//! # Quick Start
//!
//! ```ignore
//! use viewstate::testing::{wait_for, ReducerTest};
//!
//! // Pure reducer transitions
//! ReducerTest::new(ChatReducer, Snapshot::new(ChatState::default()))
//!     .given(ChatFact::DraftChanged("hi".into()))
//!     .assert_state(|s| s.data.draft == "hi")
//!     .then(ChatFact::ErrorCleared)
//!     .assert_state(|s| s.error.is_none());
//!
//! // Asynchronous session work
//! let mut rx = session.state();
//! session.dispatch(ChatEvent::LoadRooms);
//! let state = wait_for(&mut rx, |s| !s.data.rooms.is_empty()).await;
//! ```

use std::fmt::Debug;
use std::marker::PhantomData;
use std::time::Duration;

use tokio::sync::watch;

use crate::container::Snapshot;
use crate::reducer::Reducer;

/// How long [`wait_for`] waits before failing the test.
pub const DEFAULT_WAIT: Duration = Duration::from_secs(2);

/// Wait until the observed state satisfies `predicate`, then return a clone.
///
/// The current value is checked first, so a state that already matches
/// resolves immediately.
///
/// # Panics
///
/// Panics if the predicate is not satisfied within [`DEFAULT_WAIT`] or the
/// container is dropped.
pub async fn wait_for<S, F>(rx: &mut watch::Receiver<Snapshot<S>>, predicate: F) -> Snapshot<S>
where
    S: Clone + Debug,
    F: FnMut(&Snapshot<S>) -> bool,
{
    wait_for_within(rx, DEFAULT_WAIT, predicate).await
}

/// [`wait_for`] with an explicit timeout.
pub async fn wait_for_within<S, F>(
    rx: &mut watch::Receiver<Snapshot<S>>,
    timeout: Duration,
    predicate: F,
) -> Snapshot<S>
where
    S: Clone + Debug,
    F: FnMut(&Snapshot<S>) -> bool,
{
    let outcome = tokio::time::timeout(timeout, async {
        rx.wait_for(predicate).await.map(|state| state.clone())
    })
    .await;

    match outcome {
        Ok(Ok(state)) => state,
        Ok(Err(_)) => panic!("state container dropped while waiting"),
        Err(_) => panic!(
            "state did not reach the expected condition within {:?}; last state: {:?}",
            timeout,
            *rx.borrow()
        ),
    }
}

/// Give spawned and aborted tasks a chance to run to their next await point.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

/// Fluent builder for testing reducer transitions.
///
/// # Example
///
/// ```ignore
/// ReducerTest::new(ProfileReducer, Snapshot::new(ProfileState::default()))
///     .given(ProfileFact::Loaded(profile.clone()))
///     .assert_state(|s| s.data.profile.as_ref() == Some(&profile))
///     .then(ProfileFact::EditingToggled(true))
///     .assert_state(|s| s.data.editing);
/// ```
pub struct ReducerTest<R, E, S> {
    reducer: R,
    state: S,
    _event: PhantomData<fn(E)>,
}

impl<R, E, S> ReducerTest<R, E, S>
where
    R: Reducer<E, S>,
    S: Debug,
{
    /// Create a new test starting from `initial`.
    pub fn new(reducer: R, initial: S) -> Self {
        Self {
            reducer,
            state: initial,
            _event: PhantomData,
        }
    }

    /// Apply an event.
    pub fn given(mut self, event: E) -> Self {
        self.state = self.reducer.reduce(&self.state, &event);
        self
    }

    /// Apply another event (alias for readability in chains).
    pub fn then(self, event: E) -> Self {
        self.given(event)
    }

    /// Assert a predicate on the current state.
    ///
    /// # Panics
    ///
    /// Panics if the predicate returns false.
    pub fn assert_state<F>(self, predicate: F) -> Self
    where
        F: FnOnce(&S) -> bool,
    {
        assert!(
            predicate(&self.state),
            "state assertion failed; state: {:?}",
            self.state
        );
        self
    }

    /// Get a reference to the current state.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Consume the test and return the final state.
    pub fn into_state(self) -> S {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::StateContainer;

    struct Toggle;

    impl Reducer<bool, Snapshot<bool>> for Toggle {
        fn reduce(&self, state: &Snapshot<bool>, event: &bool) -> Snapshot<bool> {
            Snapshot {
                data: *event,
                ..state.clone()
            }
        }
    }

    #[test]
    fn test_reducer_test_chains_events() {
        let state = ReducerTest::new(Toggle, Snapshot::new(false))
            .given(true)
            .assert_state(|s| s.data)
            .then(false)
            .assert_state(|s| !s.data)
            .into_state();

        assert_eq!(state, Snapshot::new(false));
    }

    #[test]
    #[should_panic(expected = "state assertion failed")]
    fn test_reducer_test_reports_failed_assertion() {
        ReducerTest::new(Toggle, Snapshot::new(false))
            .given(true)
            .assert_state(|s| !s.data);
    }

    #[tokio::test]
    async fn test_wait_for_resolves_on_current_value() {
        let container = StateContainer::new(3_u8);
        let mut rx = container.subscribe();

        let state = wait_for(&mut rx, |s| s.data == 3).await;
        assert_eq!(state.data, 3);
    }

    #[tokio::test]
    #[should_panic(expected = "did not reach the expected condition")]
    async fn test_wait_for_times_out() {
        let container = StateContainer::new(3_u8);
        let mut rx = container.subscribe();

        wait_for_within(&mut rx, Duration::from_millis(20), |s| s.data == 4).await;
    }
}
