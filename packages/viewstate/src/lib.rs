//! # Viewstate
//!
//! Reactive state containers for screen sessions: reducers decide,
//! supervised tasks execute, and failures fold back into state.
//!
//! ## Core Concepts
//!
//! Viewstate separates **what the screen shows** from **how it got there**:
//! - [`Snapshot`] = the observable value of one screen (`data`, `loading`, `error`)
//! - [`Reducer`] = pure transition from one snapshot to the next
//! - [`StateContainer::run_supervised`] = asynchronous work whose failures
//!   land in the `error` slot instead of crashing anything
//!
//! ## Architecture
//!
//! ```text
//! UI event
//!     │
//!     ▼ dispatch()
//! Session ─────────────► Reducer.reduce() ─► StateContainer ─► watch::Receiver (UI)
//!     │                                            ▲
//!     ▼ run_supervised()                           │
//! Supervised task ── stream / one-shot call ───────┤ apply(fact)
//!     │                                            │
//!     └─ Err / panic ─► fold(message) ─────────────┘
//! ```
//!
//! ## Key Invariants
//!
//! 1. **One container per session** - never shared across sessions
//! 2. **Reducers are pure** - no IO, they see the freshest state when applied
//! 3. **Updates run to completion** - two reducers never interleave
//! 4. **Failures are folded, not thrown** - a supervised task never propagates
//! 5. **Tasks die with their container** - dropping the container aborts them
//! 6. **Superseded streams are fenced** - [`TaskSlot`] generations mark stale work
//!
//! ## Example
//!
//! ```ignore
//! use viewstate::{Reducer, Snapshot, StateContainer};
//!
//! #[derive(Debug, Clone, Default, PartialEq)]
//! struct Counter { value: u32 }
//!
//! enum CounterFact { Loaded(u32) }
//!
//! struct CounterReducer;
//!
//! impl Reducer<CounterFact, Snapshot<Counter>> for CounterReducer {
//!     fn reduce(&self, state: &Snapshot<Counter>, fact: &CounterFact) -> Snapshot<Counter> {
//!         match fact {
//!             CounterFact::Loaded(value) => Snapshot {
//!                 data: Counter { value: *value },
//!                 loading: false,
//!                 ..state.clone()
//!             },
//!         }
//!     }
//! }
//!
//! let container = StateContainer::named("counter", Counter::default());
//! container.update(|state| state.loading = true);
//! container.run_supervised(|state| async move {
//!     let value = fetch_value().await?;
//!     state.apply(&CounterReducer, &CounterFact::Loaded(value));
//!     Ok::<_, MyError>(())
//! });
//! ```
//!
//! ## What This Is Not
//!
//! Viewstate is **not**:
//! - A UI framework
//! - A persistence layer
//! - A retry engine (failed work is re-triggered by the user)

mod container;
mod reducer;
mod session;
mod slot;
mod supervise;

// Testing utilities (feature-gated)
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use container::{Snapshot, StateContainer, StateHandle};
pub use reducer::Reducer;
pub use session::Session;
pub use slot::TaskSlot;
pub use supervise::{failure_message, panic_message, UNKNOWN_ERROR};
