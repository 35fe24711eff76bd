//! Reducer trait - pure state transitions.
//!
//! Reducers turn a fact (something that happened) and the current state into
//! the next state. They run synchronously, perform no IO, and are applied
//! against the freshest state at application time, so facts produced by
//! suspended work never overwrite newer updates with a stale snapshot.

/// A pure state transition.
///
/// # Guarantees expected of implementors
///
/// - No IO, no async, no interior mutability
/// - Deterministic: same `(state, event)` gives the same result
/// - Events that do not concern the reducer return `state.clone()`
///
/// # Example
///
/// ```ignore
/// struct DraftReducer;
///
/// impl Reducer<DraftFact, Snapshot<Draft>> for DraftReducer {
///     fn reduce(&self, state: &Snapshot<Draft>, fact: &DraftFact) -> Snapshot<Draft> {
///         match fact {
///             DraftFact::Changed(text) => Snapshot {
///                 data: Draft { text: text.clone() },
///                 ..state.clone()
///             },
///         }
///     }
/// }
/// ```
pub trait Reducer<E, S> {
    /// Compute the next state from the current state and an event.
    fn reduce(&self, state: &S, event: &E) -> S;
}
