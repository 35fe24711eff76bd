// JobJet client core
//
// Reactive session layer for the JobJet job board: job seekers and employers
// browse and post jobs, manage profiles, and message each other.
//
// Each screen is a session (domains/*/session.rs) that owns one viewstate
// container. Sessions talk to the backend only through the RemoteStore
// trait (kernel/traits.rs), injected at construction.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
