//! Failure-to-message conversion for supervised tasks.

use std::any::Any;
use std::fmt::Display;

/// Message surfaced when a failure carries no text of its own.
pub const UNKNOWN_ERROR: &str = "Unknown error occurred";

/// Render a failure as a human-readable message.
///
/// Falls back to [`UNKNOWN_ERROR`] when the failure displays as blank.
pub fn failure_message<E: Display + ?Sized>(error: &E) -> String {
    let message = error.to_string();
    if message.trim().is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        message
    }
}

/// Extract the message from a panic payload.
///
/// Panics raised with `panic!("literal")` carry a `&str`, formatted panics
/// carry a `String`. Anything else has no readable text.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::new()
    };

    if message.trim().is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        message
    }
}
