//! Programmer errors raised as panics.
//!
//! Some misuse can only be detected while a request is running, for example
//! a validator reporting a check against memory that is not a field of the
//! value it validated. Those paths panic with a [`ProgrammerError`] payload
//! via [`std::panic::panic_any`] so recovery middleware can tell them apart
//! from ordinary panics and print them.

use std::fmt;

/// Panic payload for a contract violation by application code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgrammerError {
    /// Short, stable name of the violated condition.
    pub condition: &'static str,
    /// Human-readable detail.
    pub detail: String,
}

impl ProgrammerError {
    /// Creates a payload.
    pub fn new(condition: &'static str, detail: impl Into<String>) -> Self {
        Self {
            condition,
            detail: detail.into(),
        }
    }

    /// Panics with this payload.
    pub fn raise(self) -> ! {
        std::panic::panic_any(self)
    }
}

impl fmt::Display for ProgrammerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.condition, self.detail)
    }
}

impl std::error::Error for ProgrammerError {}

/// Extracts a message from a panic payload.
///
/// Understands `&str`, `String` and [`ProgrammerError`] payloads.
#[must_use]
pub fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(err) = payload.downcast_ref::<ProgrammerError>() {
        err.to_string()
    } else if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
