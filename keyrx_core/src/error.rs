//! Construction-time validation errors for baked-in rule tables.
//!
//! Rule *processing* never fails - an inconsistent rule/state pairing at
//! runtime is undefined behavior per the component design, not a
//! recoverable error. What can legitimately fail is the rule table
//! itself being malformed before the engine ever sees an event, which is
//! why every variant here names a problem discoverable purely by
//! inspecting the static tables passed to [`crate::Engine::new`].

use thiserror::Error;

/// Errors raised while validating a baked-in rule table at
/// [`crate::Engine::new`] time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("multi-key rule {index} watches {count} keys, more than the 8-key chord limit")]
    TooManyWatchedKeys { index: usize, count: usize },

    #[error("multi-key rule {index} watches no keys")]
    EmptyWatchedKeys { index: usize },

    #[error("tap/hold rule {index} has base_key equal to KEY_RESERVED")]
    ReservedBaseKey { index: usize },

    #[error("map rule {index} has from_key equal to KEY_RESERVED")]
    ReservedMapSource { index: usize },
}

pub type EngineResult<T> = Result<T, EngineError>;
