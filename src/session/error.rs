//! Error taxonomy for the session core
//!
//! Four conditions cover everything the core can fail with. Network and
//! storage failures are recoverable; invalid-state and missing-boilerplate
//! are programming/data errors and are surfaced immediately, never
//! swallowed.

use crate::session::Language;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    /// A judge/catalog call failed. The session state is left untouched
    /// and the user stays on (or is returned to) the prior list.
    #[error("judge request failed: {0}")]
    NetworkFailure(String),

    /// The persistence medium is inaccessible. Operations degrade to
    /// in-memory for the affected call; reported to the view layer once.
    #[error("persistent storage unavailable: {0}")]
    StorageUnavailable(String),

    /// An operation was invoked with no active problem, or with an
    /// unknown language/tab/pane token.
    #[error("invalid session state: {0}")]
    InvalidState(String),

    /// A reset or language switch asked for a language the current
    /// problem ships no boilerplate for.
    #[error("no boilerplate available for {0}")]
    MissingBoilerplate(Language),
}

impl SessionError {
    /// Whether the view layer should treat this as recoverable (show a
    /// message and carry on) rather than as a bug.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SessionError::NetworkFailure(_) | SessionError::StorageUnavailable(_)
        )
    }
}
