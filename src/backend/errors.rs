//! Runtime errors.
//!
//! Every failure the driver can observe travels through [`RuntimeError`]. The
//! `Escape` variant is not a fault: it is an in-flight nonlocal exit that rides
//! the error channel so `?` unwinds host frames up to the matching catch point.

use thiserror::Error;

use super::callable::Arity;
use super::continuation::{EscapeSignal, EscapeState};

/// Result type used by every callable body and by the driver
pub type RuntimeResult<T> = Result<T, RuntimeError>;

#[derive(Debug, Clone, Error)]
pub enum RuntimeError {
    /// Positional argument count does not fit the target signature
    #[error("{target}() takes {expected} positional argument(s) but {received} were given")]
    ArityMismatch {
        target: String,
        expected: Arity,
        received: usize,
    },

    /// Keyword argument the target does not declare (including `cc` passed to
    /// a callable outside the continuation convention)
    #[error("{target}() got an unexpected keyword argument '{keyword}'")]
    UnexpectedKeyword { target: String, keyword: String },

    /// Escape handle invoked after its dynamic extent closed or after it fired
    #[error(
        "escape continuation {handle} is {state}; it cannot be invoked outside the dynamic \
         extent that created it"
    )]
    StaleEscapeUse { handle: String, state: EscapeState },

    /// Nonlocal exit on its way to a catch point
    #[error("uncaught escape ({0})")]
    Escape(EscapeSignal),

    #[error("{target}: missing positional argument {index}")]
    MissingArgument { target: String, index: usize },

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: &'static str, found: String },

    #[error("name '{0}' is not bound in the environment")]
    UnboundName(String),

    #[error("thunk forced while it was already being forced")]
    ReentrantThunk,

    #[error("choice stack was dropped while {0} still referenced it")]
    ChoiceStackDropped(&'static str),

    /// Failure raised by host code inside a callable body
    #[error("{0}")]
    Raised(String),
}

impl RuntimeError {
    pub fn raised(msg: impl Into<String>) -> Self {
        RuntimeError::Raised(msg.into())
    }

    /// True for the argument count/shape class of errors
    pub fn is_arity_mismatch(&self) -> bool {
        matches!(
            self,
            RuntimeError::ArityMismatch { .. } | RuntimeError::UnexpectedKeyword { .. }
        )
    }

    pub fn is_stale_escape(&self) -> bool {
        matches!(self, RuntimeError::StaleEscapeUse { .. })
    }
}
