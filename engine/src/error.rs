//! Error types for the Shut the Box engine

use crate::state::{Action, NumberSet, State};
use thiserror::Error;

/// Engine errors. Absence of legal actions is never an error: it is an
/// empty action list, and "give up" is the caller's only option.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum EngineError {
    /// Game size at construction must be between 1 and 16.
    #[error("invalid game size {got}: must be between 1 and 16")]
    InvalidGameSize { got: u8 },

    /// The queried state is outside the enumerated state space.
    #[error("state {0} is not in the enumerated state space")]
    StateNotFound(State),

    /// The action references numbers not present in the remaining set.
    #[error("action {action} references numbers outside the remaining set {remaining}")]
    IllegalAction { action: Action, remaining: NumberSet },
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
