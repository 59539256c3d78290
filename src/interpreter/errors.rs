//! Error types for running programs
//!
//! [`RunError`] covers the two ways a run request can be refused. Neither is
//! fatal: the board and the queue are left as they were and the caller shows
//! the message to the user.

use crate::program::CompileError;

/// Reasons a run or step request is refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunError {
    /// The workspace has no start block, so there is nothing to run
    #[error("No start block found: add a start block to run the program")]
    MissingStart,

    /// Board settings cannot change while a program is running
    #[error("A program is running: stop it first")]
    Busy,
}

impl From<CompileError> for RunError {
    fn from(err: CompileError) -> Self {
        match err {
            CompileError::MissingStart => RunError::MissingStart,
        }
    }
}
