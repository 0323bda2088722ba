//! Error types for the matching engine and countdown.

use thiserror::Error;

/// Recoverable conditions reported by engine operations. None of these leave
/// the session in a modified state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("no pairs are loaded")]
    EmptyDataset,

    #[error("{missing} question(s) still need an answer")]
    IncompleteAssignment { missing: usize },

    #[error("index {index} is out of range for {len} pair(s)")]
    OutOfRangeIndex { index: usize, len: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("the countdown cannot be reconfigured while it is running")]
    Running,

    #[error("the countdown needs at least one second")]
    ZeroDuration,
}
