//! Error types for board seeding.
//!
//! Board operations themselves are total; only seeding pre-built tasks can
//! fail.

/// Errors produced when inserting pre-built tasks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("task id already on the board: {task_id}")]
    DuplicateTaskId { task_id: String },

    #[error("task {task_id} is inconsistent: {reason}")]
    InconsistentTask { task_id: String, reason: String },
}

/// Result type for board seeding.
pub type BoardResult<T> = std::result::Result<T, BoardError>;
