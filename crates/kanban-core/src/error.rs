//! Crate-level error taxonomy.

use crate::board::BoardError;
use crate::roles::RoleError;

/// Errors surfaced by sessions, the session store and configuration.
#[derive(Debug, thiserror::Error)]
pub enum KanbanError {
    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("role error: {0}")]
    Role(#[from] RoleError),

    #[error("board error: {0}")]
    Board(#[from] BoardError),

    #[error("invalid tool call {tool}: {reason}")]
    InvalidToolCall { tool: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for session-level operations.
pub type KanbanResult<T> = std::result::Result<T, KanbanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_error_converts_and_displays() {
        let err: KanbanError = RoleError::UnknownRole {
            role: "ghost".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "role error: unknown role: ghost");
    }

    #[test]
    fn test_session_not_found_display() {
        let err = KanbanError::SessionNotFound("multi_agent_session_1".to_string());
        assert!(err.to_string().contains("multi_agent_session_1"));
    }
}
