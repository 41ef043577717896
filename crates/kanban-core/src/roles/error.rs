//! Error types for role routing.

/// Errors produced by the role router.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoleError {
    #[error("unknown role: {role}")]
    UnknownRole { role: String },

    #[error("role {role} is already registered")]
    DuplicateRole { role: String },

    #[error("role {from} may not hand off to {to}")]
    ForbiddenRoute { from: String, to: String },
}

/// Result type for role routing operations.
pub type RoleResult<T> = std::result::Result<T, RoleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_error_display_names_roles() {
        let err = RoleError::UnknownRole {
            role: "unregistered_role".to_string(),
        };
        assert_eq!(err.to_string(), "unknown role: unregistered_role");

        let err = RoleError::ForbiddenRoute {
            from: "qa_agent".to_string(),
            to: "qa_agent".to_string(),
        };
        assert!(err.to_string().contains("may not hand off"));
    }
}
