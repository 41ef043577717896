//! Tagged results of claim and completion requests.
//!
//! Board operations never fail; an unmet precondition is reported as a
//! [`TaskOutcome`] variant. `Display` renders the human-readable text a
//! driver relays back to the acting role.

use serde::Serialize;

use crate::board::task::{TaskId, TaskState};
use crate::roles::RoleName;

/// Result of a state-changing board request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum TaskOutcome {
    Updated(TaskUpdate),
    NotFound { task_id: TaskId },
    InvalidTransition(TransitionRejection),
}

/// A mutation that was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskUpdate {
    Claimed {
        task_id: TaskId,
        title: String,
        role: RoleName,
    },
    Completed {
        task_id: TaskId,
        title: String,
        role: RoleName,
    },
}

/// Why a request left the task untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransitionRejection {
    /// Only `Todo` tasks can be claimed.
    NotClaimable {
        task_id: TaskId,
        title: String,
        state: TaskState,
    },
    /// Only the assignee can complete a task.
    NotAssignee {
        task_id: TaskId,
        title: String,
        assignee: Option<RoleName>,
        requested_by: RoleName,
    },
}

impl TaskOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, TaskOutcome::Updated(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, TaskOutcome::NotFound { .. })
    }

    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, TaskOutcome::InvalidTransition(_))
    }

    pub fn task_id(&self) -> &TaskId {
        match self {
            TaskOutcome::Updated(TaskUpdate::Claimed { task_id, .. })
            | TaskOutcome::Updated(TaskUpdate::Completed { task_id, .. })
            | TaskOutcome::NotFound { task_id }
            | TaskOutcome::InvalidTransition(TransitionRejection::NotClaimable { task_id, .. })
            | TaskOutcome::InvalidTransition(TransitionRejection::NotAssignee { task_id, .. }) => {
                task_id
            }
        }
    }
}

impl std::fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskOutcome::Updated(TaskUpdate::Claimed { title, .. }) => {
                write!(f, "Task '{title}' claimed and moved to IN_PROGRESS")
            }
            TaskOutcome::Updated(TaskUpdate::Completed { title, .. }) => {
                write!(f, "Task '{title}' completed!")
            }
            TaskOutcome::NotFound { task_id } => write!(f, "Task with ID {task_id} not found"),
            TaskOutcome::InvalidTransition(TransitionRejection::NotClaimable {
                title, state, ..
            }) => write!(f, "Task '{title}' is already {state}"),
            TaskOutcome::InvalidTransition(TransitionRejection::NotAssignee {
                title,
                assignee,
                requested_by,
                ..
            }) => match assignee {
                Some(assignee) => write!(
                    f,
                    "Task '{title}' is assigned to {assignee}, not {requested_by}"
                ),
                None => write!(f, "Task '{title}' is assigned to nobody, not {requested_by}"),
            },
        }
    }
}
