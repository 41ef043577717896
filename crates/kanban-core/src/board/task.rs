//! Task vocabulary: `TaskId`, `TaskState`, `Task`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::roles::RoleName;

/// Priority assigned when a caller does not give one.
pub const DEFAULT_PRIORITY: &str = "medium";

/// Opaque task identifier, unique within a board's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Lifecycle state of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskState {
    /// Fixed rendering order.
    pub const ALL: [TaskState; 3] = [TaskState::Todo, TaskState::InProgress, TaskState::Done];

    /// Wire value: `todo`, `in-progress`, `done`.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Todo => "todo",
            TaskState::InProgress => "in-progress",
            TaskState::Done => "done",
        }
    }

    /// Section heading used in the board status.
    pub fn label(&self) -> &'static str {
        match self {
            TaskState::Todo => "TODO",
            TaskState::InProgress => "IN-PROGRESS",
            TaskState::Done => "DONE",
        }
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of work on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub state: TaskState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_role: Option<RoleName>,
    #[serde(default = "default_priority")]
    pub priority: String,
    /// Informational only; never gates a claim or completion.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<TaskId>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn default_priority() -> String {
    DEFAULT_PRIORITY.to_string()
}

impl Task {
    /// A fresh, unassigned `Todo` task with the default priority.
    pub fn new(
        id: impl Into<TaskId>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            state: TaskState::Todo,
            assigned_role: None,
            priority: default_priority(),
            dependencies: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = priority.into();
        self
    }

    pub fn with_dependencies(mut self, dependencies: Vec<TaskId>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn is_assigned_to(&self, role: &RoleName) -> bool {
        self.assigned_role.as_ref() == Some(role)
    }
}
