//! The task board: an ordered, exclusively owned collection of tasks.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::board::{
    error::{BoardError, BoardResult},
    outcome::{TaskOutcome, TaskUpdate, TransitionRejection},
    status::{render_board_status, BoardStats},
    task::{Task, TaskId, TaskState, DEFAULT_PRIORITY},
};
use crate::metrics::METRICS;
use crate::obs;
use crate::roles::RoleName;

/// How the board mints identifiers for new tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TaskIdStrategy {
    /// First 8 hex characters of a v4 UUID.
    #[default]
    Random,
    /// `<prefix>1`, `<prefix>2`, ...
    Sequential { prefix: String, next: u64 },
}

impl TaskIdStrategy {
    pub fn sequential(prefix: impl Into<String>) -> Self {
        TaskIdStrategy::Sequential {
            prefix: prefix.into(),
            next: 1,
        }
    }

    fn next_id(&mut self) -> TaskId {
        match self {
            TaskIdStrategy::Random => {
                let hex = Uuid::new_v4().simple().to_string();
                TaskId::new(&hex[..8])
            }
            TaskIdStrategy::Sequential { prefix, next } => {
                let id = TaskId::new(format!("{prefix}{next}"));
                *next += 1;
                id
            }
        }
    }
}

/// Ordered task collection enforcing the task lifecycle.
#[derive(Debug, Clone)]
pub struct Board {
    tasks: Vec<Task>,
    ids: TaskIdStrategy,
    default_priority: String,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            ids: TaskIdStrategy::default(),
            default_priority: DEFAULT_PRIORITY.to_string(),
        }
    }

    pub fn with_id_strategy(mut self, ids: TaskIdStrategy) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_default_priority(mut self, priority: impl Into<String>) -> Self {
        self.default_priority = priority.into();
        self
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, task_id: impl AsRef<str>) -> Option<&Task> {
        let task_id = task_id.as_ref();
        self.tasks.iter().find(|t| t.id.as_str() == task_id)
    }

    pub fn contains(&self, task_id: impl AsRef<str>) -> bool {
        self.get(task_id).is_some()
    }

    fn get_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id.as_str() == task_id)
    }

    fn fresh_id(&mut self) -> TaskId {
        loop {
            let candidate = self.ids.next_id();
            if !self.contains(&candidate) {
                return candidate;
            }
            tracing::debug!(task_id = %candidate, "task id collision, regenerating");
        }
    }

    /// Append a new `Todo` task and return its identifier.
    ///
    /// `priority` falls back to the board's default (`medium` unless
    /// configured otherwise).
    pub fn create_task(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Option<&str>,
    ) -> TaskId {
        let id = self.fresh_id();
        let priority = priority
            .map(str::to_string)
            .unwrap_or_else(|| self.default_priority.clone());
        let task = Task::new(id.clone(), title, description).with_priority(priority);

        obs::emit_task_created(id.as_str(), &task.title, &task.priority);
        METRICS.inc_tasks_created();
        self.tasks.push(task);
        id
    }

    /// Seed a pre-built task, keeping ids unique and the assignee
    /// invariant intact.
    pub fn insert_task(&mut self, task: Task) -> BoardResult<()> {
        if self.contains(&task.id) {
            return Err(BoardError::DuplicateTaskId {
                task_id: task.id.to_string(),
            });
        }
        if task.state == TaskState::Todo && task.assigned_role.is_some() {
            return Err(BoardError::InconsistentTask {
                task_id: task.id.to_string(),
                reason: "todo tasks cannot have an assignee".to_string(),
            });
        }
        self.tasks.push(task);
        Ok(())
    }

    /// Move a `Todo` task to `InProgress` and assign it to `role`.
    pub fn claim_task(&mut self, task_id: impl AsRef<str>, role: &RoleName) -> TaskOutcome {
        let task_id = task_id.as_ref();
        let Some(task) = self.get_mut(task_id) else {
            return not_found(task_id, "claim", role);
        };

        let outcome = if task.state == TaskState::Todo {
            task.state = TaskState::InProgress;
            task.assigned_role = Some(role.clone());
            obs::emit_task_claimed(task.id.as_str(), role.as_str());
            METRICS.inc_tasks_claimed();
            TaskOutcome::Updated(TaskUpdate::Claimed {
                task_id: task.id.clone(),
                title: task.title.clone(),
                role: role.clone(),
            })
        } else {
            TaskOutcome::InvalidTransition(TransitionRejection::NotClaimable {
                task_id: task.id.clone(),
                title: task.title.clone(),
                state: task.state,
            })
        };
        if !outcome.is_updated() {
            obs::emit_task_rejected(task_id, "claim", role.as_str(), &outcome);
            METRICS.inc_rejected();
        }
        outcome
    }

    /// Mark a task `Done` when `role` is its assignee.
    ///
    /// A task already `Done` is simply marked `Done` again.
    pub fn complete_task(&mut self, task_id: impl AsRef<str>, role: &RoleName) -> TaskOutcome {
        let task_id = task_id.as_ref();
        let Some(task) = self.get_mut(task_id) else {
            return not_found(task_id, "complete", role);
        };

        let outcome = if task.is_assigned_to(role) {
            task.state = TaskState::Done;
            obs::emit_task_completed(task.id.as_str(), role.as_str());
            METRICS.inc_tasks_completed();
            TaskOutcome::Updated(TaskUpdate::Completed {
                task_id: task.id.clone(),
                title: task.title.clone(),
                role: role.clone(),
            })
        } else {
            TaskOutcome::InvalidTransition(TransitionRejection::NotAssignee {
                task_id: task.id.clone(),
                title: task.title.clone(),
                assignee: task.assigned_role.clone(),
                requested_by: role.clone(),
            })
        };
        if !outcome.is_updated() {
            obs::emit_task_rejected(task_id, "complete", role.as_str(), &outcome);
            METRICS.inc_rejected();
        }
        outcome
    }

    pub fn stats(&self) -> BoardStats {
        BoardStats::from_tasks(&self.tasks)
    }

    /// Status report as seen by `active_role`. Pure read.
    pub fn render_status(&self, active_role: &RoleName) -> String {
        render_board_status(&self.tasks, active_role)
    }
}

fn not_found(task_id: &str, action: &str, role: &RoleName) -> TaskOutcome {
    let outcome = TaskOutcome::NotFound {
        task_id: TaskId::new(task_id),
    };
    obs::emit_task_rejected(task_id, action, role.as_str(), &outcome);
    METRICS.inc_rejected();
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> Board {
        Board::new().with_id_strategy(TaskIdStrategy::sequential("t"))
    }

    #[test]
    fn test_create_task_appends_todo_with_default_priority() {
        let mut board = board();
        let id = board.create_task("Draft API design", "Outline the endpoints", None);

        assert_eq!(id.as_str(), "t1");
        let task = board.get(&id).unwrap();
        assert_eq!(task.state, TaskState::Todo);
        assert_eq!(task.priority, "medium");
        assert!(task.assigned_role.is_none());
    }

    #[test]
    fn test_random_ids_are_eight_hex_chars() {
        let mut board = Board::new();
        let id = board.create_task("a", "b", Some("high"));
        assert_eq!(id.as_str().len(), 8);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(board.get(&id).unwrap().priority, "high");
    }

    #[test]
    fn test_sequential_ids_skip_seeded_ids() {
        let mut board = board();
        board.insert_task(Task::new("t1", "Seeded", "")).unwrap();
        let id = board.create_task("Fresh", "", None);
        assert_eq!(id.as_str(), "t2");
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let mut board = board();
        board.insert_task(Task::new("auth-001", "A", "")).unwrap();
        let err = board.insert_task(Task::new("auth-001", "B", "")).unwrap_err();
        assert!(matches!(err, BoardError::DuplicateTaskId { .. }));
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_insert_rejects_assigned_todo_task() {
        let mut task = Task::new("x", "X", "");
        task.assigned_role = Some(RoleName::qa());
        let err = board().insert_task(task).unwrap_err();
        assert!(matches!(err, BoardError::InconsistentTask { .. }));
    }

    #[test]
    fn test_claim_non_todo_task_does_not_mutate() {
        let mut board = board();
        let id = board.create_task("Draft API design", "", None);
        assert!(board.claim_task(&id, &RoleName::research()).is_updated());

        let outcome = board.claim_task(&id, &RoleName::coding());
        assert_eq!(
            outcome.to_string(),
            "Task 'Draft API design' is already in-progress"
        );
        assert!(board.get(&id).unwrap().is_assigned_to(&RoleName::research()));
    }

    #[test]
    fn test_complete_done_task_again_reports_completed() {
        let mut board = board();
        let id = board.create_task("Draft API design", "", None);
        board.claim_task(&id, &RoleName::research());
        board.complete_task(&id, &RoleName::research());

        let again = board.complete_task(&id, &RoleName::research());
        assert!(again.is_updated());
        assert_eq!(again.to_string(), "Task 'Draft API design' completed!");
        assert_eq!(board.get(&id).unwrap().state, TaskState::Done);
    }

    #[test]
    fn test_complete_unclaimed_task_names_nobody() {
        let mut board = board();
        let id = board.create_task("Draft API design", "", None);
        let outcome = board.complete_task(&id, &RoleName::qa());
        assert_eq!(
            outcome.to_string(),
            "Task 'Draft API design' is assigned to nobody, not qa_agent"
        );
        assert_eq!(board.get(&id).unwrap().state, TaskState::Todo);
    }

    #[test]
    fn test_dependencies_do_not_gate_claims() {
        let mut board = board();
        let blocker = board.create_task("Blocker", "", None);
        board
            .insert_task(Task::new("dep", "Dependent", "").with_dependencies(vec![blocker]))
            .unwrap();

        assert!(board.claim_task("dep", &RoleName::coding()).is_updated());
        assert!(board.complete_task("dep", &RoleName::coding()).is_updated());
    }
}
