//! Per-state counters and the board status report.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::board::task::{Task, TaskState};
use crate::roles::RoleName;

/// Number of tasks in each state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardStats {
    pub todo: usize,
    pub in_progress: usize,
    pub done: usize,
}

impl BoardStats {
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut stats = Self::default();
        for task in tasks {
            match task.state {
                TaskState::Todo => stats.todo += 1,
                TaskState::InProgress => stats.in_progress += 1,
                TaskState::Done => stats.done += 1,
            }
        }
        stats
    }

    pub fn count(&self, state: TaskState) -> usize {
        match state {
            TaskState::Todo => self.todo,
            TaskState::InProgress => self.in_progress,
            TaskState::Done => self.done,
        }
    }

    pub fn total(&self) -> usize {
        self.todo + self.in_progress + self.done
    }
}

/// Render the status report for `tasks` as seen by `active_role`.
///
/// Sections follow the fixed order Todo, InProgress, Done; empty sections
/// are omitted and tasks keep board order within a section.
pub fn render_board_status(tasks: &[Task], active_role: &RoleName) -> String {
    let stats = BoardStats::from_tasks(tasks);
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "Kanban Board Status:");
    let _ = writeln!(out, "📋 TODO: {} tasks", stats.todo);
    let _ = writeln!(out, "🔄 IN_PROGRESS: {} tasks", stats.in_progress);
    let _ = writeln!(out, "✅ DONE: {} tasks", stats.done);
    let _ = writeln!(out);
    let _ = writeln!(out, "Current Agent: {active_role}");

    for state in TaskState::ALL {
        let mut section = tasks.iter().filter(|t| t.state == state).peekable();
        if section.peek().is_none() {
            continue;
        }
        let _ = writeln!(out, "\n{} Tasks:", state.label());
        for task in section {
            match &task.assigned_role {
                Some(role) => {
                    let _ = writeln!(
                        out,
                        "  - {}: {} (assigned to {role})",
                        task.id, task.title
                    );
                }
                None => {
                    let _ = writeln!(out, "  - {}: {}", task.id, task.title);
                }
            }
        }
    }
    out
}
