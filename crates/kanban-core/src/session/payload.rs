//! The shared state a driver threads between turns.

use serde::{Deserialize, Serialize};

use crate::board::{BoardStats, Task};
use crate::roles::RoleName;
use crate::session::message::Message;

/// Session state as exchanged with the driver.
///
/// Fields other than `messages` may be absent in a payload the driver
/// builds itself; [`SessionPayload::initialize`] fills in only what is
/// missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPayload {
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<Task>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_agent: Option<RoleName>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_stats: Option<BoardStats>,
}

impl SessionPayload {
    /// Bootstrap missing fields: empty task list, `initial_role` as the
    /// current agent, zeroed counters. Present fields are left untouched,
    /// so applying this twice equals applying it once.
    pub fn initialize(&mut self, initial_role: &RoleName) {
        if self.tasks.is_none() {
            self.tasks = Some(Vec::new());
        }
        if self.current_agent.is_none() {
            self.current_agent = Some(initial_role.clone());
        }
        if self.board_stats.is_none() {
            self.board_stats = Some(BoardStats::default());
        }
    }

    pub fn initialized(mut self, initial_role: &RoleName) -> Self {
        self.initialize(initial_role);
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.tasks.is_some() && self.current_agent.is_some() && self.board_stats.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_fills_missing_fields() {
        let payload = SessionPayload::default().initialized(&RoleName::orchestrator());
        assert!(payload.is_initialized());
        assert_eq!(payload.tasks, Some(vec![]));
        assert_eq!(payload.current_agent, Some(RoleName::orchestrator()));
        assert_eq!(payload.board_stats, Some(BoardStats::default()));
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let once = SessionPayload::default().initialized(&RoleName::orchestrator());
        let twice = once.clone().initialized(&RoleName::orchestrator());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_initialize_keeps_present_fields() {
        let mut payload = SessionPayload {
            current_agent: Some(RoleName::qa()),
            tasks: Some(vec![Task::new("auth-001", "Research", "")]),
            ..Default::default()
        };
        payload.initialize(&RoleName::orchestrator());
        assert_eq!(payload.current_agent, Some(RoleName::qa()));
        assert_eq!(payload.tasks.as_ref().map(Vec::len), Some(1));
    }
}
