//! Session configuration: role team, initial role and board defaults.
//!
//! Reads:
//! - `KANBAN_DEFAULT_PRIORITY` (optional, default: `medium`)
//! - `KANBAN_INITIAL_ROLE` (optional, default: `orchestrator`; must name a
//!   configured role)

use serde::{Deserialize, Serialize};

use crate::board::{TaskIdStrategy, DEFAULT_PRIORITY};
use crate::error::{KanbanError, KanbanResult};
use crate::roles::{RoleName, RoleRouter, RoleTemplate};

pub const DEFAULT_PRIORITY_ENV: &str = "KANBAN_DEFAULT_PRIORITY";
pub const INITIAL_ROLE_ENV: &str = "KANBAN_INITIAL_ROLE";

/// Everything a new session is bootstrapped from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KanbanConfig {
    pub default_priority: String,
    pub initial_role: RoleName,
    pub roles: Vec<RoleTemplate>,
    #[serde(default)]
    pub task_ids: TaskIdStrategy,
}

impl Default for KanbanConfig {
    fn default() -> Self {
        Self {
            default_priority: DEFAULT_PRIORITY.to_string(),
            initial_role: RoleName::orchestrator(),
            roles: RoleTemplate::standard_team(),
            task_ids: TaskIdStrategy::Random,
        }
    }
}

impl KanbanConfig {
    /// Defaults overridden by the process environment.
    pub fn from_env() -> KanbanResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by `lookup`, which maps variable names to values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> KanbanResult<Self> {
        let mut config = Self::default();
        if let Some(priority) = lookup(DEFAULT_PRIORITY_ENV).filter(|p| !p.trim().is_empty()) {
            config.default_priority = priority.trim().to_string();
        }
        if let Some(role) = lookup(INITIAL_ROLE_ENV).filter(|r| !r.trim().is_empty()) {
            config.initial_role = RoleName::new(role.trim());
        }
        config.validate()?;
        Ok(config)
    }

    pub fn with_task_ids(mut self, task_ids: TaskIdStrategy) -> Self {
        self.task_ids = task_ids;
        self
    }

    pub fn with_default_priority(mut self, priority: impl Into<String>) -> Self {
        self.default_priority = priority.into();
        self
    }

    /// Reject empty priorities, duplicate roles and an unknown initial role.
    pub fn validate(&self) -> KanbanResult<()> {
        if self.default_priority.trim().is_empty() {
            return Err(KanbanError::Config(
                "default priority must not be empty".to_string(),
            ));
        }
        self.router()
            .map(|_| ())
            .map_err(|e| KanbanError::Config(e.to_string()))
    }

    /// A fresh router for one session.
    pub fn router(&self) -> KanbanResult<RoleRouter> {
        Ok(RoleRouter::with_templates(
            self.initial_role.clone(),
            self.roles.iter().cloned(),
        )?)
    }
}
