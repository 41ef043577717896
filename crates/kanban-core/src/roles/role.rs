//! Core role vocabulary: `RoleName`, `RoleTemplate`, `HandoffTargets`, `ToolSpec`.

use serde::{Deserialize, Serialize};

/// Name of a participant that can be active and can own tasks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleName(String);

impl RoleName {
    pub const ORCHESTRATOR: &'static str = "orchestrator";
    pub const RESEARCH: &'static str = "research_agent";
    pub const CODING: &'static str = "coding_agent";
    pub const QA: &'static str = "qa_agent";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn orchestrator() -> Self {
        Self::new(Self::ORCHESTRATOR)
    }

    pub fn research() -> Self {
        Self::new(Self::RESEARCH)
    }

    pub fn coding() -> Self {
        Self::new(Self::CODING)
    }

    pub fn qa() -> Self {
        Self::new(Self::QA)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the tool a driver exposes for handing control to this role.
    pub fn handoff_tool_name(&self) -> String {
        format!("transfer_to_{}", self.0)
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoleName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RoleName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for RoleName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for RoleName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Which roles a role may hand control to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "roles", rename_all = "snake_case")]
pub enum HandoffTargets {
    /// Any registered role other than itself.
    Any,
    /// Only the listed roles.
    Only(Vec<RoleName>),
}

impl HandoffTargets {
    /// Whether `to` is listed. Self-transfer is rejected by the router, not here.
    pub fn permits(&self, to: &RoleName) -> bool {
        match self {
            HandoffTargets::Any => true,
            HandoffTargets::Only(roles) => roles.contains(to),
        }
    }
}

/// Static definition of a role: what it is for and where it may hand off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleTemplate {
    pub name: RoleName,
    /// Human-readable description of the role's responsibilities.
    pub description: String,
    /// Description attached to the `transfer_to_<name>` tool other roles see.
    pub handoff_description: String,
    pub hands_off_to: HandoffTargets,
}

impl RoleTemplate {
    /// A role that may hand off to any other registered role.
    pub fn new(name: impl Into<RoleName>) -> Self {
        let name = name.into();
        Self {
            description: format!("Agent role {name}"),
            handoff_description: format!("Transfer control to {name}"),
            hands_off_to: HandoffTargets::Any,
            name,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_handoff_description(mut self, description: impl Into<String>) -> Self {
        self.handoff_description = description.into();
        self
    }

    pub fn with_targets(mut self, targets: Vec<RoleName>) -> Self {
        self.hands_off_to = HandoffTargets::Only(targets);
        self
    }

    /// The four-role team: orchestrator, research, coding and QA.
    ///
    /// Every role may transfer to each of the other three, never to itself.
    pub fn standard_team() -> Vec<RoleTemplate> {
        let others = |me: &str| -> Vec<RoleName> {
            [
                RoleName::RESEARCH,
                RoleName::CODING,
                RoleName::QA,
                RoleName::ORCHESTRATOR,
            ]
            .into_iter()
            .filter(|r| *r != me)
            .map(RoleName::from)
            .collect()
        };

        vec![
            RoleTemplate::new(RoleName::ORCHESTRATOR)
                .with_description("Coordinates the team, creates high-level tasks and monitors the board")
                .with_handoff_description("Transfer back to orchestrator for task coordination")
                .with_targets(others(RoleName::ORCHESTRATOR)),
            RoleTemplate::new(RoleName::RESEARCH)
                .with_description("Gathers information and breaks problems into research tasks")
                .with_handoff_description(
                    "Transfer to research agent for information gathering and analysis",
                )
                .with_targets(others(RoleName::RESEARCH)),
            RoleTemplate::new(RoleName::CODING)
                .with_description("Implements features and fixes issues")
                .with_handoff_description("Transfer to coding agent for implementation tasks")
                .with_targets(others(RoleName::CODING)),
            RoleTemplate::new(RoleName::QA)
                .with_description("Tests implementations and validates requirements")
                .with_handoff_description("Transfer to QA agent for testing and validation")
                .with_targets(others(RoleName::QA)),
        ]
    }
}

/// A tool a driver presents to the active role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
}

impl ToolSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Board tools every role gets, in catalog order.
pub const BOARD_TOOLS: [(&str, &str); 4] = [
    ("create_task", "Create a new task and add it to the kanban board"),
    ("claim_task", "Claim a task from TODO and move it to IN_PROGRESS"),
    ("complete_task", "Mark a task as completed"),
    ("get_board_status", "Get current kanban board status"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handoff_tool_name_uses_transfer_prefix() {
        assert_eq!(RoleName::coding().handoff_tool_name(), "transfer_to_coding_agent");
    }

    #[test]
    fn test_standard_team_has_four_roles_without_self_routes() {
        let team = RoleTemplate::standard_team();
        assert_eq!(team.len(), 4);

        for template in &team {
            assert!(!template.hands_off_to.permits(&template.name));
            let HandoffTargets::Only(targets) = &template.hands_off_to else {
                panic!("standard roles use explicit target lists");
            };
            assert_eq!(targets.len(), 3);
        }
    }

    #[test]
    fn test_any_targets_permit_every_role() {
        let template = RoleTemplate::new("reviewer");
        assert!(template.hands_off_to.permits(&RoleName::qa()));
        assert_eq!(template.handoff_description, "Transfer control to reviewer");
    }

    #[test]
    fn test_role_name_serializes_as_plain_string() {
        let json = serde_json::to_string(&RoleName::qa()).unwrap();
        assert_eq!(json, "\"qa_agent\"");
    }
}
