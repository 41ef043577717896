//! Active-role tracking and hand-off validation.
//!
//! The router owns the role registry and the single `active_role` of a
//! session. [`RoleRouter::transfer`] validates a hand-off against the
//! registry before touching any state, so a rejected hand-off leaves the
//! router exactly as it was.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::metrics::METRICS;
use crate::obs;
use crate::roles::{
    error::{RoleError, RoleResult},
    role::{HandoffTargets, RoleName, RoleTemplate, ToolSpec, BOARD_TOOLS},
};

/// Acknowledgment of a completed hand-off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub from: RoleName,
    pub to: RoleName,
    pub tool_call_id: String,
    /// `Successfully transferred to <to>`.
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Registry of roles plus the currently active one.
#[derive(Debug, Clone)]
pub struct RoleRouter {
    templates: Vec<RoleTemplate>,
    active: RoleName,
}

impl RoleRouter {
    /// A registry holding only `initial`, which is active and may hand off
    /// to any role registered later.
    pub fn new(initial: impl Into<RoleName>) -> Self {
        let initial = initial.into();
        Self {
            templates: vec![RoleTemplate::new(initial.clone())],
            active: initial,
        }
    }

    /// The standard four-role team with `orchestrator` active.
    pub fn standard() -> Self {
        Self {
            templates: RoleTemplate::standard_team(),
            active: RoleName::orchestrator(),
        }
    }

    /// Build a router from templates, rejecting duplicates and an
    /// unregistered initial role.
    pub fn with_templates(
        initial: impl Into<RoleName>,
        templates: impl IntoIterator<Item = RoleTemplate>,
    ) -> RoleResult<Self> {
        let mut router = Self {
            templates: Vec::new(),
            active: initial.into(),
        };
        for template in templates {
            router.register_template(template)?;
        }
        if !router.is_registered(&router.active) {
            return Err(RoleError::UnknownRole {
                role: router.active.to_string(),
            });
        }
        Ok(router)
    }

    /// Declare `name` as a hand-off target of every registered role.
    ///
    /// The new role may itself hand off to any registered role. Restricted
    /// templates get `name` appended to their target list.
    pub fn register_role(&mut self, name: impl Into<RoleName>) -> RoleResult<()> {
        let name = name.into();
        self.register_template(RoleTemplate::new(name.clone()))?;
        for template in &mut self.templates {
            if let HandoffTargets::Only(targets) = &mut template.hands_off_to {
                if template.name != name && !targets.contains(&name) {
                    targets.push(name.clone());
                }
            }
        }
        Ok(())
    }

    /// Register a role with an explicit template.
    ///
    /// Existing restricted templates are left alone, so the new role is only
    /// reachable from roles whose targets already name it.
    pub fn register_template(&mut self, template: RoleTemplate) -> RoleResult<()> {
        if self.is_registered(&template.name) {
            return Err(RoleError::DuplicateRole {
                role: template.name.to_string(),
            });
        }
        tracing::debug!(role = %template.name, "role registered");
        self.templates.push(template);
        Ok(())
    }

    pub fn is_registered(&self, name: &RoleName) -> bool {
        self.templates.iter().any(|t| &t.name == name)
    }

    pub fn template(&self, name: &RoleName) -> Option<&RoleTemplate> {
        self.templates.iter().find(|t| &t.name == name)
    }

    /// Registered roles in registration order.
    pub fn roles(&self) -> impl Iterator<Item = &RoleName> {
        self.templates.iter().map(|t| &t.name)
    }

    pub fn active_role(&self) -> &RoleName {
        &self.active
    }

    /// Check that `from` may hand control to `to` without changing anything.
    pub fn plan_handoff(&self, from: &RoleName, to: &RoleName) -> RoleResult<()> {
        if !self.is_registered(to) {
            return Err(RoleError::UnknownRole {
                role: to.to_string(),
            });
        }
        let template = self.template(from).ok_or_else(|| RoleError::UnknownRole {
            role: from.to_string(),
        })?;
        if from == to || !template.hands_off_to.permits(to) {
            return Err(RoleError::ForbiddenRoute {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        Ok(())
    }

    /// Validate and apply a hand-off, returning its acknowledgment.
    ///
    /// A missing `tool_call_id` is replaced by a fresh one.
    pub fn transfer(
        &mut self,
        from: &RoleName,
        to: &RoleName,
        tool_call_id: Option<String>,
    ) -> RoleResult<TransferRecord> {
        if let Err(err) = self.plan_handoff(from, to) {
            obs::emit_handoff_rejected(from.as_str(), to.as_str(), &err);
            return Err(err);
        }
        if from != &self.active {
            tracing::warn!(
                from = %from,
                active = %self.active,
                "hand-off requested by a role that is not active"
            );
        }

        self.active = to.clone();
        let record = TransferRecord {
            from: from.clone(),
            to: to.clone(),
            tool_call_id: tool_call_id
                .unwrap_or_else(|| format!("call_{}", Uuid::new_v4().simple())),
            message: format!("Successfully transferred to {to}"),
            at: Utc::now(),
        };
        obs::emit_handoff(from.as_str(), to.as_str());
        METRICS.inc_handoffs();
        Ok(record)
    }

    /// Roles `role` may hand off to, in registration order.
    pub fn permitted_targets(&self, role: &RoleName) -> RoleResult<Vec<RoleName>> {
        let template = self.template(role).ok_or_else(|| RoleError::UnknownRole {
            role: role.to_string(),
        })?;
        Ok(self
            .roles()
            .filter(|r| *r != role && template.hands_off_to.permits(r))
            .cloned()
            .collect())
    }

    /// Tool catalog for `role`: the board tools followed by one
    /// `transfer_to_<target>` tool per permitted target.
    pub fn tools_for(&self, role: &RoleName) -> RoleResult<Vec<ToolSpec>> {
        let mut tools: Vec<ToolSpec> = BOARD_TOOLS
            .iter()
            .map(|(name, description)| ToolSpec::new(*name, *description))
            .collect();
        for target in self.permitted_targets(role)? {
            let description = self
                .template(&target)
                .map(|t| t.handoff_description.clone())
                .unwrap_or_else(|| format!("Transfer control to {target}"));
            tools.push(ToolSpec::new(target.handoff_tool_name(), description));
        }
        Ok(tools)
    }

    /// Replace the active role without a hand-off record.
    ///
    /// Used when rebuilding a session from a payload that already names
    /// its current agent.
    pub(crate) fn restore_active(&mut self, role: RoleName) -> RoleResult<()> {
        if !self.is_registered(&role) {
            return Err(RoleError::UnknownRole {
                role: role.to_string(),
            });
        }
        self.active = role;
        Ok(())
    }
}

impl Default for RoleRouter {
    fn default() -> Self {
        Self::standard()
    }
}

/// Whether a template restricts its targets at all.
pub fn is_open_template(template: &RoleTemplate) -> bool {
    matches!(template.hands_off_to, HandoffTargets::Any)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_router_starts_at_orchestrator() {
        let router = RoleRouter::standard();
        assert_eq!(router.active_role(), &RoleName::orchestrator());
        assert_eq!(router.roles().count(), 4);
    }

    #[test]
    fn test_transfer_to_registered_role_updates_active() {
        let mut router = RoleRouter::standard();
        let record = router
            .transfer(&RoleName::orchestrator(), &RoleName::coding(), None)
            .unwrap();

        assert_eq!(router.active_role(), &RoleName::coding());
        assert_eq!(record.message, "Successfully transferred to coding_agent");
        assert!(record.tool_call_id.starts_with("call_"));
    }

    #[test]
    fn test_transfer_to_unregistered_role_is_rejected() {
        let mut router = RoleRouter::standard();
        let err = router
            .transfer(
                &RoleName::orchestrator(),
                &RoleName::new("unregistered_role"),
                None,
            )
            .unwrap_err();

        assert_eq!(
            err,
            RoleError::UnknownRole {
                role: "unregistered_role".to_string()
            }
        );
        assert_eq!(router.active_role(), &RoleName::orchestrator());
    }

    #[test]
    fn test_self_transfer_is_forbidden() {
        let router = RoleRouter::standard();
        let err = router
            .plan_handoff(&RoleName::qa(), &RoleName::qa())
            .unwrap_err();
        assert!(matches!(err, RoleError::ForbiddenRoute { .. }));
    }

    #[test]
    fn test_restricted_template_rejects_unlisted_target() {
        let router = RoleRouter::with_templates(
            "lead",
            vec![
                RoleTemplate::new("lead").with_targets(vec!["writer".into()]),
                RoleTemplate::new("writer"),
                RoleTemplate::new("editor"),
            ],
        )
        .unwrap();

        assert!(router.plan_handoff(&"lead".into(), &"writer".into()).is_ok());
        assert_eq!(
            router.plan_handoff(&"lead".into(), &"editor".into()),
            Err(RoleError::ForbiddenRoute {
                from: "lead".to_string(),
                to: "editor".to_string(),
            })
        );
    }

    #[test]
    fn test_register_role_twice_is_rejected() {
        let mut router = RoleRouter::standard();
        let err = router.register_role(RoleName::QA).unwrap_err();
        assert_eq!(
            err,
            RoleError::DuplicateRole {
                role: "qa_agent".to_string()
            }
        );
    }

    #[test]
    fn test_with_templates_requires_registered_initial_role() {
        let result = RoleRouter::with_templates("ghost", RoleTemplate::standard_team());
        assert!(matches!(result, Err(RoleError::UnknownRole { .. })));
    }

    #[test]
    fn test_tools_for_orchestrator_lists_board_and_transfer_tools() {
        let router = RoleRouter::standard();
        let tools = router.tools_for(&RoleName::orchestrator()).unwrap();
        let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();

        assert_eq!(
            names,
            vec![
                "create_task",
                "claim_task",
                "complete_task",
                "get_board_status",
                "transfer_to_research_agent",
                "transfer_to_coding_agent",
                "transfer_to_qa_agent",
            ]
        );
        assert_eq!(
            tools[6].description,
            "Transfer to QA agent for testing and validation"
        );
    }

    #[test]
    fn test_open_template_targets_every_other_role() {
        let mut router = RoleRouter::new("a");
        router.register_role("b").unwrap();
        router.register_role("c").unwrap();

        assert!(is_open_template(router.template(&"a".into()).unwrap()));
        let targets = router.permitted_targets(&"b".into()).unwrap();
        assert_eq!(targets, vec![RoleName::from("a"), RoleName::from("c")]);
    }

    #[test]
    fn test_bare_router_hands_off_from_initial_role() {
        let mut router = RoleRouter::new(RoleName::ORCHESTRATOR);
        router.register_role(RoleName::CODING).unwrap();

        let record = router
            .transfer(&RoleName::orchestrator(), &RoleName::coding(), None)
            .unwrap();
        assert_eq!(record.to, RoleName::coding());
        assert_eq!(router.active_role(), &RoleName::coding());

        router
            .transfer(&RoleName::coding(), &RoleName::orchestrator(), None)
            .unwrap();
        assert_eq!(router.active_role(), &RoleName::orchestrator());
    }

    #[test]
    fn test_new_router_registers_initial_role() {
        let router = RoleRouter::new("lead");
        assert!(router.is_registered(&"lead".into()));
        assert!(RoleRouter::new("lead").register_role("lead").is_err());
    }

    #[test]
    fn test_registered_role_is_reachable_from_standard_team() {
        let mut router = RoleRouter::standard();
        router.register_role("docs_agent").unwrap();
        let docs = RoleName::new("docs_agent");

        for from in [
            RoleName::orchestrator(),
            RoleName::research(),
            RoleName::coding(),
            RoleName::qa(),
        ] {
            assert!(router.plan_handoff(&from, &docs).is_ok(), "{from} -> docs_agent");
            assert!(router.plan_handoff(&docs, &from).is_ok(), "docs_agent -> {from}");
        }

        let tools = router.tools_for(&RoleName::qa()).unwrap();
        assert_eq!(tools.last().unwrap().name, "transfer_to_docs_agent");
    }

    #[test]
    fn test_register_template_does_not_widen_restricted_roles() {
        let mut router = RoleRouter::standard();
        router
            .register_template(RoleTemplate::new("auditor"))
            .unwrap();

        assert!(matches!(
            router.plan_handoff(&RoleName::qa(), &"auditor".into()),
            Err(RoleError::ForbiddenRoute { .. })
        ));
    }
}
