//! Structured observability hooks for board and hand-off events.
//!
//! Events are emitted at `info!` level; rejections at `debug!` since they
//! are an expected part of agent control flow. Wrap a driver turn in a
//! [`SessionSpan`] so every event carries its `session_id`.

use tracing::{debug, info};

/// RAII guard that enters a session-scoped tracing span.
///
/// ```ignore
/// let _span = SessionSpan::enter("multi_agent_session_1");
/// // events below carry session_id = "multi_agent_session_1"
/// ```
pub struct SessionSpan {
    _span: tracing::span::EnteredSpan,
}

impl SessionSpan {
    pub fn enter(session_id: &str) -> Self {
        let span = tracing::info_span!("kanban.session", session_id = %session_id);
        Self {
            _span: span.entered(),
        }
    }
}

pub fn emit_session_opened(session_id: &str, active_role: &str, tasks: usize) {
    info!(
        event = "session.opened",
        session_id = %session_id,
        active_role = %active_role,
        tasks = tasks,
    );
}

pub fn emit_task_created(task_id: &str, title: &str, priority: &str) {
    info!(event = "task.created", task_id = %task_id, title = %title, priority = %priority);
}

pub fn emit_task_claimed(task_id: &str, role: &str) {
    info!(event = "task.claimed", task_id = %task_id, role = %role);
}

pub fn emit_task_completed(task_id: &str, role: &str) {
    info!(event = "task.completed", task_id = %task_id, role = %role);
}

/// A claim or completion that left the board unchanged.
pub fn emit_task_rejected(task_id: &str, action: &str, role: &str, reason: &dyn std::fmt::Display) {
    debug!(
        event = "task.rejected",
        task_id = %task_id,
        action = %action,
        role = %role,
        reason = %reason,
    );
}

pub fn emit_handoff(from: &str, to: &str) {
    info!(event = "role.handoff", from = %from, to = %to);
}

pub fn emit_handoff_rejected(from: &str, to: &str, error: &dyn std::fmt::Display) {
    tracing::warn!(event = "role.handoff_rejected", from = %from, to = %to, error = %error);
}
