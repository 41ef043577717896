//! One end-to-end exchange: a board, a router and a message history.
//!
//! Every operation takes the session by reference; there is no ambient
//! state. A hand-off updates the active role and appends its
//! acknowledgment inside a single `&mut self` call, so no reader can see
//! one change without the other.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::board::{Board, BoardStats};
use crate::config::KanbanConfig;
use crate::error::KanbanResult;
use crate::obs;
use crate::roles::{RoleName, RoleResult, RoleRouter, ToolSpec};
use crate::session::{
    command::{Handoff, ToolCommand, ToolReply},
    message::Message,
    payload::SessionPayload,
};

/// Identifier that keeps sessions apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A random identifier for drivers that do not name their sessions.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Board, router and history of one session.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    board: Board,
    router: RoleRouter,
    messages: Vec<Message>,
}

impl Session {
    /// A bootstrapped session: empty board, initial role active, no history.
    pub fn new(id: SessionId, config: &KanbanConfig) -> KanbanResult<Self> {
        let board = Board::new()
            .with_id_strategy(config.task_ids.clone())
            .with_default_priority(config.default_priority.clone());
        let session = Self {
            id,
            board,
            router: config.router()?,
            messages: Vec::new(),
        };
        obs::emit_session_opened(session.id.as_str(), session.active_role().as_str(), 0);
        Ok(session)
    }

    /// Rebuild a session from a driver payload, bootstrapping missing
    /// fields first.
    ///
    /// Counters in the payload are not trusted; they are recomputed from
    /// the tasks.
    pub fn from_payload(
        id: SessionId,
        payload: SessionPayload,
        config: &KanbanConfig,
    ) -> KanbanResult<Self> {
        let payload = payload.initialized(&config.initial_role);
        let mut session = Self {
            board: Board::new()
                .with_id_strategy(config.task_ids.clone())
                .with_default_priority(config.default_priority.clone()),
            router: config.router()?,
            messages: payload.messages,
            id,
        };
        for task in payload.tasks.unwrap_or_default() {
            session.board.insert_task(task)?;
        }
        if let Some(role) = payload.current_agent {
            session.router.restore_active(role)?;
        }
        obs::emit_session_opened(
            session.id.as_str(),
            session.active_role().as_str(),
            session.board.len(),
        );
        Ok(session)
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Direct board access for drivers that skip [`Session::dispatch`].
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn router(&self) -> &RoleRouter {
        &self.router
    }

    pub fn active_role(&self) -> &RoleName {
        self.router.active_role()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn stats(&self) -> BoardStats {
        self.board.stats()
    }

    /// Append a driver-authored entry (user prompt, agent reply).
    pub fn push_message(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Declare an extra hand-off target for this session, reachable from
    /// every role already registered.
    pub fn register_role(&mut self, name: impl Into<RoleName>) -> RoleResult<()> {
        self.router.register_role(name)
    }

    /// Tools the active role may call.
    pub fn tools(&self) -> RoleResult<Vec<ToolSpec>> {
        self.router.tools_for(self.active_role())
    }

    /// Snapshot of the shared state a driver carries forward.
    pub fn payload(&self) -> SessionPayload {
        SessionPayload {
            messages: self.messages.clone(),
            tasks: Some(self.board.tasks().to_vec()),
            current_agent: Some(self.active_role().clone()),
            board_stats: Some(self.board.stats()),
        }
    }

    /// Transfer control from `from` to `to`.
    ///
    /// On success the active role becomes `to` and a `tool` message named
    /// `transfer_to_<to>` is appended. On failure neither changes.
    pub fn hand_off(
        &mut self,
        from: &RoleName,
        to: &RoleName,
        tool_call_id: Option<String>,
    ) -> RoleResult<Handoff> {
        let record = self.router.transfer(from, to, tool_call_id)?;
        self.messages.push(Message::tool(
            to.handoff_tool_name(),
            record.tool_call_id.clone(),
            record.message.clone(),
        ));
        Ok(Handoff {
            goto: record.to.clone(),
            record,
            payload: self.payload(),
        })
    }

    /// Execute `command` on behalf of `role`.
    ///
    /// `role` is supplied by the driver, normally the current
    /// [`Session::active_role`]. Only a rejected hand-off is an error;
    /// board requests always produce a reply.
    pub fn dispatch(&mut self, role: &RoleName, command: ToolCommand) -> RoleResult<ToolReply> {
        tracing::debug!(role = %role, tool = %command.tool_name(), "dispatching tool command");
        let reply = match command {
            ToolCommand::CreateTask {
                title,
                description,
                priority,
            } => {
                let text_title = title.clone();
                let task_id = self
                    .board
                    .create_task(title, description, priority.as_deref());
                ToolReply::Created {
                    text: format!("Created task '{text_title}' with ID {task_id}"),
                    task_id,
                }
            }
            ToolCommand::ClaimTask { task_id } => {
                let outcome = self.board.claim_task(&task_id, role);
                ToolReply::Task {
                    text: outcome.to_string(),
                    outcome,
                }
            }
            ToolCommand::CompleteTask { task_id } => {
                let outcome = self.board.complete_task(&task_id, role);
                ToolReply::Task {
                    text: outcome.to_string(),
                    outcome,
                }
            }
            ToolCommand::GetBoardStatus => ToolReply::Status {
                text: self.board.render_status(self.router.active_role()),
            },
            ToolCommand::Transfer { to, tool_call_id } => {
                ToolReply::Transfer(self.hand_off(role, &to, tool_call_id)?)
            }
        };
        Ok(reply)
    }
}
