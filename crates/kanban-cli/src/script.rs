//! Scripted driver: replays a fixed sequence of tool calls against one
//! session, always acting as the session's current active role.

use std::path::Path;

use anyhow::{Context, Result};
use kanban_core::{
    Message, RoleName, SessionId, SessionPayload, SessionSpan, SessionStore, Task, ToolCommand,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A script file: optional seed state plus the steps to play.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub seed: Vec<Task>,
    pub steps: Vec<ScriptStep>,
}

/// One step: a typed command, a raw tool call as a model emits it, or an
/// assistant turn spoken by the active role.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScriptStep {
    Command(ToolCommand),
    Call {
        name: String,
        #[serde(default)]
        arguments: Value,
    },
    Say {
        say: String,
    },
}

impl ScriptStep {
    pub fn call(name: &str, arguments: Value) -> Self {
        ScriptStep::Call {
            name: name.to_string(),
            arguments,
        }
    }

    pub fn say(content: &str) -> Self {
        ScriptStep::Say {
            say: content.to_string(),
        }
    }

    fn label(&self) -> String {
        match self {
            ScriptStep::Command(command) => command.tool_name(),
            ScriptStep::Call { name, .. } => name.clone(),
            ScriptStep::Say { .. } => SAY_LABEL.to_string(),
        }
    }
}

impl Script {
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse script {}", path.display()))
    }

    fn seed_payload(&self) -> SessionPayload {
        SessionPayload {
            messages: self.messages.clone(),
            tasks: Some(self.seed.clone()),
            ..Default::default()
        }
    }
}

/// Tool column shown for assistant turns.
const SAY_LABEL: &str = "say";

/// What happened at one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepResult {
    pub index: usize,
    pub role: RoleName,
    pub tool: String,
    pub text: String,
    /// False only for rejected hand-offs and malformed tool calls.
    pub ok: bool,
}

/// Everything a script run produced.
#[derive(Debug, Clone, Serialize)]
pub struct ScriptReport {
    pub session_id: SessionId,
    pub steps: Vec<StepResult>,
    pub payload: SessionPayload,
}

/// Play `script` against the session `session_id` in `store`.
///
/// Seed tasks and messages only apply when the session is new. Failed
/// steps are recorded and the script continues, as a driver relays errors
/// back to the model instead of aborting the exchange.
pub async fn run_script(
    store: &dyn SessionStore,
    script: Script,
    session_id: SessionId,
) -> Result<ScriptReport> {
    let shared = store
        .open_with(&session_id, script.seed_payload())
        .await
        .with_context(|| format!("Failed to open session {session_id}"))?;
    let mut session = shared.lock().await;
    let _span = SessionSpan::enter(session_id.as_str());

    let mut steps = Vec::with_capacity(script.steps.len());
    for (index, step) in script.steps.into_iter().enumerate() {
        let role = session.active_role().clone();
        let label = step.label();
        let command = match step {
            ScriptStep::Say { say } => {
                session.push_message(Message::assistant(role.as_str(), say.as_str()));
                steps.push(StepResult {
                    index,
                    role,
                    tool: label,
                    text: say,
                    ok: true,
                });
                continue;
            }
            ScriptStep::Command(command) => Ok(command),
            ScriptStep::Call { name, arguments } => ToolCommand::from_tool_call(&name, arguments),
        };
        let result = match command {
            Err(err) => StepResult {
                index,
                role,
                tool: label,
                text: err.to_string(),
                ok: false,
            },
            Ok(command) => {
                let tool = command.tool_name();
                match session.dispatch(&role, command) {
                    Ok(reply) => StepResult {
                        index,
                        role,
                        tool,
                        text: reply.text().to_string(),
                        ok: true,
                    },
                    Err(err) => StepResult {
                        index,
                        role,
                        tool,
                        text: err.to_string(),
                        ok: false,
                    },
                }
            }
        };
        if !result.ok {
            tracing::warn!(step = index, tool = %result.tool, error = %result.text, "step failed");
        }
        steps.push(result);
    }

    Ok(ScriptReport {
        session_id,
        steps,
        payload: session.payload(),
    })
}

/// Built-in coordination scenario: an authentication feature split across
/// research, coding and QA.
pub fn demo_script() -> Script {
    use serde_json::json;

    let claim = |id: &str| ScriptStep::call("claim_task", json!({ "task_id": id }));
    let complete = |id: &str| ScriptStep::call("complete_task", json!({ "task_id": id }));
    let status = || ScriptStep::call("get_board_status", Value::Null);
    let transfer = |to: &str| ScriptStep::call(&format!("transfer_to_{to}"), Value::Null);

    Script {
        session_id: Some("multi_agent_session_1".to_string()),
        messages: vec![Message::user(
            "I need to build a user authentication system. Can you help coordinate this across the team?",
        )],
        seed: vec![
            Task::new(
                "auth-001",
                "Research authentication best practices",
                "Research OAuth 2.0, JWT, and session management",
            ),
            Task::new(
                "auth-002",
                "Implement authentication API",
                "Build REST API endpoints for auth",
            ),
            Task::new(
                "auth-003",
                "Test authentication flow",
                "Create comprehensive test suite",
            ),
        ],
        steps: vec![
            status(),
            transfer("security_agent"),
            transfer(RoleName::RESEARCH),
            claim("auth-001"),
            ScriptStep::call(
                "create_task",
                json!({
                    "title": "Document token refresh flow",
                    "description": "Summarise refresh token rotation for the coding agent",
                    "priority": "high",
                }),
            ),
            complete("auth-001"),
            transfer(RoleName::CODING),
            claim("auth-002"),
            complete("auth-002"),
            transfer(RoleName::QA),
            claim("auth-002"),
            claim("auth-003"),
            complete("auth-002"),
            complete("auth-003"),
            transfer(RoleName::ORCHESTRATOR),
            status(),
            ScriptStep::say(
                "All authentication tasks are done; the token refresh write-up is still open.",
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanban_core::{KanbanConfig, MemorySessionStore, MessageRole, TaskState};
    use std::io::Write;

    fn store() -> MemorySessionStore {
        MemorySessionStore::new(KanbanConfig::default())
    }

    #[tokio::test]
    async fn demo_script_runs_to_completion() {
        let store = store();
        let report = run_script(&store, demo_script(), SessionId::new("demo"))
            .await
            .unwrap();

        assert_eq!(report.steps[1].text, "unknown role: security_agent");
        assert!(!report.steps[1].ok);
        assert_eq!(report.steps[1].role, RoleName::orchestrator());
        assert_eq!(report.steps.iter().filter(|s| !s.ok).count(), 1);

        let tasks = report.payload.tasks.as_ref().unwrap();
        let state = |id: &str| tasks.iter().find(|t| t.id.as_str() == id).unwrap().state;
        assert_eq!(state("auth-001"), TaskState::Done);
        assert_eq!(state("auth-002"), TaskState::Done);
        assert_eq!(state("auth-003"), TaskState::Done);
        assert_eq!(tasks.len(), 4);
        assert_eq!(report.payload.current_agent, Some(RoleName::orchestrator()));

        let status = report
            .steps
            .iter()
            .rev()
            .find(|s| s.tool == "get_board_status")
            .unwrap();
        assert!(status.text.contains("✅ DONE: 3 tasks"));
        assert!(status.text.contains("📋 TODO: 1 tasks"));

        let last = report.payload.messages.last().unwrap();
        assert_eq!(last.role, MessageRole::Assistant);
        assert_eq!(last.name.as_deref(), Some("orchestrator"));
    }

    #[tokio::test]
    async fn qa_cannot_reclaim_or_complete_coding_work() {
        let store = store();
        let report = run_script(&store, demo_script(), SessionId::new("demo"))
            .await
            .unwrap();

        let qa_steps: Vec<&StepResult> = report
            .steps
            .iter()
            .filter(|s| s.role == RoleName::qa())
            .collect();
        assert_eq!(
            qa_steps[0].text,
            "Task 'Implement authentication API' is already done"
        );
    }

    #[tokio::test]
    async fn script_file_with_raw_and_typed_steps() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "seed": [{{"id": "t1", "title": "Draft API design", "description": "…"}}],
                "steps": [
                    {{"tool": "transfer", "to": "research_agent"}},
                    {{"name": "claim_task", "arguments": {{"task_id": "t1"}}}},
                    {{"name": "transfer_to_coding_agent"}},
                    {{"tool": "complete_task", "task_id": "t1"}},
                    {{"name": "claim_task", "arguments": {{"task_id": "nonexistent"}}}},
                    {{"say": "Nothing left for me to pick up."}}
                ]
            }}"#
        )
        .unwrap();

        let script = Script::from_path(file.path()).unwrap();
        let store = store();
        let report = run_script(&store, script, SessionId::new("file"))
            .await
            .unwrap();

        let texts: Vec<&str> = report.steps.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Successfully transferred to research_agent",
                "Task 'Draft API design' claimed and moved to IN_PROGRESS",
                "Successfully transferred to coding_agent",
                "Task 'Draft API design' is assigned to research_agent, not coding_agent",
                "Task with ID nonexistent not found",
                "Nothing left for me to pick up.",
            ]
        );
        assert!(report.steps.iter().all(|s| s.ok));
        assert_eq!(report.steps[5].tool, "say");
        assert_eq!(report.steps[5].role, RoleName::coding());

        let spoken = report.payload.messages.last().unwrap();
        assert_eq!(spoken.role, MessageRole::Assistant);
        assert_eq!(spoken.name.as_deref(), Some("coding_agent"));
        assert_eq!(spoken.content, "Nothing left for me to pick up.");
    }

    #[tokio::test]
    async fn malformed_tool_call_is_recorded_not_fatal() {
        let script = Script {
            steps: vec![
                ScriptStep::call("claim_task", serde_json::json!([1, 2])),
                ScriptStep::call("get_board_status", Value::Null),
            ],
            ..Default::default()
        };
        let report = run_script(&store(), script, SessionId::new("bad"))
            .await
            .unwrap();

        assert!(!report.steps[0].ok);
        assert_eq!(report.steps[0].tool, "claim_task");
        assert!(report.steps[1].ok);
    }

    #[test]
    fn missing_script_file_has_context() {
        let err = Script::from_path(Path::new("/nonexistent/script.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read script"));
    }
}
