//! Inbound tool commands and the replies handed back to the driver.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::board::{TaskId, TaskOutcome};
use crate::error::{KanbanError, KanbanResult};
use crate::roles::{RoleName, TransferRecord};
use crate::session::payload::SessionPayload;

/// Prefix of every hand-off tool name.
pub const TRANSFER_PREFIX: &str = "transfer_to_";

/// A request issued by the active role through the driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum ToolCommand {
    CreateTask {
        title: String,
        description: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        priority: Option<String>,
    },
    ClaimTask {
        task_id: String,
    },
    CompleteTask {
        task_id: String,
    },
    GetBoardStatus,
    Transfer {
        to: RoleName,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tool_call_id: Option<String>,
    },
}

impl ToolCommand {
    /// Build a command from a tool name and its JSON arguments, the shape a
    /// model's tool call arrives in.
    ///
    /// `transfer_to_<role>` maps to [`ToolCommand::Transfer`]; an optional
    /// `tool_call_id` argument is carried into the acknowledgment.
    pub fn from_tool_call(name: &str, arguments: Value) -> KanbanResult<Self> {
        let mut object = match arguments {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(KanbanError::InvalidToolCall {
                    tool: name.to_string(),
                    reason: format!("arguments must be an object, got {other}"),
                })
            }
        };

        if let Some(target) = name.strip_prefix(TRANSFER_PREFIX) {
            if target.is_empty() {
                return Err(KanbanError::InvalidToolCall {
                    tool: name.to_string(),
                    reason: "missing target role".to_string(),
                });
            }
            let tool_call_id = object
                .get("tool_call_id")
                .and_then(Value::as_str)
                .map(str::to_string);
            return Ok(ToolCommand::Transfer {
                to: RoleName::new(target),
                tool_call_id,
            });
        }

        object.insert("tool".to_string(), Value::String(name.to_string()));
        serde_json::from_value(Value::Object(object)).map_err(|e| KanbanError::InvalidToolCall {
            tool: name.to_string(),
            reason: e.to_string(),
        })
    }

    /// Tool name as a driver would present it.
    pub fn tool_name(&self) -> String {
        match self {
            ToolCommand::CreateTask { .. } => "create_task".to_string(),
            ToolCommand::ClaimTask { .. } => "claim_task".to_string(),
            ToolCommand::CompleteTask { .. } => "complete_task".to_string(),
            ToolCommand::GetBoardStatus => "get_board_status".to_string(),
            ToolCommand::Transfer { to, .. } => to.handoff_tool_name(),
        }
    }
}

/// Transfer signal: resume the exchange at `goto` with `payload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Handoff {
    pub goto: RoleName,
    pub record: TransferRecord,
    pub payload: SessionPayload,
}

/// Outbound result of a dispatched command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reply", rename_all = "snake_case")]
pub enum ToolReply {
    Created { task_id: TaskId, text: String },
    Task { outcome: TaskOutcome, text: String },
    Status { text: String },
    Transfer(Handoff),
}

impl ToolReply {
    /// Human-readable text relayed to the acting role.
    pub fn text(&self) -> &str {
        match self {
            ToolReply::Created { text, .. }
            | ToolReply::Task { text, .. }
            | ToolReply::Status { text } => text,
            ToolReply::Transfer(handoff) => &handoff.record.message,
        }
    }

    pub fn outcome(&self) -> Option<&TaskOutcome> {
        match self {
            ToolReply::Task { outcome, .. } => Some(outcome),
            _ => None,
        }
    }

    pub fn handoff(&self) -> Option<&Handoff> {
        match self {
            ToolReply::Transfer(handoff) => Some(handoff),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_tool_call_parses_create_task() {
        let cmd = ToolCommand::from_tool_call(
            "create_task",
            json!({"title": "Draft API design", "description": "Draft it"}),
        )
        .unwrap();
        assert_eq!(
            cmd,
            ToolCommand::CreateTask {
                title: "Draft API design".to_string(),
                description: "Draft it".to_string(),
                priority: None,
            }
        );
    }

    #[test]
    fn test_from_tool_call_parses_transfer_tool() {
        let cmd = ToolCommand::from_tool_call(
            "transfer_to_qa_agent",
            json!({"tool_call_id": "call_42"}),
        )
        .unwrap();
        assert_eq!(
            cmd,
            ToolCommand::Transfer {
                to: RoleName::qa(),
                tool_call_id: Some("call_42".to_string()),
            }
        );
        assert_eq!(cmd.tool_name(), "transfer_to_qa_agent");
    }

    #[test]
    fn test_from_tool_call_accepts_null_arguments() {
        let cmd = ToolCommand::from_tool_call("get_board_status", Value::Null).unwrap();
        assert_eq!(cmd, ToolCommand::GetBoardStatus);
    }

    #[test]
    fn test_from_tool_call_rejects_unknown_tool() {
        let err = ToolCommand::from_tool_call("delete_task", json!({"task_id": "t1"})).unwrap_err();
        assert!(matches!(err, KanbanError::InvalidToolCall { .. }));
    }

    #[test]
    fn test_from_tool_call_rejects_missing_arguments() {
        let err = ToolCommand::from_tool_call("claim_task", json!({})).unwrap_err();
        assert!(matches!(err, KanbanError::InvalidToolCall { .. }));
    }

    #[test]
    fn test_script_json_shape() {
        let cmd: ToolCommand =
            serde_json::from_value(json!({"tool": "transfer", "to": "coding_agent"})).unwrap();
        assert_eq!(
            cmd,
            ToolCommand::Transfer {
                to: RoleName::coding(),
                tool_call_id: None,
            }
        );
    }
}
