//! Kanban hand-off core
//!
//! A shared task board and a role router for multi-agent sessions. An
//! external driver picks the active role, relays that role's tool calls
//! into a [`Session`], and resumes at whichever role a hand-off names.
//! Nothing here calls a model, schedules work or persists state.

pub mod board;
pub mod config;
pub mod error;
pub mod metrics;
pub mod obs;
pub mod roles;
pub mod session;
pub mod telemetry;

pub use board::{
    render_board_status, Board, BoardError, BoardResult, BoardStats, Task, TaskId,
    TaskIdStrategy, TaskOutcome, TaskState, TaskUpdate, TransitionRejection, DEFAULT_PRIORITY,
};
pub use config::KanbanConfig;
pub use error::{KanbanError, KanbanResult};
pub use roles::{
    HandoffTargets, RoleError, RoleName, RoleResult, RoleRouter, RoleTemplate, ToolSpec,
    TransferRecord,
};
pub use session::{
    Handoff, MemorySessionStore, Message, MessageRole, Session, SessionId, SessionPayload,
    SessionStore, SharedSession, ToolCommand, ToolReply,
};

pub use metrics::METRICS;
pub use obs::SessionSpan;
pub use telemetry::init_tracing;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
