//! Session context: the board and router of one exchange, its shared
//! message history, the driver-facing command surface and the store that
//! keeps sessions isolated.

pub mod command;
pub mod context;
pub mod message;
pub mod payload;
pub mod store;

pub use command::{Handoff, ToolCommand, ToolReply, TRANSFER_PREFIX};
pub use context::{Session, SessionId};
pub use message::{Message, MessageRole};
pub use payload::SessionPayload;
pub use store::{MemorySessionStore, SessionStore, SharedSession};
