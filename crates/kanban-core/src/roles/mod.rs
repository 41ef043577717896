//! Role router: who is active, who may hand off to whom.
//!
//! # Module layout
//!
//! - [`role`] — `RoleName`, `RoleTemplate`, `HandoffTargets`, `ToolSpec`
//! - [`error`] — `RoleError`, `RoleResult`
//! - [`router`] — `RoleRouter`, `TransferRecord`

pub mod error;
pub mod role;
pub mod router;

pub use error::{RoleError, RoleResult};
pub use role::{HandoffTargets, RoleName, RoleTemplate, ToolSpec, BOARD_TOOLS};
pub use router::{is_open_template, RoleRouter, TransferRecord};
