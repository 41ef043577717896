//! Task board: task lifecycle, tagged outcomes and status rendering.
//!
//! A task is created `Todo`, moves to `InProgress` only through
//! [`Board::claim_task`], and to `Done` only through
//! [`Board::complete_task`] by its assignee. Nothing deletes a task.

pub mod error;
pub mod kanban;
pub mod outcome;
pub mod status;
pub mod task;

pub use error::{BoardError, BoardResult};
pub use kanban::{Board, TaskIdStrategy};
pub use outcome::{TaskOutcome, TaskUpdate, TransitionRejection};
pub use status::{render_board_status, BoardStats};
pub use task::{Task, TaskId, TaskState, DEFAULT_PRIORITY};
