//! Session management
//!
//! Per-connection state and the task that drives one control connection.

pub mod handler;
pub mod state;

pub use handler::{LineRead, handle_session, read_command_line};
pub use state::{AuthState, Session};
