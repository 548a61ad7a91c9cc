//! Server core functionality
//!
//! This module contains the accept loop and the state shared by every
//! session.

pub mod context;
pub mod core;

pub use self::context::ServerContext;
pub use self::core::Server;
