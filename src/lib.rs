//! modal-ftp
//!
//! A minimal FTP control/data engine: an async server with per-connection
//! sessions, passive data channels and a transfer codec supporting Stream,
//! Block and Compressed modes, plus a companion client.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod navigate;
pub mod protocol;
pub mod server;
pub mod session;
pub mod storage;
pub mod transfer;

pub use config::ServerConfig;
pub use server::{Server, ServerContext};
