//! Companion FTP client
//!
//! An async client for the same protocol, used by the interactive
//! `modal-ftp-client` binary and by the integration tests.

pub mod connection;
pub mod console;

pub use connection::{FtpClient, ServerReply};
pub use console::{ConsoleOutput, execute};
