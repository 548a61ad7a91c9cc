//! Error types
//!
//! Defines domain-specific error types for each module of the FTP server.

use std::io;
use thiserror::Error;

use crate::transfer::CodecError;

/// Authentication module errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials for user: {0}")]
    InvalidCredentials(String),

    #[error("PASS received before USER")]
    UsernameRequired,

    #[error("Already logged in as {0}")]
    AlreadyLoggedIn(String),

    #[error("User not logged in")]
    NotLoggedIn,
}

/// Storage module errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Not a file: {0}")]
    NotAFile(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    /// Classifies an `io::Error` raised while touching `path`.
    pub fn from_io(path: &str, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => StorageError::FileNotFound(path.to_string()),
            io::ErrorKind::PermissionDenied => StorageError::PermissionDenied(path.to_string()),
            io::ErrorKind::AlreadyExists => StorageError::AlreadyExists(path.to_string()),
            _ => StorageError::Io {
                path: path.to_string(),
                source,
            },
        }
    }
}

/// Navigate module errors
#[derive(Debug, Error)]
pub enum NavigateError {
    #[error("Invalid path segment: {0:?}")]
    InvalidSegment(String),

    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("Already at the root directory")]
    AtRoot,
}

/// Transfer module errors
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Data channel not initialized")]
    DataChannelNotInitialized,

    #[error("No passive port could be bound after {0} attempt(s)")]
    NoAvailablePort(usize),

    #[error("Timed out waiting for data connection on port {0}")]
    AcceptTimeout(u16),

    #[error("Data channel setup failed: {0}")]
    DataChannelSetupFailed(#[source] io::Error),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Transfer task failed: {0}")]
    TaskFailed(String),
}

/// Companion client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Connection closed by server")]
    ConnectionClosed,

    #[error("Unexpected reply: {0}")]
    UnexpectedReply(String),

    #[error("Malformed PASV reply: {0}")]
    MalformedPasv(String),

    #[error("No data connection; send PASV first")]
    NoDataConnection,

    #[error("Local file error on {path}: {source}")]
    LocalFile {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error("Network error: {0}")]
    Network(#[from] io::Error),
}

/// Top-level server error
#[derive(Debug, Error)]
pub enum FtpServerError {
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Navigation error: {0}")]
    Navigate(#[from] NavigateError),

    #[error("Transfer error: {0}")]
    Transfer(#[from] TransferError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
