//! Error handlers
//!
//! Maps domain errors onto the reply codes sent to the client.

use log::error;

use crate::error::types::{
    AuthError, FtpServerError, NavigateError, StorageError, TransferError,
};
use crate::protocol::responses::{
    AUTH_FAILED, BAD_SEQUENCE, CANT_OPEN_DATA, FILE_UNAVAILABLE, LOCAL_ERROR,
};

/// Handle an FTP server error
pub fn handle_error(err: &FtpServerError) {
    error!("FTP Server Error: {}", err);
}

pub fn auth_error_code(err: &AuthError) -> u16 {
    match err {
        AuthError::InvalidCredentials(_) => AUTH_FAILED,
        AuthError::UsernameRequired | AuthError::AlreadyLoggedIn(_) | AuthError::NotLoggedIn => {
            BAD_SEQUENCE
        }
    }
}

pub fn storage_error_code(_err: &StorageError) -> u16 {
    FILE_UNAVAILABLE
}

pub fn navigate_error_code(_err: &NavigateError) -> u16 {
    FILE_UNAVAILABLE
}

pub fn transfer_error_code(err: &TransferError) -> u16 {
    match err {
        TransferError::DataChannelNotInitialized => BAD_SEQUENCE,
        TransferError::NoAvailablePort(_)
        | TransferError::AcceptTimeout(_)
        | TransferError::DataChannelSetupFailed(_) => CANT_OPEN_DATA,
        TransferError::Codec(_) | TransferError::TaskFailed(_) => LOCAL_ERROR,
    }
}

/// Convert error to FTP response code
pub fn error_to_ftp_code(err: &FtpServerError) -> u16 {
    match err {
        FtpServerError::Auth(e) => auth_error_code(e),
        FtpServerError::Storage(e) => storage_error_code(e),
        FtpServerError::Navigate(e) => navigate_error_code(e),
        FtpServerError::Transfer(e) => transfer_error_code(e),
        FtpServerError::Config(_) | FtpServerError::Io(_) => LOCAL_ERROR,
    }
}
