//! Authentication system
//!
//! Handles the credential oracle seam and login validation.

pub mod credentials;
pub mod validator;

pub use credentials::{CredentialOracle, DEFAULT_USERS, Identity, StaticCredentials};
pub use validator::{is_valid_input, validate_login};
