//! Authentication validator
//!
//! Input checks applied before a login attempt reaches the credential
//! oracle.

use log::{info, warn};

use super::credentials::{CredentialOracle, Identity};
use crate::error::AuthError;

/// Longest username or password accepted.
pub const MAX_CREDENTIAL_LENGTH: usize = 64;

/// Performs basic input sanitation to check for malicious or malformed usernames/passwords.
pub fn is_valid_input(input: &str, max_length: usize) -> bool {
    !input.trim().is_empty() && input.len() <= max_length && !input.contains(['\r', '\n', '\0'])
}

/// Checks a username/password pair against the oracle.
pub fn validate_login(
    oracle: &dyn CredentialOracle,
    username: &str,
    password: &str,
) -> Result<Identity, AuthError> {
    let well_formed = is_valid_input(username, MAX_CREDENTIAL_LENGTH)
        && is_valid_input(password, MAX_CREDENTIAL_LENGTH);
    if !well_formed {
        warn!("Rejected malformed login for user {:?}", username);
        return Err(AuthError::InvalidCredentials(username.to_string()));
    }

    match oracle.authenticate(username, password) {
        Some(identity) => {
            info!("User {} authenticated", identity.username());
            Ok(identity)
        }
        _ => {
            warn!("Failed login attempt for user {:?}", username);
            Err(AuthError::InvalidCredentials(username.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticCredentials;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_is_valid_input() {
        assert!(is_valid_input("john", 64));
        assert!(!is_valid_input("   ", 64));
        assert!(!is_valid_input("a\0b", 64));
        assert!(!is_valid_input(&"x".repeat(65), 64));
    }

    /// Accepts everything and counts how often it was asked.
    #[derive(Default)]
    struct CountingOracle {
        calls: AtomicUsize,
    }

    impl CredentialOracle for CountingOracle {
        fn authenticate(&self, username: &str, _password: &str) -> Option<Identity> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Some(Identity::new(username))
        }
    }

    #[test]
    fn test_malformed_input_never_reaches_oracle() {
        let oracle = CountingOracle::default();

        assert!(validate_login(&oracle, "john", "").is_err());
        assert!(validate_login(&oracle, &"x".repeat(65), "pw").is_err());
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 0);

        assert!(validate_login(&oracle, "john", "pw").is_ok());
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_validate_login() {
        let creds = StaticCredentials::default();
        assert_eq!(
            validate_login(&creds, "jane", "5678").unwrap().username(),
            "jane"
        );
        assert!(matches!(
            validate_login(&creds, "jane", "nope"),
            Err(AuthError::InvalidCredentials(_))
        ));
    }
}
