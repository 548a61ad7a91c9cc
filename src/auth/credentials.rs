//! Credential storage and management
//!
//! The session asks a [`CredentialOracle`] whether a username/password pair
//! may log in. [`StaticCredentials`] is an in-memory allow-list built from
//! configuration.

use std::collections::HashMap;

use crate::config::UserConfig;

/// Accounts used when the configuration does not list any.
pub const DEFAULT_USERS: [(&str, &str); 3] = [("john", "1234"), ("jane", "5678"), ("joe", "qwerty")];

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    username: String,
}

impl Identity {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

pub trait CredentialOracle: Send + Sync {
    /// Returns the identity for a matching pair, `None` otherwise.
    fn authenticate(&self, username: &str, password: &str) -> Option<Identity>;
}

#[derive(Debug, Clone)]
pub struct StaticCredentials {
    users: HashMap<String, String>,
}

impl StaticCredentials {
    pub fn new<I, U, P>(users: I) -> Self
    where
        I: IntoIterator<Item = (U, P)>,
        U: Into<String>,
        P: Into<String>,
    {
        Self {
            users: users
                .into_iter()
                .map(|(u, p)| (u.into(), p.into()))
                .collect(),
        }
    }

    pub fn from_config(users: &[UserConfig]) -> Self {
        Self::new(
            users
                .iter()
                .map(|user| (user.username.clone(), user.password.clone())),
        )
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Default for StaticCredentials {
    fn default() -> Self {
        Self::new(DEFAULT_USERS)
    }
}

impl CredentialOracle for StaticCredentials {
    fn authenticate(&self, username: &str, password: &str) -> Option<Identity> {
        match self.users.get(username) {
            Some(stored) if stored == password => Some(Identity::new(username)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_accounts() {
        let creds = StaticCredentials::default();
        assert_eq!(creds.len(), 3);
        assert_eq!(
            creds.authenticate("john", "1234"),
            Some(Identity::new("john"))
        );
        assert!(creds.authenticate("joe", "qwerty").is_some());
    }

    #[test]
    fn test_mismatch_and_unknown_user() {
        let creds = StaticCredentials::default();
        assert!(creds.authenticate("john", "wrong").is_none());
        assert!(creds.authenticate("mallory", "1234").is_none());
    }

    #[test]
    fn test_from_config() {
        let creds = StaticCredentials::from_config(&[UserConfig {
            username: "ann".into(),
            password: "pw".into(),
        }]);
        assert!(creds.authenticate("ann", "pw").is_some());
        assert!(creds.authenticate("john", "1234").is_none());
    }
}
