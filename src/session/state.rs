//! Module `session`
//!
//! Defines the `Session` struct holding everything one control connection
//! knows: authentication progress, working directory, transfer parameters
//! and the pending passive data channel.

use std::net::SocketAddr;

use crate::auth::Identity;
use crate::navigate::VirtualPath;
use crate::transfer::{DataType, FileStructure, PassiveChannel, TransferMode, TransferParams};

/// Authentication progress of a session.
///
/// The identity only exists once the session is authenticated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    UsernameGiven(String),
    Authenticated(Identity),
}

/// Represents the state of one control connection.
#[derive(Debug)]
pub struct Session {
    auth: AuthState,
    working_path: VirtualPath,
    params: TransferParams,
    passive: Option<PassiveChannel>,
    peer: SocketAddr,
    local_addr: SocketAddr,
}

impl Session {
    pub fn new(peer: SocketAddr, local_addr: SocketAddr) -> Self {
        Self {
            auth: AuthState::Unauthenticated,
            working_path: VirtualPath::root(),
            params: TransferParams::default(),
            passive: None,
            peer,
            local_addr,
        }
    }

    // --------------------
    // Getter methods
    // --------------------

    pub fn auth(&self) -> &AuthState {
        &self.auth
    }

    /// Returns whether the session has passed USER/PASS.
    pub fn is_logged_in(&self) -> bool {
        matches!(self.auth, AuthState::Authenticated(_))
    }

    pub fn identity(&self) -> Option<&Identity> {
        match &self.auth {
            AuthState::Authenticated(identity) => Some(identity),
            _ => None,
        }
    }

    /// Username given by USER and awaiting PASS.
    pub fn pending_username(&self) -> Option<&str> {
        match &self.auth {
            AuthState::UsernameGiven(name) => Some(name),
            _ => None,
        }
    }

    pub fn working_path(&self) -> &VirtualPath {
        &self.working_path
    }

    pub fn params(&self) -> TransferParams {
        self.params
    }

    pub fn has_passive(&self) -> bool {
        self.passive.is_some()
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }

    /// Local address of the control connection.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    // --------------------
    // Setter methods
    // --------------------

    pub fn set_username(&mut self, username: String) {
        self.auth = AuthState::UsernameGiven(username);
    }

    pub fn login(&mut self, identity: Identity) {
        self.auth = AuthState::Authenticated(identity);
    }

    /// Drops any pending username after a failed PASS.
    pub fn reset_auth(&mut self) {
        self.auth = AuthState::Unauthenticated;
    }

    pub fn set_working_path(&mut self, path: VirtualPath) {
        self.working_path = path;
    }

    pub fn set_mode(&mut self, mode: TransferMode) {
        self.params.mode = mode;
    }

    pub fn set_data_type(&mut self, data_type: DataType) {
        self.params.data_type = data_type;
    }

    pub fn set_structure(&mut self, structure: FileStructure) {
        self.params.structure = structure;
    }

    /// Records a freshly accepted data channel, returning the one it replaces.
    pub fn set_passive(&mut self, channel: PassiveChannel) -> Option<PassiveChannel> {
        self.passive.replace(channel)
    }

    /// Hands the data channel to a transfer; it is never reused.
    pub fn take_passive(&mut self) -> Option<PassiveChannel> {
        self.passive.take()
    }

    /// Closes any pending data channel.
    pub fn clear_passive(&mut self) {
        self.passive = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        let addr: SocketAddr = "127.0.0.1:2121".parse().unwrap();
        Session::new(addr, addr)
    }

    #[test]
    fn test_new_session_defaults() {
        let s = session();
        assert_eq!(s.auth(), &AuthState::Unauthenticated);
        assert!(s.working_path().is_root());
        assert_eq!(s.params(), TransferParams::default());
        assert!(!s.has_passive());
    }

    #[test]
    fn test_auth_transitions() {
        let mut s = session();
        s.set_username("john".into());
        assert_eq!(s.pending_username(), Some("john"));
        assert!(s.identity().is_none());

        s.login(Identity::new("john"));
        assert!(s.is_logged_in());
        assert_eq!(s.identity().map(Identity::username), Some("john"));
        assert!(s.pending_username().is_none());

        s.reset_auth();
        assert!(!s.is_logged_in());
    }

    #[test]
    fn test_parameter_setters_are_independent() {
        let mut s = session();
        s.set_mode(TransferMode::Block);
        s.set_data_type(DataType::Ascii);

        let params = s.params();
        assert_eq!(params.mode, TransferMode::Block);
        assert_eq!(params.data_type, DataType::Ascii);
        assert_eq!(params.structure, FileStructure::File);
    }
}
