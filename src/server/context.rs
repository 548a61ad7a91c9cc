//! Shared server state
//!
//! Everything sessions share is read-only after startup, so it lives behind
//! one `Arc` without locks.

use std::sync::Arc;

use crate::auth::{CredentialOracle, StaticCredentials};
use crate::config::ServerConfig;
use crate::error::FtpServerError;
use crate::storage::{DiskFs, VirtualFs};

pub struct ServerContext {
    config: ServerConfig,
    credentials: Arc<dyn CredentialOracle>,
    fs: Arc<dyn VirtualFs>,
}

impl ServerContext {
    pub fn new(
        config: ServerConfig,
        credentials: Arc<dyn CredentialOracle>,
        fs: Arc<dyn VirtualFs>,
    ) -> Self {
        Self {
            config,
            credentials,
            fs,
        }
    }

    /// Builds the default collaborators: the configured allow-list and a
    /// disk filesystem at the configured root.
    pub fn from_config(config: ServerConfig) -> Result<Self, FtpServerError> {
        let credentials = Arc::new(StaticCredentials::from_config(&config.users));
        let fs = Arc::new(DiskFs::new(config.server_root_path())?);
        Ok(Self::new(config, credentials, fs))
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn credentials(&self) -> &dyn CredentialOracle {
        self.credentials.as_ref()
    }

    pub fn fs(&self) -> &dyn VirtualFs {
        self.fs.as_ref()
    }
}
