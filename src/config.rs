//! Configuration management for modal-ftp
//!
//! Values come from an optional TOML file and are then overridden by
//! `MODAL_FTP_` prefixed environment variables. Every key has a default, so
//! the server starts without any file at all.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::net::Ipv4Addr;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use crate::auth::DEFAULT_USERS;

/// Default configuration file, looked up relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config";

/// One entry of the login allow-list.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct UserConfig {
    pub username: String,
    pub password: String,
}

/// Complete server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    // ═══ NETWORK ═══
    /// IP address to bind the FTP control connection
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Port for FTP control connection
    #[serde(default = "default_control_port")]
    pub control_port: u16,

    /// Address advertised in 227 replies when the control socket is not IPv4
    #[serde(default = "default_pasv_address")]
    pub pasv_address: Ipv4Addr,

    /// Inclusive port range for PASV data connections
    #[serde(default = "default_pasv_port_min")]
    pub pasv_port_min: u16,
    #[serde(default = "default_pasv_port_max")]
    pub pasv_port_max: u16,

    /// Random ports tried before PASV gives up with 425
    #[serde(default = "default_pasv_bind_attempts")]
    pub pasv_bind_attempts: usize,

    /// How long PASV waits for the client to connect
    #[serde(default = "default_pasv_accept_timeout_secs")]
    pub pasv_accept_timeout_secs: u64,

    // ═══ TRANSFERS ═══
    /// Root directory for FTP operations
    #[serde(default = "default_server_root")]
    pub server_root: String,

    /// A data connection idle this long fails the transfer
    #[serde(default = "default_data_idle_timeout_secs")]
    pub data_idle_timeout_secs: u64,

    /// Chunk size for file transfers
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    // ═══ PROTOCOL ═══
    /// Maximum FTP command length
    #[serde(default = "default_max_command_length")]
    pub max_command_length: usize,

    /// Text of the 220 greeting
    #[serde(default = "default_greeting")]
    pub greeting: String,

    #[serde(default = "default_users")]
    pub users: Vec<UserConfig>,
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_control_port() -> u16 {
    2121
}

fn default_pasv_address() -> Ipv4Addr {
    Ipv4Addr::LOCALHOST
}

fn default_pasv_port_min() -> u16 {
    49152
}

fn default_pasv_port_max() -> u16 {
    65535
}

fn default_pasv_bind_attempts() -> usize {
    16
}

fn default_pasv_accept_timeout_secs() -> u64 {
    30
}

fn default_server_root() -> String {
    "./server_root".to_string()
}

fn default_data_idle_timeout_secs() -> u64 {
    60
}

fn default_buffer_size() -> usize {
    8192
}

fn default_max_command_length() -> usize {
    512
}

fn default_greeting() -> String {
    "Welcome to modal-ftp".to_string()
}

fn default_users() -> Vec<UserConfig> {
    DEFAULT_USERS
        .iter()
        .map(|(username, password)| UserConfig {
            username: username.to_string(),
            password: password.to_string(),
        })
        .collect()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            control_port: default_control_port(),
            pasv_address: default_pasv_address(),
            pasv_port_min: default_pasv_port_min(),
            pasv_port_max: default_pasv_port_max(),
            pasv_bind_attempts: default_pasv_bind_attempts(),
            pasv_accept_timeout_secs: default_pasv_accept_timeout_secs(),
            server_root: default_server_root(),
            data_idle_timeout_secs: default_data_idle_timeout_secs(),
            buffer_size: default_buffer_size(),
            max_command_length: default_max_command_length(),
            greeting: default_greeting(),
            users: default_users(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `path` (extension optional, file optional)
    /// with environment overrides
    pub fn load(path: &str) -> Result<Self, config::ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("MODAL_FTP").try_parsing(true))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.control_port == 0 {
            return Err(config::ConfigError::Message(
                "Control port cannot be 0".into(),
            ));
        }

        if self.pasv_port_min == 0 || self.pasv_port_min > self.pasv_port_max {
            return Err(config::ConfigError::Message(
                "pasv_port_min must be non-zero and not above pasv_port_max".into(),
            ));
        }

        if self.pasv_bind_attempts == 0 {
            return Err(config::ConfigError::Message(
                "pasv_bind_attempts must be greater than 0".into(),
            ));
        }

        if self.pasv_accept_timeout_secs == 0 || self.data_idle_timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "timeouts must be greater than 0".into(),
            ));
        }

        if self.buffer_size == 0 || self.buffer_size > u16::MAX as usize {
            return Err(config::ConfigError::Message(
                "buffer_size must be between 1 and 65535".into(),
            ));
        }

        if self.max_command_length == 0 {
            return Err(config::ConfigError::Message(
                "max_command_length must be greater than 0".into(),
            ));
        }

        if self.server_root.is_empty() {
            return Err(config::ConfigError::Message(
                "server_root cannot be empty".into(),
            ));
        }

        Ok(())
    }

    /// Get bind address and control port as socket address
    pub fn control_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.control_port)
    }

    /// Get data port range for PASV mode
    pub fn pasv_port_range(&self) -> RangeInclusive<u16> {
        self.pasv_port_min..=self.pasv_port_max
    }

    /// Get server root as PathBuf
    pub fn server_root_path(&self) -> PathBuf {
        PathBuf::from(&self.server_root)
    }

    pub fn pasv_accept_timeout(&self) -> Duration {
        Duration::from_secs(self.pasv_accept_timeout_secs)
    }

    pub fn data_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.data_idle_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_defaults_are_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pasv_port_range(), 49152..=65535);
        assert_eq!(config.users.len(), 3);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = ServerConfig::load("/nonexistent/modal-ftp-config").unwrap();
        assert_eq!(config.buffer_size, 8192);
        assert_eq!(config.max_command_length, 512);
    }

    #[test]
    fn test_file_values_override_defaults() {
        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "control_port = 3021\nbuffer_size = 1024\n[[users]]\nusername = \"ann\"\npassword = \"pw\""
        )
        .unwrap();

        let config = ServerConfig::load(file.path().to_str().unwrap()).unwrap();

        assert_eq!(config.control_port, 3021);
        assert_eq!(config.buffer_size, 1024);
        assert_eq!(
            config.users,
            vec![UserConfig {
                username: "ann".into(),
                password: "pw".into()
            }]
        );
    }

    #[test]
    fn test_inverted_port_range_is_rejected() {
        let config = ServerConfig {
            pasv_port_min: 60000,
            pasv_port_max: 50000,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_buffer_is_rejected() {
        let config = ServerConfig {
            buffer_size: 70_000,
            ..ServerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
