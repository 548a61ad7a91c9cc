//! modal-ftp server - Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use modal_ftp::config::DEFAULT_CONFIG_PATH;
use modal_ftp::{Server, ServerConfig, ServerContext};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "modal-ftp", about = "A minimal FTP server.")]
struct Cli {
    /// Path to the configuration file (extension optional)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG overrides the default filter
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = ServerConfig::load(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config))?;

    info!("Launching FTP server...");

    let ctx = ServerContext::from_config(config).context("Failed to prepare server root")?;
    let server = Server::bind(ctx).await.context("Failed to bind control socket")?;
    server.run().await;

    Ok(())
}
