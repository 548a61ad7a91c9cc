//! modal-ftp interactive client

use anyhow::{Context, Result};
use clap::Parser;
use log::error;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

use modal_ftp::client::{FtpClient, execute};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "modal-ftp-client", about = "Interactive client for modal-ftp.")]
struct Cli {
    /// Server host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server control port
    #[arg(short, long, default_value_t = 2121)]
    port: u16,

    /// Directory RETR writes into and STOR reads from
    #[arg(short, long, default_value = ".")]
    local_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut client = FtpClient::connect((cli.host.as_str(), cli.port))
        .await
        .with_context(|| format!("Failed to connect to {}:{}", cli.host, cli.port))?;
    println!("{}", client.greeting());

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    while let Some(input) = stdin.next_line().await.context("Failed to read stdin")? {
        if input.trim().is_empty() {
            continue;
        }

        match execute(&mut client, &input, &cli.local_dir).await {
            Ok(output) => {
                for reply in &output.replies {
                    println!("{}", reply);
                }
                if output.is_closed() {
                    break;
                }
            }
            Err(e) => {
                error!("{}", e);
                println!("{}", e);
                if matches!(e, modal_ftp::error::ClientError::ConnectionClosed) {
                    break;
                }
            }
        }
    }

    Ok(())
}
