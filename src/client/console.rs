//! Console command interpretation
//!
//! Turns a line typed by the user into the client calls that implement it.
//! Transfer commands read and write files under a local directory; anything
//! else is sent to the server verbatim.

use std::path::Path;

use crate::client::connection::{FtpClient, ServerReply};
use crate::error::ClientError;
use crate::protocol::parse_command;
use crate::protocol::responses::{GOODBYE, LOGIN_SUCCESS};
use crate::protocol::Command;

/// Replies produced by one console line, in the order received.
#[derive(Debug, Default)]
pub struct ConsoleOutput {
    pub replies: Vec<ServerReply>,
}

impl ConsoleOutput {
    /// True once the server has said goodbye.
    pub fn is_closed(&self) -> bool {
        self.replies.iter().any(|reply| reply.is(GOODBYE))
    }
}

/// Runs one console line against the server.
pub async fn execute(
    client: &mut FtpClient,
    input: &str,
    local_dir: &Path,
) -> Result<ConsoleOutput, ClientError> {
    let line = parse_command(input);
    let mut output = ConsoleOutput::default();

    match (line.command, line.arg(0)) {
        (Command::RETR, Some(name)) if line.has_valid_arity() => {
            output
                .replies
                .push(client.retrieve(name, &local_dir.join(name)).await?);
        }
        (Command::STOR, Some(name)) if line.has_valid_arity() => {
            output
                .replies
                .push(client.store(&local_dir.join(name), name).await?);
        }
        (Command::PASV, None) => output.replies.push(client.passive().await?),
        (Command::LIST, None) => output.replies.push(client.list().await?),
        (Command::HELP, None) => output.replies.push(client.help().await?),
        (Command::TYPE | Command::MODE | Command::STRU, Some(code)) if line.has_valid_arity() => {
            output
                .replies
                .push(client.set_parameter(&line.verb, code).await?);
        }
        _ => {
            let reply = client.command(input.trim()).await?;
            let logged_in = line.command == Command::PASS && reply.is(LOGIN_SUCCESS);
            output.replies.push(reply);
            if logged_in {
                output.replies.extend(client.after_login().await?);
            }
        }
    }

    Ok(output)
}
