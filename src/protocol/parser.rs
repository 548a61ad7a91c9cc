//! FTP Command parsing
//!
//! Handles parsing of FTP commands from client input.

use crate::protocol::commands::{Command, CommandLine};

/// Parses a raw command line received from a client.
///
/// The line is trimmed, split on whitespace, and the first token becomes the
/// upper-cased verb. Arity is not checked here.
pub fn parse_command(raw: &str) -> CommandLine {
    let mut parts = raw.split_whitespace();
    let verb = parts.next().unwrap_or("").to_ascii_uppercase();
    let args = parts.map(str::to_string).collect();

    CommandLine {
        command: Command::from_verb(&verb),
        verb,
        args,
    }
}
