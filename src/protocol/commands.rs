//! Module `command`
//!
//! Defines the FTP command set, the parsed form of a command line and the
//! result type returned by command handlers.

use crate::protocol::responses::Reply;

/// Represents an FTP command verb recognised by the server.
///
/// Arguments travel separately in [`CommandLine`] so arity can be checked at
/// dispatch time, after the session state has been considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    USER,
    PASS,
    QUIT,
    PWD,
    CWD,
    CDUP,
    MKD,
    RMD,
    DELE,
    LIST,
    HELP,
    TYPE,
    MODE,
    STRU,
    PASV,
    RETR,
    STOR,
    UNKNOWN,
}

impl Command {
    /// Every implemented command, in the order HELP lists them.
    pub const IMPLEMENTED: [Command; 17] = [
        Command::USER,
        Command::PASS,
        Command::PWD,
        Command::CWD,
        Command::CDUP,
        Command::MKD,
        Command::RMD,
        Command::PASV,
        Command::LIST,
        Command::RETR,
        Command::DELE,
        Command::STOR,
        Command::HELP,
        Command::TYPE,
        Command::MODE,
        Command::STRU,
        Command::QUIT,
    ];

    /// Maps an upper-cased verb onto a command.
    pub fn from_verb(verb: &str) -> Self {
        match verb {
            "USER" => Command::USER,
            "PASS" => Command::PASS,
            "QUIT" => Command::QUIT,
            "PWD" => Command::PWD,
            "CWD" => Command::CWD,
            "CDUP" => Command::CDUP,
            "MKD" => Command::MKD,
            "RMD" => Command::RMD,
            "DELE" => Command::DELE,
            "LIST" => Command::LIST,
            "HELP" => Command::HELP,
            "TYPE" => Command::TYPE,
            "MODE" => Command::MODE,
            "STRU" => Command::STRU,
            "PASV" => Command::PASV,
            "RETR" => Command::RETR,
            "STOR" => Command::STOR,
            _ => Command::UNKNOWN,
        }
    }

    /// Exact number of arguments the command takes.
    pub fn arity(&self) -> usize {
        match self {
            Command::USER
            | Command::PASS
            | Command::CWD
            | Command::MKD
            | Command::RMD
            | Command::DELE
            | Command::RETR
            | Command::STOR
            | Command::TYPE
            | Command::MODE
            | Command::STRU => 1,
            _ => 0,
        }
    }

    /// Commands processed before the session is authenticated.
    pub fn allowed_before_login(&self) -> bool {
        matches!(self, Command::USER | Command::PASS | Command::QUIT)
    }

    /// One-line usage shown by HELP.
    pub fn usage(&self) -> &'static str {
        match self {
            Command::USER => "USER [user]       - Specify user for authentication",
            Command::PASS => "PASS [pass]       - Specify password for authentication",
            Command::PWD => "PWD               - Print working directory",
            Command::CWD => "CWD [dir]         - Change working directory",
            Command::CDUP => "CDUP              - Change to the parent directory",
            Command::MKD => "MKD [dir]         - Make directory",
            Command::RMD => "RMD [dir]         - Remove directory",
            Command::PASV => "PASV              - Enter passive mode for data transfer",
            Command::LIST => "LIST              - List files in the current directory",
            Command::RETR => "RETR [file name]  - Retrieve a file from the server",
            Command::DELE => "DELE [file name]  - Delete a file",
            Command::STOR => "STOR [file name]  - Store a file on the server",
            Command::HELP => "HELP              - Display available commands",
            Command::TYPE => "TYPE [A or I]     - Set transfer type (ASCII or binary)",
            Command::MODE => "MODE [S, B, or C] - Set transfer mode (Stream, Block, or Compressed)",
            Command::STRU => "STRU [F, R, or P] - Set file structure (File, Record, or Page)",
            Command::QUIT => "QUIT              - Terminate the FTP session",
            Command::UNKNOWN => "",
        }
    }
}

/// A command line split into its verb and arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub command: Command,
    /// Verb as sent by the client, upper-cased.
    pub verb: String,
    pub args: Vec<String>,
}

impl CommandLine {
    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// True when the argument count matches the command's arity exactly.
    pub fn has_valid_arity(&self) -> bool {
        self.args.len() == self.command.arity()
    }
}

/// Represents the outcome status of executing a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    Failure(String),
    CloseConnection,
}

/// Struct encapsulating the full result of a command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub reply: Option<Reply>,
}

impl CommandResult {
    pub fn success(reply: Reply) -> Self {
        Self {
            status: CommandStatus::Success,
            reply: Some(reply),
        }
    }

    pub fn failure(reply: Reply) -> Self {
        let reason = match &reply {
            Reply::Single { text, .. } => text.clone(),
            Reply::Multi { closing_text, .. } => closing_text.clone(),
        };
        Self {
            status: CommandStatus::Failure(reason),
            reply: Some(reply),
        }
    }

    pub fn close(reply: Reply) -> Self {
        Self {
            status: CommandStatus::CloseConnection,
            reply: Some(reply),
        }
    }
}
