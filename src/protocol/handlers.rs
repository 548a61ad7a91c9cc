//! Command handlers module for the modal-ftp server.
//!
//! This module defines handler functions for FTP commands, handling
//! authentication, directory management, transfer parameters, passive data
//! channel setup and file transfers for one session.

use log::{debug, error, info, warn};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::auth;
use crate::error::{
    AuthError, FtpServerError, StorageError, TransferError, error_to_ftp_code,
};
use crate::navigate::{self, VirtualPath};
use crate::protocol::commands::{Command, CommandLine, CommandResult, CommandStatus};
use crate::protocol::responses::*;
use crate::server::ServerContext;
use crate::session::Session;
use crate::transfer::{
    DataType, FileStructure, TransferJob, TransferMode, accept_one, advertised_ip,
    bind_passive_listener, format_pasv_reply,
};

/// Writes a reply to the control channel and flushes it.
pub async fn write_reply<W>(writer: &mut W, reply: &Reply) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(reply.to_wire().as_bytes()).await?;
    writer.flush().await
}

/// Dispatches a received FTP command to its corresponding handler.
///
/// # Arguments
///
/// * `session` - State of the connection that sent the command.
/// * `line` - The parsed command line.
/// * `ctx` - Shared configuration, credentials and filesystem.
/// * `writer` - Control channel, used for replies sent before the final one
///   (227 during PASV, 150 before a transfer).
///
/// # Returns
///
/// * `CommandResult` - The final reply and whether the session continues.
///   An `Err` means the control channel itself failed.
pub async fn handle_command<W>(
    session: &mut Session,
    line: &CommandLine,
    ctx: &ServerContext,
    writer: &mut W,
) -> std::io::Result<CommandResult>
where
    W: AsyncWrite + Unpin,
{
    if !session.is_logged_in() && !line.command.allowed_before_login() {
        debug!("Rejected {:?} from unauthenticated {}", line.verb, session.peer());
        return Ok(bad_sequence(AuthError::NotLoggedIn));
    }

    let result = match line.command {
        Command::USER => handle_cmd_user(session, line),
        Command::PASS => handle_cmd_pass(session, line, ctx),
        Command::QUIT => handle_cmd_quit(session, line),
        Command::PWD => handle_cmd_pwd(session, line),
        Command::CWD => handle_cmd_cwd(session, line, ctx),
        Command::CDUP => handle_cmd_cdup(session, line),
        Command::MKD => handle_cmd_mkd(session, line, ctx),
        Command::RMD => handle_cmd_rmd(session, line, ctx),
        Command::DELE => handle_cmd_dele(session, line, ctx),
        Command::LIST => handle_cmd_list(session, line, ctx),
        Command::HELP => handle_cmd_help(line),
        Command::TYPE => handle_cmd_type(session, line),
        Command::MODE => handle_cmd_mode(session, line),
        Command::STRU => handle_cmd_stru(session, line),
        Command::PASV => handle_cmd_pasv(session, line, ctx, writer).await?,
        Command::RETR => handle_cmd_retr(session, line, ctx, writer).await?,
        Command::STOR => handle_cmd_stor(session, line, ctx, writer).await?,
        Command::UNKNOWN => handle_cmd_unknown(line),
    };

    Ok(result)
}

/// Failure reply whose code comes from the error mapping.
fn refuse(err: impl Into<FtpServerError>, text: &str) -> CommandResult {
    CommandResult::failure(Reply::new(error_to_ftp_code(&err.into()), text))
}

fn bad_sequence(err: impl Into<FtpServerError>) -> CommandResult {
    refuse(err, "Bad sequence of commands")
}

fn already_logged_in(session: &Session) -> Option<AuthError> {
    session
        .identity()
        .map(|identity| AuthError::AlreadyLoggedIn(identity.username().to_string()))
}

fn syntax_error() -> CommandResult {
    CommandResult::failure(Reply::new(
        ARGUMENT_ERROR,
        "Syntax error in parameters or arguments",
    ))
}

/// Handles the USER command: records the username and asks for a password.
fn handle_cmd_user(session: &mut Session, line: &CommandLine) -> CommandResult {
    if let Some(err) = already_logged_in(session) {
        return bad_sequence(err);
    }
    let Some(username) = line.arg(0).filter(|_| line.has_valid_arity()) else {
        return syntax_error();
    };

    session.set_username(username.to_string());
    CommandResult::success(Reply::new(
        PASSWORD_REQUIRED,
        "User name okay, need password",
    ))
}

/// Handles the PASS command: checks the pair against the credential oracle.
///
/// A mismatch sends the session back to the unauthenticated state.
fn handle_cmd_pass(session: &mut Session, line: &CommandLine, ctx: &ServerContext) -> CommandResult {
    let Some(username) = session.pending_username().map(str::to_string) else {
        return bad_sequence(already_logged_in(session).unwrap_or(AuthError::UsernameRequired));
    };
    let Some(password) = line.arg(0).filter(|_| line.has_valid_arity()) else {
        return syntax_error();
    };

    match auth::validate_login(ctx.credentials(), &username, password) {
        Ok(identity) => {
            info!("Client {} logged in as {}", session.peer(), identity.username());
            session.login(identity);
            CommandResult::success(Reply::new(LOGIN_SUCCESS, "User logged in, proceed"))
        }
        Err(e) => {
            warn!("Login failed for {}: {}", session.peer(), e);
            session.reset_auth();
            refuse(e, "Not logged in")
        }
    }
}

/// Handles the QUIT command: signals connection close.
fn handle_cmd_quit(session: &mut Session, line: &CommandLine) -> CommandResult {
    if !line.has_valid_arity() {
        return syntax_error();
    }
    session.clear_passive();
    CommandResult::close(Reply::new(GOODBYE, "Goodbye."))
}

fn handle_cmd_pwd(session: &Session, line: &CommandLine) -> CommandResult {
    if !line.has_valid_arity() {
        return syntax_error();
    }
    CommandResult::success(Reply::new(
        PATH_CREATED,
        format!("\"{}\" is the current directory", session.working_path()),
    ))
}

fn handle_cmd_cwd(session: &mut Session, line: &CommandLine, ctx: &ServerContext) -> CommandResult {
    let Some(target) = line.arg(0).filter(|_| line.has_valid_arity()) else {
        return syntax_error();
    };

    match navigate::change_directory(ctx.fs(), session.working_path(), target) {
        Ok(next) => {
            info!("Client {} changed directory to {}", session.peer(), next);
            session.set_working_path(next);
            CommandResult::success(Reply::new(FILE_ACTION_OK, "Directory successfully changed"))
        }
        Err(e) => {
            debug!("CWD {:?} refused: {}", target, e);
            refuse(e, "Directory not found")
        }
    }
}

fn handle_cmd_cdup(session: &mut Session, line: &CommandLine) -> CommandResult {
    if !line.has_valid_arity() {
        return syntax_error();
    }

    match navigate::change_to_parent(session.working_path()) {
        Ok(parent) => {
            session.set_working_path(parent);
            CommandResult::success(Reply::new(OK, "CDUP command successful"))
        }
        Err(e) => refuse(e, "Cannot change to parent directory"),
    }
}

fn handle_cmd_mkd(session: &Session, line: &CommandLine, ctx: &ServerContext) -> CommandResult {
    let Some(name) = line.arg(0).filter(|_| line.has_valid_arity()) else {
        return syntax_error();
    };

    let created = session
        .working_path()
        .child(name)
        .map_err(FtpServerError::from)
        .and_then(|path| {
            ctx.fs()
                .create_directory(&path)
                .map(|_| path)
                .map_err(FtpServerError::from)
        });

    match created {
        Ok(path) => CommandResult::success(Reply::new(
            PATH_CREATED,
            format!("\"{}\" created successfully", path),
        )),
        Err(e) => {
            debug!("MKD {:?} failed: {}", name, e);
            refuse(e, "Failed to create directory")
        }
    }
}

fn handle_cmd_rmd(session: &Session, line: &CommandLine, ctx: &ServerContext) -> CommandResult {
    let Some(name) = line.arg(0).filter(|_| line.has_valid_arity()) else {
        return syntax_error();
    };

    let removed = session
        .working_path()
        .child(name)
        .map_err(FtpServerError::from)
        .and_then(|path| {
            ctx.fs()
                .delete_directory_recursive(&path)
                .map(|_| path)
                .map_err(FtpServerError::from)
        });

    match removed {
        Ok(path) => CommandResult::success(Reply::new(
            FILE_ACTION_OK,
            format!("Directory \"{}\" deleted successfully", path),
        )),
        Err(e) => {
            debug!("RMD {:?} failed: {}", name, e);
            refuse(e, "Failed to delete directory")
        }
    }
}

fn handle_cmd_dele(session: &Session, line: &CommandLine, ctx: &ServerContext) -> CommandResult {
    let Some(name) = line.arg(0).filter(|_| line.has_valid_arity()) else {
        return syntax_error();
    };
    let path = match session.working_path().child(name) {
        Ok(path) => path,
        Err(e) => return refuse(e, "File not found"),
    };

    match ctx.fs().delete_file(&path) {
        Ok(()) => CommandResult::success(Reply::new(FILE_ACTION_OK, "File deleted successfully")),
        Err(e @ (StorageError::FileNotFound(_) | StorageError::NotAFile(_))) => {
            refuse(e, "File not found")
        }
        Err(e @ StorageError::PermissionDenied(_)) => refuse(e, "Permission denied"),
        Err(e) => {
            error!("DELE {} failed: {}", path, e);
            refuse(e, "Failed to delete file")
        }
    }
}

/// Handles LIST: the listing travels on the control channel as one
/// multi-line reply, so no data channel is needed.
fn handle_cmd_list(session: &Session, line: &CommandLine, ctx: &ServerContext) -> CommandResult {
    if !line.has_valid_arity() {
        return syntax_error();
    }

    let cwd = session.working_path();
    match ctx.fs().list_entries(cwd) {
        Ok(entries) => {
            let mut body = vec![format!("Directory \"{}\" has:", cwd), String::new()];
            body.extend(entries.iter().map(|entry| entry.display_name()));
            CommandResult::success(Reply::multi(
                FILE_STATUS_OK,
                "Here comes the directory listing",
                body,
                TRANSFER_COMPLETE,
                "Directory send OK",
            ))
        }
        Err(e) => {
            error!("LIST {} failed: {}", cwd, e);
            refuse(e, "Failed to list directory")
        }
    }
}

fn handle_cmd_help(line: &CommandLine) -> CommandResult {
    if !line.has_valid_arity() {
        return syntax_error();
    }

    let mut body: Vec<String> = Command::IMPLEMENTED
        .iter()
        .map(|command| command.usage().to_string())
        .collect();
    body.push(String::new());

    CommandResult::success(Reply::multi(
        HELP,
        "The following commands are recognized:",
        body,
        HELP,
        "Help OK",
    ))
}

fn parameter_not_implemented() -> CommandResult {
    CommandResult::failure(Reply::new(
        PARAMETER_NOT_IMPLEMENTED,
        "Command not implemented for that parameter",
    ))
}

fn handle_cmd_type(session: &mut Session, line: &CommandLine) -> CommandResult {
    let Some(code) = line.arg(0).filter(|_| line.has_valid_arity()) else {
        return syntax_error();
    };

    match DataType::from_code(code) {
        Some(data_type) => {
            session.set_data_type(data_type);
            CommandResult::success(Reply::new(OK, format!("Type set to {}", data_type.code())))
        }
        None => parameter_not_implemented(),
    }
}

fn handle_cmd_mode(session: &mut Session, line: &CommandLine) -> CommandResult {
    let Some(code) = line.arg(0).filter(|_| line.has_valid_arity()) else {
        return syntax_error();
    };

    match TransferMode::from_code(code) {
        Some(mode) => {
            session.set_mode(mode);
            CommandResult::success(Reply::new(OK, format!("Transfer mode set to {}", mode)))
        }
        None => parameter_not_implemented(),
    }
}

fn handle_cmd_stru(session: &mut Session, line: &CommandLine) -> CommandResult {
    let Some(code) = line.arg(0).filter(|_| line.has_valid_arity()) else {
        return syntax_error();
    };

    match FileStructure::from_code(code) {
        Some(structure) => {
            session.set_structure(structure);
            CommandResult::success(Reply::new(OK, format!("{} structure selected", structure)))
        }
        None => parameter_not_implemented(),
    }
}

/// Handles PASV: binds a listener, announces it with 227 and waits for the
/// client to connect. The accepted stream becomes the session's channel.
async fn handle_cmd_pasv<W>(
    session: &mut Session,
    line: &CommandLine,
    ctx: &ServerContext,
    writer: &mut W,
) -> std::io::Result<CommandResult>
where
    W: AsyncWrite + Unpin,
{
    if !line.has_valid_arity() {
        return Ok(syntax_error());
    }

    // A channel negotiated earlier but never used is closed here.
    session.clear_passive();

    let config = ctx.config();
    let ip = advertised_ip(session.local_addr(), config.pasv_address);
    let (listener, addr) =
        match bind_passive_listener(ip, config.pasv_port_range(), config.pasv_bind_attempts).await
        {
            Ok(bound) => bound,
            Err(e) => return Ok(cant_open_data(session, e)),
        };

    info!("PASV for {} listening on {}", session.peer(), addr);
    write_reply(writer, &Reply::new(ENTERING_PASSIVE, format_pasv_reply(addr))).await?;

    match accept_one(listener, addr.port(), config.pasv_accept_timeout()).await {
        Ok(channel) => {
            session.set_passive(channel);
            Ok(CommandResult {
                status: CommandStatus::Success,
                reply: None,
            })
        }
        Err(e) => Ok(cant_open_data(session, e)),
    }
}

fn cant_open_data(session: &Session, err: TransferError) -> CommandResult {
    warn!("Data channel for {} not opened: {}", session.peer(), err);
    refuse(err, "Can't open data connection")
}

fn transfer_job(session: &Session, ctx: &ServerContext) -> TransferJob {
    let config = ctx.config();
    TransferJob::new(
        session.params(),
        config.buffer_size,
        config.data_idle_timeout(),
    )
}

fn transfer_finished(result: Result<u64, TransferError>, name: &str) -> CommandResult {
    match result {
        Ok(bytes) => {
            info!("Transfer of {} complete ({} bytes)", name, bytes);
            CommandResult::success(Reply::new(
                TRANSFER_COMPLETE,
                "Closing data connection; transfer complete",
            ))
        }
        Err(e) => {
            error!("Transfer of {} aborted: {}", name, e);
            refuse(e, "Requested action aborted. Local error in processing")
        }
    }
}

/// Handles RETR: streams a file to the client over the passive channel.
async fn handle_cmd_retr<W>(
    session: &mut Session,
    line: &CommandLine,
    ctx: &ServerContext,
    writer: &mut W,
) -> std::io::Result<CommandResult>
where
    W: AsyncWrite + Unpin,
{
    if !session.has_passive() {
        return Ok(bad_sequence(TransferError::DataChannelNotInitialized));
    }
    let Some(name) = line.arg(0).filter(|_| line.has_valid_arity()) else {
        return Ok(syntax_error());
    };
    let Some(channel) = session.take_passive() else {
        return Ok(bad_sequence(TransferError::DataChannelNotInitialized));
    };

    let opened = session
        .working_path()
        .child(name)
        .map_err(FtpServerError::from)
        .and_then(|path| ctx.fs().open_for_read(&path).map_err(FtpServerError::from));
    let source = match opened {
        Ok(source) => source,
        Err(e) => {
            debug!("RETR {:?} refused: {}", name, e);
            return Ok(refuse(e, "File not found or cannot be accessed"));
        }
    };

    write_reply(
        writer,
        &Reply::new(
            FILE_STATUS_OK,
            format!("File status [{}] okay; about to open data connection", name),
        ),
    )
    .await?;

    let job = transfer_job(session, ctx);
    let result = job.send(source, channel.into_stream()).await;
    Ok(transfer_finished(result, name))
}

/// Handles STOR: writes the client's upload into the current directory.
///
/// A failed upload leaves no partial file behind.
async fn handle_cmd_stor<W>(
    session: &mut Session,
    line: &CommandLine,
    ctx: &ServerContext,
    writer: &mut W,
) -> std::io::Result<CommandResult>
where
    W: AsyncWrite + Unpin,
{
    if !session.has_passive() {
        return Ok(bad_sequence(TransferError::DataChannelNotInitialized));
    }
    let Some(name) = line.arg(0).filter(|_| line.has_valid_arity()) else {
        return Ok(syntax_error());
    };
    let Some(channel) = session.take_passive() else {
        return Ok(bad_sequence(TransferError::DataChannelNotInitialized));
    };

    let path: VirtualPath = match session.working_path().child(name) {
        Ok(path) => path,
        Err(e) => {
            debug!("STOR {:?} refused: {}", name, e);
            return Ok(refuse(e, "Cannot create file"));
        }
    };
    let sink = match ctx.fs().open_for_write(&path) {
        Ok(sink) => sink,
        Err(e) => {
            error!("STOR {} failed to open: {}", path, e);
            return Ok(refuse(e, "Cannot create file"));
        }
    };

    write_reply(
        writer,
        &Reply::new(FILE_STATUS_OK, format!("Ready to receive file [{}].", name)),
    )
    .await?;

    let job = transfer_job(session, ctx);
    let result = job.receive(channel.into_stream(), sink).await;
    if result.is_err() {
        if let Err(e) = ctx.fs().delete_file(&path) {
            warn!("Could not remove partial upload {}: {}", path, e);
        }
    }
    Ok(transfer_finished(result, name))
}

fn handle_cmd_unknown(line: &CommandLine) -> CommandResult {
    debug!("Unknown command {:?}", line.verb);
    CommandResult::failure(Reply::new(NOT_IMPLEMENTED, "Command not implemented"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticCredentials;
    use crate::config::ServerConfig;
    use crate::protocol::parse_command;
    use crate::storage::DiskFs;
    use crate::transfer::TransferParams;
    use std::net::SocketAddr;
    use std::sync::Arc;
    use tempfile::TempDir;

    struct Harness {
        root_dir: TempDir,
        ctx: ServerContext,
        session: Session,
        out: Vec<u8>,
    }

    impl Harness {
        fn new() -> Self {
            let root = TempDir::new().unwrap();
            let fs = DiskFs::new(root.path()).unwrap();
            let ctx = ServerContext::new(
                ServerConfig::default(),
                Arc::new(StaticCredentials::default()),
                Arc::new(fs),
            );
            let addr: SocketAddr = "127.0.0.1:2121".parse().unwrap();
            Self {
                root_dir: root,
                ctx,
                session: Session::new(addr, addr),
                out: Vec::new(),
            }
        }

        fn root(&self) -> &std::path::Path {
            self.root_dir.path()
        }

        async fn run(&mut self, raw: &str) -> CommandResult {
            let line = parse_command(raw);
            handle_command(&mut self.session, &line, &self.ctx, &mut self.out)
                .await
                .unwrap()
        }

        async fn code(&mut self, raw: &str) -> u16 {
            self.run(raw).await.reply.unwrap().code()
        }

        async fn logged_in() -> Self {
            let mut h = Self::new();
            assert_eq!(h.code("USER john").await, 331);
            assert_eq!(h.code("PASS 1234").await, 230);
            h
        }
    }

    #[tokio::test]
    async fn test_commands_before_login_are_rejected() {
        let mut h = Harness::new();
        for raw in ["PWD", "LIST", "PASV", "RETR a", "FOO", "CWD x"] {
            assert_eq!(h.code(raw).await, 503, "{}", raw);
        }
        assert!(h.out.is_empty());
    }

    #[tokio::test]
    async fn test_login_sequence() {
        let mut h = Harness::new();
        assert_eq!(h.code("PASS 1234").await, 503);
        assert_eq!(h.code("USER").await, 501);
        assert_eq!(h.code("USER john").await, 331);
        assert_eq!(h.code("PASS").await, 501);
        assert_eq!(h.code("PASS wrong").await, 530);
        assert!(!h.session.is_logged_in());
        // A failed PASS forgets the username.
        assert_eq!(h.code("PASS 1234").await, 503);

        assert_eq!(h.code("USER john").await, 331);
        assert_eq!(h.code("PASS 1234").await, 230);
        assert_eq!(h.session.identity().unwrap().username(), "john");
    }

    #[tokio::test]
    async fn test_user_after_login_keeps_identity() {
        let mut h = Harness::logged_in().await;
        assert_eq!(h.code("USER jane").await, 503);
        assert_eq!(h.code("PASS 5678").await, 503);
        assert_eq!(h.session.identity().unwrap().username(), "john");
    }

    #[tokio::test]
    async fn test_quit_closes_in_any_state() {
        let mut h = Harness::new();
        let result = h.run("QUIT").await;
        assert_eq!(result.status, CommandStatus::CloseConnection);
        assert_eq!(result.reply.unwrap().to_wire(), "221 Goodbye.\r\n");
    }

    #[tokio::test]
    async fn test_navigation() {
        let mut h = Harness::logged_in().await;
        std::fs::create_dir(h.root().join("docs")).unwrap();

        let pwd = h.run("PWD").await.reply.unwrap();
        assert_eq!(pwd.to_wire(), "257 \"/\" is the current directory\r\n");

        assert_eq!(h.code("CDUP").await, 550);
        assert_eq!(h.code("CWD missing").await, 550);
        assert_eq!(h.code("CWD ..").await, 550);
        assert_eq!(h.code("CWD docs").await, 250);
        assert_eq!(h.session.working_path().to_string(), "/docs");
        assert_eq!(h.code("CDUP").await, 200);
        assert!(h.session.working_path().is_root());
    }

    #[tokio::test]
    async fn test_cdup_unwinds_nested_directories() {
        let mut h = Harness::logged_in().await;
        std::fs::create_dir_all(h.root().join("a").join("b")).unwrap();

        assert_eq!(h.code("CWD a").await, 250);
        assert_eq!(h.code("CWD b").await, 250);
        assert_eq!(h.session.working_path().to_string(), "/a/b");

        assert_eq!(h.code("CDUP").await, 200);
        assert_eq!(h.session.working_path().to_string(), "/a");
        assert_eq!(h.code("CDUP").await, 200);
        assert!(h.session.working_path().is_root());
        assert_eq!(h.code("CDUP").await, 550);
        assert!(h.session.working_path().is_root());
    }

    #[tokio::test]
    async fn test_mkd_rmd_dele() {
        let mut h = Harness::logged_in().await;

        let mkd = h.run("MKD reports").await.reply.unwrap();
        assert_eq!(mkd.to_wire(), "257 \"/reports\" created successfully\r\n");
        assert_eq!(h.code("MKD reports").await, 550);
        std::fs::write(h.root().join("reports").join("q1.txt"), b"x").unwrap();
        assert_eq!(h.code("RMD reports").await, 250);
        assert!(!h.root().join("reports").exists());
        assert_eq!(h.code("RMD reports").await, 550);

        std::fs::write(h.root().join("old.txt"), b"x").unwrap();
        assert_eq!(h.code("DELE old.txt").await, 250);
        assert_eq!(h.code("DELE old.txt").await, 550);
    }

    #[tokio::test]
    async fn test_list_empty_directory_still_terminates() {
        let mut h = Harness::logged_in().await;
        let reply = h.run("LIST").await.reply.unwrap();

        assert_eq!(reply.code(), 150);
        assert_eq!(reply.final_code(), 226);
        assert_eq!(
            reply.to_wire(),
            "150 Here comes the directory listing\r\n\
             Directory \"/\" has:\r\n\
             \r\n\
             226 Directory send OK\r\n"
        );
    }

    #[tokio::test]
    async fn test_list_marks_directories() {
        let mut h = Harness::logged_in().await;
        std::fs::create_dir(h.root().join("sub")).unwrap();
        std::fs::write(h.root().join("a.txt"), b"x").unwrap();

        let wire = h.run("LIST").await.reply.unwrap().to_wire();

        assert!(wire.contains("\r\na.txt\r\nsub/\r\n226 "));
    }

    #[tokio::test]
    async fn test_list_keeps_line_breaks_in_names_on_one_line() {
        let mut h = Harness::logged_in().await;
        std::fs::write(h.root().join("evil\n226 fake done"), b"x").unwrap();
        std::fs::write(h.root().join("zzz.txt"), b"x").unwrap();

        let wire = h.run("LIST").await.reply.unwrap().to_wire();
        let lines: Vec<&str> = wire.trim_end_matches("\r\n").split("\r\n").collect();

        let end = lines
            .iter()
            .position(|line| is_terminator(line, TRANSFER_COMPLETE))
            .unwrap();
        assert_eq!(lines[end], "226 Directory send OK");
        assert_eq!(end, lines.len() - 1);
        assert!(lines.contains(&"evil 226 fake done"));
        assert!(lines.contains(&"zzz.txt"));
        assert!(lines.iter().all(|line| !line.contains('\n')));
    }

    #[tokio::test]
    async fn test_help_is_multiline_214() {
        let mut h = Harness::logged_in().await;
        let reply = h.run("HELP").await.reply.unwrap();
        assert_eq!(reply.code(), 214);
        assert_eq!(reply.final_code(), 214);
        assert!(reply.to_wire().ends_with("214 Help OK\r\n"));
    }

    #[tokio::test]
    async fn test_transfer_parameters() {
        let mut h = Harness::logged_in().await;

        assert_eq!(h.code("MODE X").await, 504);
        assert_eq!(h.code("TYPE E").await, 504);
        assert_eq!(h.code("STRU V").await, 504);
        assert_eq!(h.session.params(), TransferParams::default());

        assert_eq!(h.code("MODE b").await, 200);
        assert_eq!(h.code("TYPE A").await, 200);
        assert_eq!(h.code("STRU R").await, 200);
        let params = h.session.params();
        assert_eq!(params.mode, TransferMode::Block);
        assert_eq!(params.data_type, DataType::Ascii);
        assert_eq!(params.structure, FileStructure::Record);

        assert_eq!(h.code("MODE").await, 501);
    }

    #[tokio::test]
    async fn test_transfers_require_passive_channel() {
        let mut h = Harness::logged_in().await;
        std::fs::write(h.root().join("a.txt"), b"x").unwrap();

        assert_eq!(h.code("RETR a.txt").await, 503);
        assert_eq!(h.code("RETR").await, 503);
        assert_eq!(h.code("STOR a.txt").await, 503);
        assert!(h.out.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_command_after_login() {
        let mut h = Harness::logged_in().await;
        assert_eq!(h.code("SITE CHMOD").await, 502);
        assert_eq!(h.code("PWD extra").await, 501);
    }
}
