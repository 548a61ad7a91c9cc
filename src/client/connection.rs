//! Control connection of the companion client
//!
//! [`FtpClient`] speaks the same protocol the server implements: it reads
//! single and multi-line replies, negotiates PASV, and runs transfers with
//! the same codec as the server so every mode/type/structure combination
//! round-trips.

use log::{debug, info, warn};
use std::fmt;
use std::fs::File;
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpStream, ToSocketAddrs};

use crate::error::ClientError;
use crate::protocol::responses::{
    ENTERING_PASSIVE, FILE_STATUS_OK, HELP, LOGIN_SUCCESS, OK, PASSWORD_REQUIRED,
    TRANSFER_COMPLETE, is_terminator, reply_code, reply_text,
};
use crate::transfer::{
    DataType, FileStructure, TransferJob, TransferMode, TransferParams, parse_pasv_reply,
};

const DEFAULT_BUFFER_SIZE: usize = 8192;
const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(60);

/// A complete reply as read by the client: the code of its last line and
/// every line received, without CRLF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerReply {
    pub code: u16,
    pub lines: Vec<String>,
}

impl ServerReply {
    fn single(code: u16, line: String) -> Self {
        Self {
            code,
            lines: vec![line],
        }
    }

    /// Text of the first line after its code.
    pub fn text(&self) -> &str {
        self.lines.first().map(|line| reply_text(line)).unwrap_or("")
    }

    pub fn is(&self, code: u16) -> bool {
        self.code == code
    }
}

impl fmt::Display for ServerReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            f.write_str(line)?;
        }
        Ok(())
    }
}

pub struct FtpClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    greeting: ServerReply,
    params: TransferParams,
    data: Option<TcpStream>,
    buffer_size: usize,
    idle_timeout: Duration,
}

impl FtpClient {
    /// Connects and reads the server greeting.
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> Result<Self, ClientError> {
        let stream = TcpStream::connect(addr).await?;
        let (read_half, writer) = stream.into_split();

        let mut client = Self {
            reader: BufReader::new(read_half),
            writer,
            greeting: ServerReply::single(0, String::new()),
            params: TransferParams::default(),
            data: None,
            buffer_size: DEFAULT_BUFFER_SIZE,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        };
        client.greeting = client.read_reply().await?;
        info!("Connected: {}", client.greeting);
        Ok(client)
    }

    pub fn greeting(&self) -> &ServerReply {
        &self.greeting
    }

    /// Parameters the next transfer will use, as acknowledged by the server.
    pub fn params(&self) -> TransferParams {
        self.params
    }

    pub fn has_data_connection(&self) -> bool {
        self.data.is_some()
    }

    pub async fn send_line(&mut self, line: &str) -> Result<(), ClientError> {
        debug!("> {}", line);
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\r\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    async fn read_line(&mut self) -> Result<String, ClientError> {
        let mut line = String::new();
        if self.reader.read_line(&mut line).await? == 0 {
            return Err(ClientError::ConnectionClosed);
        }
        let line = line.trim_end_matches(['\r', '\n']).to_string();
        debug!("< {}", line);
        Ok(line)
    }

    /// Reads one reply line; anything without a reply code is rejected.
    pub async fn read_reply(&mut self) -> Result<ServerReply, ClientError> {
        let line = self.read_line().await?;
        match reply_code(&line) {
            Some(code) => Ok(ServerReply::single(code, line)),
            None => Err(ClientError::UnexpectedReply(line)),
        }
    }

    /// Continues `opening` until a line carrying `terminator`.
    async fn read_multiline(
        &mut self,
        opening: ServerReply,
        terminator: u16,
    ) -> Result<ServerReply, ClientError> {
        let mut lines = opening.lines;
        loop {
            let line = self.read_line().await?;
            let done = is_terminator(&line, terminator);
            lines.push(line);
            if done {
                return Ok(ServerReply {
                    code: terminator,
                    lines,
                });
            }
        }
    }

    /// Sends one command and reads its single-line reply.
    pub async fn command(&mut self, line: &str) -> Result<ServerReply, ClientError> {
        self.send_line(line).await?;
        self.read_reply().await
    }

    /// USER/PASS, then selects binary stream file transfers on success.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<ServerReply, ClientError> {
        let user = self.command(&format!("USER {}", username)).await?;
        if !user.is(PASSWORD_REQUIRED) {
            return Ok(user);
        }

        let pass = self.command(&format!("PASS {}", password)).await?;
        if pass.is(LOGIN_SUCCESS) {
            self.after_login().await?;
        }
        Ok(pass)
    }

    /// Resets the transfer parameters the way a fresh login expects.
    pub(crate) async fn after_login(&mut self) -> Result<Vec<ServerReply>, ClientError> {
        Ok(vec![
            self.set_parameter("TYPE", "I").await?,
            self.set_parameter("MODE", "S").await?,
            self.set_parameter("STRU", "F").await?,
        ])
    }

    /// Sends TYPE, MODE or STRU and tracks the value once the server accepts it.
    pub async fn set_parameter(&mut self, verb: &str, code: &str) -> Result<ServerReply, ClientError> {
        let verb = verb.to_ascii_uppercase();
        let reply = self.command(&format!("{} {}", verb, code)).await?;
        if reply.is(OK) {
            match verb.as_str() {
                "TYPE" => {
                    if let Some(data_type) = DataType::from_code(code) {
                        self.params.data_type = data_type;
                    }
                }
                "MODE" => {
                    if let Some(mode) = TransferMode::from_code(code) {
                        self.params.mode = mode;
                    }
                }
                "STRU" => {
                    if let Some(structure) = FileStructure::from_code(code) {
                        self.params.structure = structure;
                    }
                }
                _ => {}
            }
        }
        Ok(reply)
    }

    /// Sends PASV and opens the advertised data connection.
    pub async fn passive(&mut self) -> Result<ServerReply, ClientError> {
        self.data = None;
        let reply = self.command("PASV").await?;
        if !reply.is(ENTERING_PASSIVE) {
            return Ok(reply);
        }

        let addr = parse_pasv_reply(reply.text())
            .ok_or_else(|| ClientError::MalformedPasv(reply.text().to_string()))?;
        let stream = TcpStream::connect(addr).await?;
        info!("Data connection open to {}", addr);
        self.data = Some(stream);
        Ok(reply)
    }

    /// LIST; the listing arrives on the control channel.
    pub async fn list(&mut self) -> Result<ServerReply, ClientError> {
        let opening = self.command("LIST").await?;
        if !opening.is(FILE_STATUS_OK) {
            return Ok(opening);
        }
        self.read_multiline(opening, TRANSFER_COMPLETE).await
    }

    pub async fn help(&mut self) -> Result<ServerReply, ClientError> {
        let opening = self.command("HELP").await?;
        if !opening.is(HELP) {
            return Ok(opening);
        }
        self.read_multiline(opening, HELP).await
    }

    fn job(&self) -> TransferJob {
        TransferJob::new(self.params, self.buffer_size, self.idle_timeout)
    }

    /// RETR `remote` into `local`. Returns the final reply (226 or an error).
    pub async fn retrieve(&mut self, remote: &str, local: &Path) -> Result<ServerReply, ClientError> {
        let reply = self.command(&format!("RETR {}", remote)).await?;
        if !reply.is(FILE_STATUS_OK) {
            return Ok(reply);
        }
        let data = self.data.take().ok_or(ClientError::NoDataConnection)?;

        let file = File::create(local).map_err(|source| ClientError::LocalFile {
            path: local.display().to_string(),
            source,
        })?;
        let transferred = self.job().receive(data, file).await;
        let done = self.read_reply().await?;

        match transferred {
            Ok(bytes) => {
                info!("Received {} ({} bytes)", remote, bytes);
                Ok(done)
            }
            Err(e) => {
                warn!("Download of {} failed: {}", remote, e);
                let _ = std::fs::remove_file(local);
                Err(e.into())
            }
        }
    }

    /// STOR `local` as `remote`. The local file must exist before anything
    /// is sent.
    pub async fn store(&mut self, local: &Path, remote: &str) -> Result<ServerReply, ClientError> {
        let file = File::open(local).map_err(|source| ClientError::LocalFile {
            path: local.display().to_string(),
            source,
        })?;

        let reply = self.command(&format!("STOR {}", remote)).await?;
        if !reply.is(FILE_STATUS_OK) {
            return Ok(reply);
        }
        let data = self.data.take().ok_or(ClientError::NoDataConnection)?;

        let transferred = self.job().send(file, data).await;
        let done = self.read_reply().await?;

        match transferred {
            Ok(bytes) => {
                info!("Sent {} ({} bytes)", remote, bytes);
                Ok(done)
            }
            Err(e) => {
                warn!("Upload of {} failed: {}", remote, e);
                Err(e.into())
            }
        }
    }

    pub async fn quit(&mut self) -> Result<ServerReply, ClientError> {
        self.command("QUIT").await
    }
}
