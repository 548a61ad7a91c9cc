use log::{debug, error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::net::TcpStream;

use crate::protocol::responses::{READY, Reply, SYNTAX_ERROR};
use crate::protocol::{CommandStatus, handle_command, parse_command, write_reply};
use crate::server::ServerContext;
use crate::session::Session;

/// Outcome of reading one line from the control channel.
#[derive(Debug, PartialEq, Eq)]
pub enum LineRead {
    Line(String),
    TooLong,
    Closed,
}

/// Reads one command line, without its CRLF.
///
/// At most `max_length` bytes of content are buffered. Longer lines are
/// drained up to their newline and reported as `TooLong`.
pub async fn read_command_line<R>(
    reader: &mut R,
    max_length: usize,
    buffer: &mut Vec<u8>,
) -> std::io::Result<LineRead>
where
    R: AsyncBufRead + Unpin,
{
    buffer.clear();
    let limit = (max_length + 2) as u64;
    let n = (&mut *reader).take(limit).read_until(b'\n', buffer).await?;
    if n == 0 {
        return Ok(LineRead::Closed);
    }

    if buffer.last() != Some(&b'\n') && n as u64 == limit {
        let mut discard = Vec::new();
        loop {
            discard.clear();
            let m = (&mut *reader).take(limit).read_until(b'\n', &mut discard).await?;
            if m == 0 || discard.last() == Some(&b'\n') {
                break;
            }
        }
        return Ok(LineRead::TooLong);
    }

    while matches!(buffer.last(), Some(b'\n') | Some(b'\r')) {
        buffer.pop();
    }
    if buffer.len() > max_length {
        return Ok(LineRead::TooLong);
    }

    Ok(LineRead::Line(String::from_utf8_lossy(buffer).into_owned()))
}

/// Handles one FTP control connection from greeting to close.
///
/// - Uses BufReader to read command lines from the client.
/// - Dispatches commands using `handle_command`.
/// - Owns the connection's `Session`; nothing else touches it.
pub async fn handle_session(stream: TcpStream, peer: SocketAddr, ctx: Arc<ServerContext>) {
    let local_addr = match stream.local_addr() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to read local address for {}: {}", peer, e);
            return;
        }
    };

    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut session = Session::new(peer, local_addr);
    let mut buffer = Vec::new();
    let max_length = ctx.config().max_command_length;

    let greeting = Reply::new(READY, ctx.config().greeting.as_str());
    if let Err(e) = write_reply(&mut write_half, &greeting).await {
        error!("Failed to greet {}: {}", peer, e);
        return;
    }

    loop {
        let raw = match read_command_line(&mut reader, max_length, &mut buffer).await {
            Ok(LineRead::Line(raw)) => raw,
            Ok(LineRead::TooLong) => {
                let reply = Reply::new(SYNTAX_ERROR, "Command too long");
                if write_reply(&mut write_half, &reply).await.is_err() {
                    break;
                }
                continue;
            }
            Ok(LineRead::Closed) => {
                info!("Connection closed by client {}", peer);
                break;
            }
            Err(e) => {
                error!("Failed to read from {}: {}", peer, e);
                break;
            }
        };

        let line = parse_command(&raw);
        if line.verb == "PASS" {
            debug!("Received from {}: PASS ****", peer);
        } else {
            debug!("Received from {}: {}", peer, raw);
        }

        let result = match handle_command(&mut session, &line, &ctx, &mut write_half).await {
            Ok(result) => result,
            Err(e) => {
                error!("Control channel to {} failed: {}", peer, e);
                break;
            }
        };

        if let Some(reply) = &result.reply {
            debug!("Sending response to client {}: {}", peer, reply.final_code());
            if let Err(e) = write_reply(&mut write_half, reply).await {
                error!("Failed to write to {}: {}", peer, e);
                break;
            }
        }

        if result.status == CommandStatus::CloseConnection {
            info!("Client {} requested to quit", peer);
            break;
        }
    }

    info!("Client {} disconnected", peer);
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn read_all(input: &[u8], max: usize) -> Vec<LineRead> {
        let mut reader = BufReader::new(input);
        let mut buffer = Vec::new();
        let mut lines = Vec::new();
        loop {
            let line = read_command_line(&mut reader, max, &mut buffer).await.unwrap();
            let done = line == LineRead::Closed;
            lines.push(line);
            if done {
                return lines;
            }
        }
    }

    #[tokio::test]
    async fn test_lines_lose_their_terminators() {
        let lines = read_all(b"USER john\r\nPASS 1234\n", 512).await;
        assert_eq!(
            lines,
            vec![
                LineRead::Line("USER john".into()),
                LineRead::Line("PASS 1234".into()),
                LineRead::Closed,
            ]
        );
    }

    #[tokio::test]
    async fn test_overlong_line_is_drained() {
        let mut input = vec![b'A'; 40];
        input.extend_from_slice(b"\r\nPWD\r\n");

        let lines = read_all(&input, 16).await;

        assert_eq!(
            lines,
            vec![
                LineRead::TooLong,
                LineRead::Line("PWD".into()),
                LineRead::Closed
            ]
        );
    }

    #[tokio::test]
    async fn test_line_at_exact_limit_is_accepted() {
        let mut input = vec![b'B'; 16];
        input.extend_from_slice(b"\r\n");

        let lines = read_all(&input, 16).await;

        assert_eq!(lines[0], LineRead::Line("B".repeat(16)));
    }

    #[tokio::test]
    async fn test_unterminated_final_line() {
        let lines = read_all(b"QUIT", 512).await;
        assert_eq!(lines[0], LineRead::Line("QUIT".into()));
    }
}
