//! Passive mode data channel
//!
//! The server binds a random high port, advertises it in a 227 reply and
//! accepts exactly one connection on it. The accepted stream is the
//! session's data channel for the next RETR or STOR.

use log::{debug, info, warn};
use rand::Rng;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, SocketAddrV4};
use std::ops::RangeInclusive;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};

use crate::error::TransferError;

/// A connected, not yet used data connection.
#[derive(Debug)]
pub struct PassiveChannel {
    stream: TcpStream,
    port: u16,
}

impl PassiveChannel {
    pub fn new(stream: TcpStream, port: u16) -> Self {
        Self { stream, port }
    }

    /// Server-side port the channel was accepted on.
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn into_stream(self) -> TcpStream {
        self.stream
    }
}

/// Chooses the IPv4 address to bind and advertise.
///
/// The control connection's local address is used when it is IPv4 so the
/// client reaches the same interface; otherwise the configured fallback.
pub fn advertised_ip(control_local: SocketAddr, fallback: Ipv4Addr) -> Ipv4Addr {
    match control_local.ip() {
        IpAddr::V4(ip) if !ip.is_unspecified() => ip,
        IpAddr::V6(ip) => ip.to_ipv4_mapped().unwrap_or(fallback),
        _ => fallback,
    }
}

/// Binds a listener on a uniformly random port in `ports`.
///
/// Retries with a fresh port when a bind fails, up to `attempts` times.
pub async fn bind_passive_listener(
    ip: Ipv4Addr,
    ports: RangeInclusive<u16>,
    attempts: usize,
) -> Result<(TcpListener, SocketAddrV4), TransferError> {
    for attempt in 1..=attempts.max(1) {
        let port = rand::thread_rng().gen_range(ports.clone());
        let addr = SocketAddrV4::new(ip, port);

        match TcpListener::bind(addr).await {
            Ok(listener) => {
                debug!("PASV listener bound on {} (attempt {})", addr, attempt);
                return Ok((listener, addr));
            }
            Err(e) => {
                warn!("Failed to bind PASV port {}: {}", addr, e);
            }
        }
    }

    Err(TransferError::NoAvailablePort(attempts.max(1)))
}

/// Waits for exactly one inbound connection, then drops the listener.
pub async fn accept_one(
    listener: TcpListener,
    port: u16,
    timeout: Duration,
) -> Result<PassiveChannel, TransferError> {
    match tokio::time::timeout(timeout, listener.accept()).await {
        Ok(Ok((stream, peer))) => {
            info!("Data connection accepted from {} on port {}", peer, port);
            Ok(PassiveChannel::new(stream, port))
        }
        Ok(Err(e)) => Err(TransferError::DataChannelSetupFailed(e)),
        Err(_) => Err(TransferError::AcceptTimeout(port)),
    }
}

/// Text of the 227 reply: `Entering Passive Mode (a1,a2,a3,a4,p1,p2)`.
pub fn format_pasv_reply(addr: SocketAddrV4) -> String {
    let [a1, a2, a3, a4] = addr.ip().octets();
    let port = addr.port();
    format!(
        "Entering Passive Mode ({},{},{},{},{},{})",
        a1,
        a2,
        a3,
        a4,
        port / 256,
        port % 256
    )
}

/// Extracts the advertised address from a 227 reply line.
pub fn parse_pasv_reply(line: &str) -> Option<SocketAddrV4> {
    let start = line.find('(')?;
    let end = line[start..].find(')')? + start;

    let numbers: Vec<u8> = line[start + 1..end]
        .split(',')
        .map(|part| part.trim().parse::<u8>())
        .collect::<Result<_, _>>()
        .ok()?;

    if numbers.len() != 6 {
        return None;
    }

    let ip = Ipv4Addr::new(numbers[0], numbers[1], numbers[2], numbers[3]);
    let port = u16::from(numbers[4]) * 256 + u16::from(numbers[5]);
    Some(SocketAddrV4::new(ip, port))
}
