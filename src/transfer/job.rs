//! Module `job`
//!
//! Runs one RETR or STOR over an accepted data connection. The codec is
//! blocking, so each job moves the data stream onto a blocking thread with
//! read/write timeouts acting as the idle timeout.

use log::{debug, error, info};
use std::io::{Read, Write};
use std::net::Shutdown;
use std::time::Duration;
use tokio::net::TcpStream;

use crate::error::TransferError;
use crate::transfer::codec::{self, CodecError};
use crate::transfer::modes::TransferParams;

/// One transfer bound to a snapshot of the session's parameters.
#[derive(Debug, Clone, Copy)]
pub struct TransferJob {
    params: TransferParams,
    buffer_size: usize,
    idle_timeout: Duration,
}

impl TransferJob {
    pub fn new(params: TransferParams, buffer_size: usize, idle_timeout: Duration) -> Self {
        Self {
            params,
            buffer_size,
            idle_timeout,
        }
    }

    /// Encodes `source` onto the data connection, then closes it.
    pub async fn send<R>(&self, source: R, data: TcpStream) -> Result<u64, TransferError>
    where
        R: Read + Send + 'static,
    {
        let job = *self;
        let stream = into_blocking(data, self.idle_timeout)?;
        info!("Sending data ({})", job.params);

        let result = tokio::task::spawn_blocking(move || {
            let sent = codec::encode(&job.params, source, &stream, job.buffer_size);
            let _ = stream.shutdown(Shutdown::Both);
            sent
        })
        .await;

        finish("send", result)
    }

    /// Decodes the data connection into `sink` until the peer ends the stream.
    pub async fn receive<W>(&self, data: TcpStream, sink: W) -> Result<u64, TransferError>
    where
        W: Write + Send + 'static,
    {
        let job = *self;
        let stream = into_blocking(data, self.idle_timeout)?;
        info!("Receiving data ({})", job.params);

        let result = tokio::task::spawn_blocking(move || {
            let received = codec::decode(&job.params, &stream, sink, job.buffer_size);
            let _ = stream.shutdown(Shutdown::Both);
            received
        })
        .await;

        finish("receive", result)
    }
}

fn into_blocking(data: TcpStream, idle_timeout: Duration) -> Result<std::net::TcpStream, TransferError> {
    let stream = data
        .into_std()
        .map_err(TransferError::DataChannelSetupFailed)?;
    stream
        .set_nonblocking(false)
        .map_err(TransferError::DataChannelSetupFailed)?;
    stream
        .set_read_timeout(Some(idle_timeout))
        .map_err(TransferError::DataChannelSetupFailed)?;
    stream
        .set_write_timeout(Some(idle_timeout))
        .map_err(TransferError::DataChannelSetupFailed)?;
    Ok(stream)
}

fn finish(
    direction: &str,
    result: Result<Result<u64, CodecError>, tokio::task::JoinError>,
) -> Result<u64, TransferError> {
    match result {
        Ok(Ok(bytes)) => {
            debug!("Data {} finished: {} bytes", direction, bytes);
            Ok(bytes)
        }
        Ok(Err(e)) => {
            error!("Data {} failed: {}", direction, e);
            Err(TransferError::Codec(e))
        }
        Err(e) => {
            error!("Data {} task failed: {}", direction, e);
            Err(TransferError::TaskFailed(e.to_string()))
        }
    }
}
