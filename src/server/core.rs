use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::error::{FtpServerError, handle_error};
use crate::server::ServerContext;
use crate::session::handle_session;

pub struct Server {
    listener: TcpListener,
    ctx: Arc<ServerContext>,
}

impl Server {
    /// Binds the control socket named by the configuration.
    pub async fn bind(ctx: ServerContext) -> Result<Self, FtpServerError> {
        let socket = ctx.config().control_socket();
        let listener = TcpListener::bind(&socket).await.map_err(|e| {
            error!("Failed to bind to {}: {}", socket, e);
            FtpServerError::Io(e)
        })?;
        info!("Server bound to {}", socket);

        Ok(Self {
            listener,
            ctx: Arc::new(ctx),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, FtpServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts control connections forever, one task per connection.
    pub async fn run(self) {
        match self.listener.local_addr() {
            Ok(addr) => info!("Starting modal-ftp server on {}", addr),
            Err(e) => error!("Starting modal-ftp server on unknown address: {}", e),
        }

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    info!("Accepted control connection from {}", addr);
                    let ctx = Arc::clone(&self.ctx);

                    // Spawn a task for each client so accept loop doesn't block
                    tokio::spawn(async move {
                        handle_session(stream, addr, ctx).await;
                    });
                }
                Err(e) => {
                    handle_error(&FtpServerError::Io(e));
                }
            }
        }
    }
}
