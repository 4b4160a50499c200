use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::session::Session;

/// Bind the listener and serve forever. Each connection runs the
/// protocol once on its own task; a failed session only closes that
/// connection.
pub async fn run_server(config: ServerConfig) -> Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;

    info!("listening on: {}", listener.local_addr()?);
    info!(y_share = config.y_share, "bob multiplicative share");

    loop {
        match listener.accept().await {
            Ok((socket, addr)) => {
                info!("accepted connection from: {}", addr);

                let session = Session::new(socket, &config);
                tokio::spawn(async move {
                    match session.run().await {
                        Ok(result) => {
                            info!(additive_share = result.additive_share, "session finished")
                        }
                        Err(err) => warn!("session closed: {err}"),
                    }
                });
            }
            Err(err) => warn!("accept error: {err}"),
        }
    }
}
