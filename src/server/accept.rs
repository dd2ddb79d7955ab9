// Accept loop module
// Runs until the shutdown signal fires; every accepted connection is
// handed to the connection module

use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::ServerState;
use crate::logger;

/// Accept connections until shutdown is notified.
///
/// Accept errors are logged and the loop keeps going; only the shutdown
/// signal ends it. Dropping the listener on return closes the socket.
pub async fn run_accept_loop(
    listener: TcpListener,
    state: Arc<ServerState>,
    shutdown: Arc<Notify>,
) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, _peer_addr)) => accept_connection(stream, &state),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            _ = shutdown.notified() => {
                break;
            }
        }
    }
}
