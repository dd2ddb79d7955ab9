// Connection handling module
// Serves HTTP/1.x on one accepted stream in its own task

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::sync::Arc;

use crate::config::ServerState;
use crate::handler;
use crate::logger;

/// Spawn a task that serves the connection until it closes or times out.
///
/// One task per connection. Connections share nothing mutable; the
/// `ServerState` is read-only and the log writer serializes its own
/// output, so no cross-request lock is held across any blocking point.
pub fn accept_connection(stream: tokio::net::TcpStream, state: &Arc<ServerState>) {
    let state = Arc::clone(state);
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let keep_alive = state.config.performance.keep_alive_timeout > 0;
        let timeout_duration = std::time::Duration::from_secs(std::cmp::max(
            state.config.performance.read_timeout,
            state.config.performance.write_timeout,
        ));

        let mut builder = http1::Builder::new();
        builder.keep_alive(keep_alive);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| handler::handle_request(req, Arc::clone(&service_state))),
        );

        // A stalled or malformed connection only costs itself
        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => {
                logger::log_warning(&format!(
                    "Connection timed out after {} seconds",
                    timeout_duration.as_secs()
                ));
            }
        }
    });
}
