//! HTTP(S) listener serving mock routes and the management API.
//!
//! Requests whose path starts with `/_mock/` go to the management router;
//! everything else is matched against the route store. Each connection runs
//! on its own task. On shutdown the listener stops accepting, open
//! connections are asked to finish, and the server waits up to
//! [`SHUTDOWN_GRACE_PERIOD`] for them.

mod tls;

pub use tls::create_tls_acceptor;

use crate::admin_api::types::error_response;
use crate::admin_api::{is_management_path, route_management};
use crate::config::ServerConfig;
use crate::mock::{handle_mock_request, RouteManager};
use anyhow::Context;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{HeaderMap, Method, Request, Response, StatusCode, Uri};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tokio_rustls::TlsAcceptor;
use tracing::{debug, error, info, warn, Level};

/// How long in-flight connections may take to finish after shutdown starts.
pub const SHUTDOWN_GRACE_PERIOD: Duration = Duration::from_secs(30);

/// Request headers whose values are never logged.
const SENSITIVE_HEADERS: [&str; 7] = [
    "authorization",
    "cookie",
    "set-cookie",
    "x-api-key",
    "x-auth-token",
    "x-access-token",
    "x-csrf-token",
];

/// State shared by every connection.
pub struct ServerState {
    pub manager: Arc<RouteManager>,
    /// HTML page served at `/_mock/ui`
    pub ui_template: PathBuf,
}

impl ServerState {
    pub fn new(manager: Arc<RouteManager>, ui_template: impl Into<PathBuf>) -> Self {
        Self {
            manager,
            ui_template: ui_template.into(),
        }
    }
}

/// A bound mock server, ready to run.
pub struct MockServer {
    listener: TcpListener,
    state: Arc<ServerState>,
    tls_acceptor: Option<TlsAcceptor>,
}

impl MockServer {
    /// Bind the listener and prepare TLS if configured.
    pub async fn bind(
        config: &ServerConfig,
        manager: Arc<RouteManager>,
    ) -> Result<Self, anyhow::Error> {
        let tls_acceptor = config
            .tls
            .as_ref()
            .map(|tls| create_tls_acceptor(&tls.cert_path, &tls.key_path))
            .transpose()?;

        let addr = format!("{}:{}", config.host, config.port);
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;

        Ok(Self {
            listener,
            state: Arc::new(ServerState::new(manager, config.ui_template.clone())),
            tls_acceptor,
        })
    }

    /// Address the listener is bound to. Useful when binding port 0.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn state(&self) -> &Arc<ServerState> {
        &self.state
    }

    /// Serve until Ctrl-C or SIGTERM.
    pub async fn run(self) -> Result<(), anyhow::Error> {
        self.run_until(shutdown_signal()).await
    }

    /// Serve until `shutdown` completes, then drain open connections.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), anyhow::Error>
    where
        F: Future<Output = ()>,
    {
        let addr = self.local_addr()?;
        let scheme = if self.tls_acceptor.is_some() {
            "https"
        } else {
            "http"
        };
        info!("Mock server listening on {}://{}", scheme, addr);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        // Each connection task holds a sender; recv() yields None once all are gone.
        let (done_tx, mut done_rx) = mpsc::channel::<()>(1);
        tokio::pin!(shutdown);

        loop {
            let (stream, remote_addr) = tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!("Failed to accept connection: {}", e);
                        continue;
                    }
                },
                _ = &mut shutdown => break,
            };

            let state = Arc::clone(&self.state);
            let tls_acceptor = self.tls_acceptor.clone();
            let shutdown_rx = shutdown_rx.clone();
            let done = done_tx.clone();

            tokio::spawn(async move {
                match tls_acceptor {
                    Some(acceptor) => match acceptor.accept(stream).await {
                        Ok(tls_stream) => {
                            let io = TokioIo::new(tls_stream);
                            serve_connection(io, state, shutdown_rx, remote_addr).await
                        }
                        Err(err) => {
                            error!("TLS handshake failed from {}: {}", remote_addr, err);
                        }
                    },
                    None => {
                        serve_connection(TokioIo::new(stream), state, shutdown_rx, remote_addr)
                            .await
                    }
                }
                drop(done);
            });
        }

        info!("Shutting down, waiting for open connections to finish");
        drop(self.listener);
        let _ = shutdown_tx.send(true);
        drop(done_tx);

        if tokio::time::timeout(SHUTDOWN_GRACE_PERIOD, done_rx.recv())
            .await
            .is_err()
        {
            warn!(
                "Connections still open after {}s grace period, exiting anyway",
                SHUTDOWN_GRACE_PERIOD.as_secs()
            );
        }
        info!("Server stopped");
        Ok(())
    }
}

async fn serve_connection<I>(
    io: TokioIo<I>,
    state: Arc<ServerState>,
    mut shutdown_rx: watch::Receiver<bool>,
    remote_addr: SocketAddr,
) where
    I: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let service = service_fn(move |req| {
        let state = Arc::clone(&state);
        async move { handle_request(req, state).await }
    });

    let conn = http1::Builder::new().serve_connection(io, service);
    tokio::pin!(conn);

    let result = tokio::select! {
        res = conn.as_mut() => res,
        _ = shutdown_rx.changed() => {
            conn.as_mut().graceful_shutdown();
            conn.as_mut().await
        }
    };

    if let Err(err) = result {
        debug!("Error serving connection from {}: {}", remote_addr, err);
    }
}

/// Dispatch one request and log its outcome.
async fn handle_request(
    req: Request<Incoming>,
    state: Arc<ServerState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    log_request_details(&method, &uri, req.headers());

    let response = if is_management_path(uri.path()) {
        match req.into_body().collect().await {
            Ok(collected) => {
                dispatch_management(method.clone(), uri.clone(), collected.to_bytes(), state).await
            }
            Err(e) => {
                warn!("Failed to read request body: {}", e);
                error_response(StatusCode::BAD_REQUEST, "Failed to read request body")
            }
        }
    } else {
        handle_mock_request(&method, &uri, state.manager.store())
    };

    info!(
        "{} {} -> {} ({:?})",
        method,
        uri.path(),
        response.status().as_u16(),
        start.elapsed()
    );
    Ok(response)
}

/// Management handlers may touch the filesystem, so they run on the blocking pool.
async fn dispatch_management(
    method: Method,
    uri: Uri,
    body: Bytes,
    state: Arc<ServerState>,
) -> Response<Full<Bytes>> {
    tokio::task::spawn_blocking(move || route_management(&method, &uri, &body, &state))
        .await
        .unwrap_or_else(|e| {
            error!("Management handler failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        })
}

fn log_request_details(method: &Method, uri: &Uri, headers: &HeaderMap) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }
    debug!(
        "Request details: {} {} query={:?} headers=[{}]",
        method,
        uri.path(),
        uri.query().unwrap_or(""),
        redact_headers(headers)
    );
}

/// Render headers as `name: value` pairs, masking credentials.
fn redact_headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| {
            let shown = if SENSITIVE_HEADERS.contains(&name.as_str()) {
                "[REDACTED]"
            } else {
                value.to_str().unwrap_or("<non-utf8>")
            };
            format!("{}: {}", name, shown)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C"),
        _ = terminate => info!("Received SIGTERM"),
    }
}
