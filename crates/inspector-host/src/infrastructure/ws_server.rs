//! WebSocket link to the embedding component.
//!
//! The embedding component (the native view that owns the sandbox) connects
//! to the host.  For each connection the server:
//!
//! 1. completes the WebSocket handshake,
//! 2. sends one `Load` frame (address, sandbox flags, injected script),
//! 3. hands the host loop a [`ChannelSandbox`] for on-demand script pushes,
//! 4. forwards every `Message` / `PageLoaded` frame to the host loop as a
//!    [`HostEvent::Inbound`],
//! 5. reports [`HostEvent::Detached`] when the connection ends.
//!
//! Shutdown is triggered by the shared `running` flag, which the accept loop
//! checks every 200 ms.

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::{
    accept_async,
    tungstenite::{Error as WsError, Message as WsMessage},
};
use tracing::{debug, error, info, warn};

use crate::application::load_request;
use crate::domain::config::HostConfig;
use crate::domain::envelope::{HostToSandboxMsg, SandboxToHostMsg};
use crate::infrastructure::host_loop::{HostEvent, SessionId};
use crate::infrastructure::sandbox::ChannelSandbox;

/// Capacity of each session's outbound frame queue.
pub const OUTBOUND_QUEUE_CAPACITY: usize = 32;

const ACCEPT_POLL: Duration = Duration::from_millis(200);

// ── Public API ────────────────────────────────────────────────────────────────

/// Binds `config.ws_bind_addr` and serves component connections until
/// `running` is cleared.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound.
pub async fn run_server(
    config: Arc<HostConfig>,
    events: mpsc::Sender<HostEvent>,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    // Bind the component link.  Failing here (port in use, no permission) is
    // the only error that ends the server; everything after is per session.
    let listener = TcpListener::bind(config.ws_bind_addr)
        .await
        .with_context(|| format!("failed to bind component link on {}", config.ws_bind_addr))?;

    info!("waiting for the embedding component on ws://{}", config.ws_bind_addr);
    serve(listener, config, events, running).await;
    Ok(())
}

/// Accept loop over an already-bound listener.
///
/// Split from [`run_server`] so tests can bind port 0 and learn the address.
pub async fn serve(
    listener: TcpListener,
    config: Arc<HostConfig>,
    events: mpsc::Sender<HostEvent>,
    running: Arc<AtomicBool>,
) {
    // Session ids only need to be unique within this process.
    let mut next_session: SessionId = 1;

    loop {
        // Check the shutdown flag before each accept attempt.
        if !running.load(Ordering::Relaxed) {
            info!("shutdown flag set; stopping accept loop");
            break;
        }

        // A short timeout on `accept()` lets the loop notice the flag even
        // when no component is connecting.
        match timeout(ACCEPT_POLL, listener.accept()).await {
            Ok(Ok((stream, peer_addr))) => {
                let session = next_session;
                next_session += 1;
                info!(session, "component connection from {peer_addr}");

                // Each session gets its own task and its own sender clone, so
                // a slow component never delays the accept loop.
                let cfg = Arc::clone(&config);
                let tx = events.clone();
                tokio::spawn(async move {
                    handle_session(stream, peer_addr, session, cfg, tx).await;
                });
            }
            Ok(Err(e)) => {
                // Transient accept error (e.g. too many open file descriptors).
                error!("accept error: {e}");
            }
            Err(_) => {
                // No connection in the last 200 ms; re-check the flag.
            }
        }
    }
}

/// Parses one text frame from the component.
///
/// Returns `None` (and logs) for anything that is not a known frame.
pub fn parse_frame(session: SessionId, text: &str) -> Option<SandboxToHostMsg> {
    match serde_json::from_str(text) {
        Ok(msg) => Some(msg),
        Err(e) => {
            warn!(session, "invalid frame from component: {e}");
            None
        }
    }
}

/// How a read error ends the session.
///
/// A clean close is `Ok`; anything else, protocol violations included, is
/// reported as an error so the session log says why it ended.
fn read_error_outcome(err: WsError) -> anyhow::Result<()> {
    match err {
        WsError::ConnectionClosed => Ok(()),
        WsError::Protocol(e) => Err(anyhow::anyhow!("WebSocket protocol violation: {e}")),
        other => Err(anyhow::Error::new(other).context("WebSocket read failed")),
    }
}

// ── Per-session handler ───────────────────────────────────────────────────────

/// Runs one session and reports how it ended.
///
/// The outer/inner split keeps `?` usable inside [`run_session`] while the
/// logging stays in one place.
async fn handle_session(
    stream: TcpStream,
    peer_addr: SocketAddr,
    session: SessionId,
    config: Arc<HostConfig>,
    events: mpsc::Sender<HostEvent>,
) {
    match run_session(stream, session, &config, &events).await {
        Ok(()) => info!(session, "component {peer_addr} disconnected"),
        Err(e) => warn!(session, "component {peer_addr} closed with error: {e:#}"),
    }
    // The host loop may already be gone during shutdown.
    let _ = events.send(HostEvent::Detached { session }).await;
}

/// The full lifecycle of one component connection.
///
/// # Errors
///
/// Returns an error if the handshake fails, the `Load` frame cannot be sent,
/// the host loop has stopped, or the connection breaks mid-session.
async fn run_session(
    stream: TcpStream,
    session: SessionId,
    config: &HostConfig,
    events: &mpsc::Sender<HostEvent>,
) -> anyhow::Result<()> {
    // ── Step 1: WebSocket handshake ───────────────────────────────────────────
    //
    // `accept_async` answers the HTTP Upgrade request; after it, the stream
    // speaks WebSocket frames.
    let ws_stream = accept_async(stream)
        .await
        .context("WebSocket handshake failed")?;

    // Split into a sink (writer task) and a stream (reader loop below).
    let (mut ws_tx, mut ws_rx) = ws_stream.split();

    // ── Step 2: Load the page ─────────────────────────────────────────────────
    //
    // Sent before the component is attached, so it is always the first frame
    // the component sees.
    let load = serde_json::to_string(&load_request(config)).context("encode Load frame")?;
    ws_tx
        .send(WsMessage::Text(load))
        .await
        .context("send Load frame")?;
    debug!(session, url = %config.page_url, "Load frame sent");

    // ── Step 3: Hand the host loop a push handle ──────────────────────────────
    let (out_tx, mut out_rx) = mpsc::channel::<HostToSandboxMsg>(OUTBOUND_QUEUE_CAPACITY);
    events
        .send(HostEvent::Attached {
            session,
            sandbox: Box::new(ChannelSandbox::new(out_tx)),
        })
        .await
        // SendError<HostEvent> is not Sync, so it cannot carry anyhow context.
        .map_err(|_| anyhow::anyhow!("host loop is not running"))?;

    // ── Step 4: Writer, host pushes → component ───────────────────────────────
    //
    // Ends when the host loop drops the ChannelSandbox (replaced or detached).
    let writer = tokio::spawn(async move {
        while let Some(frame) = out_rx.recv().await {
            let json = match serde_json::to_string(&frame) {
                Ok(j) => j,
                Err(e) => {
                    error!(session, "failed to encode frame: {e}");
                    continue;
                }
            };
            if ws_tx.send(WsMessage::Text(json)).await.is_err() {
                debug!(session, "component gone; writer stopping");
                break;
            }
        }
        let _ = ws_tx.close().await;
    });

    // ── Step 5: Reader, component → host loop ─────────────────────────────────
    let result = loop {
        // `next()` yields `None` once the stream is closed.
        let frame = match ws_rx.next().await {
            Some(Ok(frame)) => frame,
            Some(Err(e)) => break read_error_outcome(e),
            None => break Ok(()),
        };

        match frame {
            WsMessage::Text(text) => {
                // One bad frame does not end the session.
                let Some(msg) = parse_frame(session, &text) else {
                    continue;
                };
                debug!(session, kind = msg.kind(), "frame from component");
                if events.send(HostEvent::Inbound { session, msg }).await.is_err() {
                    break Ok(());
                }
            }
            WsMessage::Binary(_) => warn!(session, "unexpected binary frame (ignored)"),
            WsMessage::Close(_) => break Ok(()),
            // tungstenite answers pings itself.
            WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_) => {}
        }
    };

    writer.abort();
    result
}

// ── Tests ─────────────────────────────────────────────────────────────────────
