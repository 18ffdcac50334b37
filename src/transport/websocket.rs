//! WebSocket transport
//!
//! Each accepted connection is split in two:
//! - a writer task draining the connection's bounded outbound queue into
//!   the socket
//! - the reader loop, forwarding text frames to the registry
//!
//! Whichever side finishes first tears the session down; the registry
//! makes the second teardown a no-op. When the reader finishes, the writer
//! gets a short grace period to flush queued frames and the close reply.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::accept_async;
use tracing::{debug, info, warn};
use tungstenite::protocol::Message as WsMessage;

use crate::registry::Registry;
use crate::utils::error::AppError;

/// Back-off after a failed `accept`, e.g. when out of file descriptors.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// How long the writer may keep flushing after the reader has finished.
const WRITER_DRAIN: Duration = Duration::from_millis(500);

pub async fn start_websocket_server(addr: &str, registry: Arc<Registry>) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| AppError::Bind {
            addr: addr.to_string(),
            source,
        })?;

    info!("WebSocket server listening on ws://{addr}");
    serve(listener, registry).await;
    Ok(())
}

/// Runs the accept loop on an already bound listener. Never returns.
pub async fn serve(listener: TcpListener, registry: Arc<Registry>) {
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!("Failed to accept connection: {e}");
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                continue;
            }
        };

        let registry = registry.clone();
        tokio::spawn(handle_connection(stream, peer, registry));
    }
}

async fn handle_connection(stream: TcpStream, peer: SocketAddr, registry: Arc<Registry>) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!(%peer, "WebSocket handshake error: {e}");
            return;
        }
    };

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let (tx, mut rx) = mpsc::channel::<WsMessage>(registry.outbound_buffer());

    let Some(session) = registry.accept(tx) else {
        let _ = ws_sender.send(WsMessage::Close(None)).await;
        return;
    };

    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
    let mut writer = {
        let registry = registry.clone();
        let session = session.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    msg = rx.recv() => {
                        let Some(msg) = msg else { break };
                        if let Err(e) = ws_sender.send(msg).await {
                            debug!(%peer, "Failed to send message: {e}");
                            break;
                        }
                    }
                    _ = &mut shutdown_rx => {
                        while let Ok(msg) = rx.try_recv() {
                            if ws_sender.send(msg).await.is_err() {
                                break;
                            }
                        }
                        // also flushes the close reply queued by the reader
                        let _ = ws_sender.close().await;
                        break;
                    }
                }
            }
            registry.on_close(&session);
        })
    };

    while let Some(frame) = ws_receiver.next().await {
        match frame {
            Ok(WsMessage::Text(text)) => {
                registry.on_message(&session, text.as_str());
            }
            Ok(WsMessage::Binary(_)) => {
                debug!(%peer, "Binary frame dropped");
            }
            Ok(WsMessage::Close(_)) => break,
            // ping/pong are answered by tungstenite
            Ok(_) => {}
            Err(e) => {
                debug!(%peer, "WebSocket read error: {e}");
                break;
            }
        }
    }

    registry.on_close(&session);
    let _ = shutdown_tx.send(());
    // a peer that stopped reading must not pin the task
    if tokio::time::timeout(WRITER_DRAIN, &mut writer).await.is_err() {
        debug!(%peer, "Writer did not drain in time");
        writer.abort();
    }
}
