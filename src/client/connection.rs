use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc::{self, error::TrySendError};
use tungstenite::protocol::Message as WsMessage;

use crate::transport::message::ServerMessage;
use crate::utils::error::DeliveryError;

/// Process-unique, sequential connection identifier.
pub type ConnectionId = u64;

/// Represents a connected WebSocket peer.
///
/// Outbound frames go through a bounded channel drained by the connection's
/// writer task, so delivery never blocks the caller.
#[derive(Debug, Clone)]
pub struct Client {
    pub id: ConnectionId,

    /// Display identity assigned at accept time.
    pub identity: Arc<str>,

    pub sender: mpsc::Sender<WsMessage>,

    pub connected_at: DateTime<Utc>,
}

impl Client {
    pub fn new(id: ConnectionId, identity: impl Into<Arc<str>>, sender: mpsc::Sender<WsMessage>) -> Self {
        Self {
            id,
            identity: identity.into(),
            sender,
            connected_at: Utc::now(),
        }
    }

    /// Queues a frame without waiting. A closed or saturated queue is a
    /// failed delivery.
    pub fn try_deliver(&self, msg: WsMessage) -> Result<(), DeliveryError> {
        self.sender.try_send(msg).map_err(|e| match e {
            TrySendError::Full(_) => DeliveryError::Full,
            TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }

    pub fn send_event(&self, event: &ServerMessage) -> Result<(), DeliveryError> {
        let text = serde_json::to_string(event)?;
        self.try_deliver(WsMessage::text(text))
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}
