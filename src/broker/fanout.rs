//! Broadcast engine
//!
//! Delivers one event to every member of a room snapshot. Each recipient
//! is attempted independently: a closed or saturated peer is logged and
//! counted, and delivery continues with the rest of the room.

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, error};
use tungstenite::protocol::Message as WsMessage;

use crate::broker::room::RoomSnapshot;
use crate::transport::message::{PresenceStatus, ServerMessage};

/// Outcome of a single broadcast.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub failed: usize,
}

impl DeliveryReport {
    pub fn attempted(&self) -> usize {
        self.delivered + self.failed
    }
}

#[derive(Debug, Default)]
pub struct Broadcaster {
    delivered: AtomicUsize,
    failed: AtomicUsize,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends a `majuser` roster update. `newnb` is the snapshot's count.
    pub fn broadcast_membership(
        &self,
        room: &RoomSnapshot,
        who: &str,
        status: PresenceStatus,
    ) -> DeliveryReport {
        let event = ServerMessage::MajUser {
            newnb: room.count(),
            who: who.to_string(),
            status,
        };
        self.fan_out(room, &event)
    }

    /// Relays a chat message. The sender, if a member, gets its own echo.
    pub fn broadcast_message(&self, room: &RoomSnapshot, payload: &str, from: &str) -> DeliveryReport {
        let event = ServerMessage::Message {
            message: payload.to_string(),
            from: from.to_string(),
        };
        self.fan_out(room, &event)
    }

    /// Cumulative counts since startup.
    pub fn totals(&self) -> DeliveryReport {
        DeliveryReport {
            delivered: self.delivered.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }

    fn fan_out(&self, room: &RoomSnapshot, event: &ServerMessage) -> DeliveryReport {
        let text = match serde_json::to_string(event) {
            Ok(json) => json,
            Err(e) => {
                error!(topic = %room.topic, "Failed to serialize event: {e}");
                return DeliveryReport {
                    delivered: 0,
                    failed: room.count(),
                };
            }
        };
        let frame = WsMessage::text(text);

        let mut report = DeliveryReport::default();
        for client in &room.members {
            match client.try_deliver(frame.clone()) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    debug!(topic = %room.topic, connection = client.id, "Delivery failed: {e}");
                    report.failed += 1;
                }
            }
        }

        self.delivered.fetch_add(report.delivered, Ordering::Relaxed);
        self.failed.fetch_add(report.failed, Ordering::Relaxed);
        report
    }
}
