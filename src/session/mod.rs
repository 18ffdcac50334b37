//! Connection session
//!
//! Per-connection state machine:
//!
//! ```text
//! Connected ──init(valid)──▶ InRoom(t) ──leaving(t)──▶ Connected
//!     │                        │  ▲
//!     │                        └──┘ init(other topic): move rooms
//!     └────────── close (from any state) ──────────▶ Closed
//! ```
//!
//! Every event yields a `Dispatch` describing what happened, including why
//! an event was ignored. Nothing here returns an error to the peer unless
//! `reply_invalid_topic` is enabled.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::broker::{Broker, DeliveryReport};
use crate::client::{Client, ConnectionId};
use crate::directory::TopicId;
use crate::transport::message::{ClientMessage, PresenceStatus, ServerMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connected,
    InRoom(TopicId),
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Unparsable payload or unknown event tag.
    Malformed,
    /// Out of range or missing from the catalog.
    InvalidTopic(i64),
    NotInRoom,
    /// `leaving` named a room other than the current one.
    RoomMismatch { requested: i64 },
    AlreadyClosed,
}

/// What a single event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Joined {
        topic: TopicId,
        members: usize,
        left: Vec<TopicId>,
    },
    Relayed {
        topic: TopicId,
        report: DeliveryReport,
    },
    Left {
        topic: TopicId,
        members: usize,
    },
    Closed {
        rooms: Vec<TopicId>,
    },
    Ignored(IgnoreReason),
}

#[derive(Debug)]
pub struct Session {
    client: Client,
    state: SessionState,
    broker: Arc<Broker>,
}

impl Session {
    /// Enters `Connected` and sends the peer its identity.
    pub fn start(client: Client, broker: Arc<Broker>) -> Self {
        let greeting = ServerMessage::Init {
            clientname: client.identity.to_string(),
        };
        if let Err(e) = client.send_event(&greeting) {
            debug!(connection = client.id, "Failed to send identity: {e}");
        }

        Self {
            client,
            state: SessionState::Connected,
            broker,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.client.id
    }

    pub fn identity(&self) -> &str {
        &self.client.identity
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn handle(&mut self, event: ClientMessage) -> Dispatch {
        if self.state == SessionState::Closed {
            return Dispatch::Ignored(IgnoreReason::AlreadyClosed);
        }

        match event {
            ClientMessage::Init { pokemon } => self.join(pokemon),
            ClientMessage::Message { message, .. } => self.relay(&message),
            ClientMessage::Leaving { pokemon } => self.leave(pokemon),
        }
    }

    /// Terminal transition. Removes the connection from every room and
    /// tells the remaining members. Only the first call has any effect.
    pub fn close(&mut self) -> Dispatch {
        if self.state == SessionState::Closed {
            return Dispatch::Ignored(IgnoreReason::AlreadyClosed);
        }
        self.state = SessionState::Closed;

        let departed = self.broker.rooms().remove_everywhere(self.client.id);
        for room in &departed {
            self.broker
                .fanout()
                .broadcast_membership(room, self.identity(), PresenceStatus::Disconnected);
        }

        let lasted = Utc::now() - self.client.connected_at;
        info!(
            connection = self.client.id,
            rooms = departed.len(),
            seconds = lasted.num_seconds(),
            "Client disconnected"
        );

        Dispatch::Closed {
            rooms: departed.iter().map(|r| r.topic).collect(),
        }
    }

    fn join(&mut self, raw: i64) -> Dispatch {
        let Some(topic) = self.broker.directory().resolve(raw) else {
            return self.invalid_topic(raw);
        };

        let outcome = match self.broker.rooms().join(topic, self.client.clone()) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(connection = self.client.id, "Catalog topic has no room: {e}");
                return self.invalid_topic(raw);
            }
        };
        self.state = SessionState::InRoom(topic);

        let fanout = self.broker.fanout();
        for room in &outcome.left {
            fanout.broadcast_membership(room, self.identity(), PresenceStatus::Disconnected);
        }
        fanout.broadcast_membership(&outcome.joined, self.identity(), PresenceStatus::Connected);

        info!(
            connection = self.client.id,
            topic = %topic,
            label = self.broker.directory().label(topic).unwrap_or_default(),
            members = outcome.joined.count(),
            "Client joined room"
        );

        Dispatch::Joined {
            topic,
            members: outcome.joined.count(),
            left: outcome.left.iter().map(|r| r.topic).collect(),
        }
    }

    fn relay(&self, payload: &str) -> Dispatch {
        let SessionState::InRoom(topic) = self.state else {
            return Dispatch::Ignored(IgnoreReason::NotInRoom);
        };

        let room = match self.broker.rooms().snapshot(topic) {
            Ok(room) => room,
            Err(e) => {
                warn!(connection = self.client.id, "Current room vanished: {e}");
                return Dispatch::Ignored(IgnoreReason::NotInRoom);
            }
        };
        let report = self
            .broker
            .fanout()
            .broadcast_message(&room, payload, self.identity());
        debug!(
            connection = self.client.id,
            topic = %topic,
            delivered = report.delivered,
            failed = report.failed,
            "Relayed message"
        );

        Dispatch::Relayed { topic, report }
    }

    fn leave(&mut self, raw: i64) -> Dispatch {
        let Some(requested) = self.broker.directory().resolve(raw) else {
            return self.invalid_topic(raw);
        };
        let SessionState::InRoom(current) = self.state else {
            return Dispatch::Ignored(IgnoreReason::NotInRoom);
        };
        if requested != current {
            return Dispatch::Ignored(IgnoreReason::RoomMismatch { requested: raw });
        }

        let outcome = match self.broker.rooms().leave(current, self.client.id) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(connection = self.client.id, "Current room vanished: {e}");
                return Dispatch::Ignored(IgnoreReason::NotInRoom);
            }
        };
        self.state = SessionState::Connected;

        if outcome.removed {
            self.broker.fanout().broadcast_membership(
                &outcome.room,
                self.identity(),
                PresenceStatus::Disconnected,
            );
        }
        info!(connection = self.client.id, topic = %current, "Client left room");

        Dispatch::Left {
            topic: current,
            members: outcome.room.count(),
        }
    }

    fn invalid_topic(&self, raw: i64) -> Dispatch {
        if self.broker.options().reply_invalid_topic {
            let reply = ServerMessage::Error {
                message: format!("unknown topic {raw}"),
            };
            if let Err(e) = self.client.send_event(&reply) {
                debug!(connection = self.client.id, "Failed to send error: {e}");
            }
        }
        Dispatch::Ignored(IgnoreReason::InvalidTopic(raw))
    }
}
