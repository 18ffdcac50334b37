//! Connection registry
//!
//! Accepts connections, hands out sequential ids and identities, parses
//! raw frames into events and routes them to the owning session. Each
//! session sits behind its own mutex so that the reader loop and the
//! writer task can both trigger teardown; the session's terminal state
//! makes the second attempt a no-op.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tungstenite::protocol::Message as WsMessage;

use crate::broker::{Broker, BrokerOptions, MAX_ROOMS, RoomTable};
use crate::client::{Client, ConnectionId};
use crate::config::Settings;
use crate::directory::{Dataset, TopicDirectory};
use crate::session::{Dispatch, IgnoreReason, Session};
use crate::transport::message::ClientMessage;
use crate::utils::error::AppError;

pub type SharedSession = Arc<Mutex<Session>>;

#[derive(Debug)]
pub struct Registry {
    broker: Arc<Broker>,
    next_id: AtomicU64,
    live: Mutex<HashSet<ConnectionId>>,
    max_connections: usize,
    outbound_buffer: usize,
}

impl Registry {
    pub fn new(broker: Arc<Broker>, max_connections: usize, outbound_buffer: usize) -> Self {
        Self {
            broker,
            next_id: AtomicU64::new(1),
            live: Mutex::new(HashSet::new()),
            max_connections,
            outbound_buffer: outbound_buffer.max(1),
        }
    }

    /// Wires the dataset, directory, room table and broker from settings.
    ///
    /// The room table must cover every catalog number; a configured size
    /// below the dataset's highest number, or any size above `MAX_ROOMS`,
    /// is a startup error.
    pub fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        let dataset = Dataset::load_or_bundled(settings.dataset.path.as_deref())?;
        let directory = TopicDirectory::new(dataset)?;

        let dataset_max = directory.max_topic_id();
        let table_size = settings.broker.max_topic_id.unwrap_or(dataset_max);
        if table_size < dataset_max {
            return Err(AppError::RoomTableTooSmall {
                configured: table_size as usize,
                dataset_max,
            });
        }
        if table_size > MAX_ROOMS {
            return Err(AppError::RoomTableTooLarge {
                requested: table_size,
                limit: MAX_ROOMS,
            });
        }
        info!(
            entries = directory.dataset().count(),
            rooms = table_size,
            "Topic directory loaded"
        );

        let broker = Broker::new(Arc::new(directory), RoomTable::new(table_size)).with_options(
            BrokerOptions {
                reply_invalid_topic: settings.broker.reply_invalid_topic,
            },
        );

        Ok(Self::new(
            Arc::new(broker),
            settings.broker.max_connections,
            settings.broker.outbound_buffer,
        ))
    }

    pub fn broker(&self) -> &Arc<Broker> {
        &self.broker
    }

    /// Capacity for each connection's outbound queue.
    pub fn outbound_buffer(&self) -> usize {
        self.outbound_buffer
    }

    /// Number of connections accepted and not yet closed.
    pub fn live(&self) -> usize {
        self.lock_live().len()
    }

    /// Registers a new connection and starts its session, which greets the
    /// peer with its identity. Returns `None` when the server is full.
    pub fn accept(&self, sender: mpsc::Sender<WsMessage>) -> Option<SharedSession> {
        let mut live = self.lock_live();
        if live.len() >= self.max_connections {
            warn!(limit = self.max_connections, "Connection refused: server full");
            return None;
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let identity = self.broker.directory().random_identity();
        let client = Client::new(id, identity, sender);
        live.insert(id);
        drop(live);

        info!(connection = id, identity = %client.identity, "New connection");
        let session = Session::start(client, self.broker.clone());
        Some(Arc::new(Mutex::new(session)))
    }

    /// Parses and routes one text frame. Malformed payloads are logged and
    /// dropped; the connection stays open.
    pub fn on_message(&self, session: &SharedSession, raw: &str) -> Dispatch {
        let mut session = lock_session(session);
        let event = match ClientMessage::parse(raw) {
            Ok(event) => event,
            Err(err) => {
                debug!(
                    connection = session.id(),
                    "Invalid client message: {err} | {}",
                    raw.chars().take(100).collect::<String>()
                );
                return Dispatch::Ignored(IgnoreReason::Malformed);
            }
        };

        let dispatch = session.handle(event);
        if let Dispatch::Ignored(reason) = &dispatch {
            debug!(connection = session.id(), ?reason, "Event ignored");
        }
        dispatch
    }

    /// Tears the session down. Safe to call any number of times.
    pub fn on_close(&self, session: &SharedSession) -> Dispatch {
        let mut session = lock_session(session);
        let dispatch = session.close();
        if matches!(dispatch, Dispatch::Closed { .. }) {
            self.lock_live().remove(&session.id());
        }
        dispatch
    }

    fn lock_live(&self) -> MutexGuard<'_, HashSet<ConnectionId>> {
        self.live.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn lock_session(session: &SharedSession) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}
