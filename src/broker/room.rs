use std::collections::HashMap;

use crate::client::{Client, ConnectionId};
use crate::directory::TopicId;

/// The chat room of one topic: the set of connections currently in it.
///
/// Rooms exist for every topic from startup and are never removed, empty
/// or not.
#[derive(Debug)]
pub struct Room {
    pub topic: TopicId,
    members: HashMap<ConnectionId, Client>,
}

impl Room {
    pub fn new(topic: TopicId) -> Self {
        Self {
            topic,
            members: HashMap::new(),
        }
    }

    /// Adds the client. Returns `false` if it was already a member, in which
    /// case the stored handle is kept.
    pub fn subscribe(&mut self, client: Client) -> bool {
        if self.members.contains_key(&client.id) {
            return false;
        }
        self.members.insert(client.id, client);
        true
    }

    /// Returns `true` if the connection was a member.
    pub fn unsubscribe(&mut self, id: ConnectionId) -> bool {
        self.members.remove(&id).is_some()
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.members.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            topic: self.topic,
            members: self.members.values().cloned().collect(),
        }
    }
}

/// Membership of a room copied out under the table lock.
///
/// Broadcasts iterate over a snapshot so that a slow peer never holds up
/// joins and leaves.
#[derive(Debug, Clone)]
pub struct RoomSnapshot {
    pub topic: TopicId,
    pub members: Vec<Client>,
}

impl RoomSnapshot {
    pub fn count(&self) -> usize {
        self.members.len()
    }

    pub fn contains(&self, id: ConnectionId) -> bool {
        self.members.iter().any(|c| c.id == id)
    }
}
