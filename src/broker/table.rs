//! Room table
//!
//! One room per topic id, allocated up front and addressed by
//! `topic - 1`. A single mutex guards every room so that moving a
//! connection between rooms is atomic: no observer ever sees it in two
//! rooms at once.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::broker::room::{Room, RoomSnapshot};
use crate::client::{Client, ConnectionId};
use crate::directory::TopicId;
use crate::utils::error::RoomError;

/// Table size when no dataset or configuration says otherwise.
pub const DEFAULT_MAX_TOPIC_ID: u32 = 151;

/// Largest table `from_settings` will allocate. Rooms are pre-allocated
/// per number, so a sparse catalog with a huge number would otherwise
/// exhaust memory.
pub const MAX_ROOMS: u32 = 65_536;

#[derive(Debug)]
pub struct JoinOutcome {
    /// The target room after the join.
    pub joined: RoomSnapshot,
    /// Rooms the connection was moved out of, after removal.
    pub left: Vec<RoomSnapshot>,
    pub already_member: bool,
}

#[derive(Debug)]
pub struct LeaveOutcome {
    pub removed: bool,
    pub room: RoomSnapshot,
}

#[derive(Debug)]
pub struct RoomTable {
    rooms: Mutex<Vec<Room>>,
}

impl RoomTable {
    pub fn new(max_topic_id: u32) -> Self {
        let rooms = (1..=max_topic_id)
            .filter_map(TopicId::new)
            .map(Room::new)
            .collect();
        Self {
            rooms: Mutex::new(rooms),
        }
    }

    pub fn capacity(&self) -> usize {
        self.lock().len()
    }

    /// Moves the client into `topic`'s room, removing it from whatever room
    /// it occupied before. The caller validates `topic` against the
    /// directory first.
    pub fn join(&self, topic: TopicId, client: Client) -> Result<JoinOutcome, RoomError> {
        let mut rooms = self.lock();
        let capacity = rooms.len();
        if topic.index() >= capacity {
            return Err(RoomError::OutOfRange { topic, capacity });
        }

        let mut left = Vec::new();
        for room in rooms.iter_mut().filter(|r| r.topic != topic) {
            if room.unsubscribe(client.id) {
                left.push(room.snapshot());
            }
        }

        let room = Self::slot(&mut rooms, topic)?;
        let already_member = !room.subscribe(client);
        Ok(JoinOutcome {
            joined: room.snapshot(),
            left,
            already_member,
        })
    }

    /// Removes the connection from `topic`'s room. A no-op if it is not there.
    pub fn leave(&self, topic: TopicId, id: ConnectionId) -> Result<LeaveOutcome, RoomError> {
        let mut rooms = self.lock();
        let room = Self::slot(&mut rooms, topic)?;
        let removed = room.unsubscribe(id);
        Ok(LeaveOutcome {
            removed,
            room: room.snapshot(),
        })
    }

    /// Scans every room and removes the connection wherever it is found.
    pub fn remove_everywhere(&self, id: ConnectionId) -> Vec<RoomSnapshot> {
        let mut rooms = self.lock();
        rooms
            .iter_mut()
            .filter_map(|room| room.unsubscribe(id).then(|| room.snapshot()))
            .collect()
    }

    pub fn snapshot(&self, topic: TopicId) -> Result<RoomSnapshot, RoomError> {
        let mut rooms = self.lock();
        Ok(Self::slot(&mut rooms, topic)?.snapshot())
    }

    pub fn member_count(&self, topic: TopicId) -> Result<usize, RoomError> {
        let mut rooms = self.lock();
        Ok(Self::slot(&mut rooms, topic)?.len())
    }

    /// Topics whose room currently holds the connection.
    pub fn rooms_of(&self, id: ConnectionId) -> Vec<TopicId> {
        self.lock()
            .iter()
            .filter(|room| room.contains(id))
            .map(|room| room.topic)
            .collect()
    }

    pub fn total_members(&self) -> usize {
        self.lock().iter().map(Room::len).sum()
    }

    fn slot(rooms: &mut [Room], topic: TopicId) -> Result<&mut Room, RoomError> {
        let capacity = rooms.len();
        rooms
            .get_mut(topic.index())
            .ok_or(RoomError::OutOfRange { topic, capacity })
    }

    // Room state stays consistent across a panicking holder: every
    // mutation is a single map insert or remove.
    fn lock(&self) -> MutexGuard<'_, Vec<Room>> {
        self.rooms.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for RoomTable {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TOPIC_ID)
    }
}
