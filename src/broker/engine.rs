//! Broker engine
//!
//! The `Broker` bundles the shared state every session works against: the
//! topic directory, the room table and the broadcast engine. It is built
//! once at startup and shared behind an `Arc`.

use std::sync::Arc;

use crate::broker::fanout::Broadcaster;
use crate::broker::table::RoomTable;
use crate::directory::TopicDirectory;

#[derive(Debug, Default, Clone, Copy)]
pub struct BrokerOptions {
    /// Answer an invalid topic reference with an `error` event instead of
    /// dropping it silently.
    pub reply_invalid_topic: bool,
}

#[derive(Debug)]
pub struct Broker {
    directory: Arc<TopicDirectory>,
    rooms: RoomTable,
    fanout: Broadcaster,
    options: BrokerOptions,
}

impl Broker {
    pub fn new(directory: Arc<TopicDirectory>, rooms: RoomTable) -> Self {
        Self {
            directory,
            rooms,
            fanout: Broadcaster::new(),
            options: BrokerOptions::default(),
        }
    }

    pub fn with_options(mut self, options: BrokerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn directory(&self) -> &TopicDirectory {
        &self.directory
    }

    pub fn rooms(&self) -> &RoomTable {
        &self.rooms
    }

    pub fn fanout(&self) -> &Broadcaster {
        &self.fanout
    }

    pub fn options(&self) -> BrokerOptions {
        self.options
    }
}
