//! The `broker` module holds the shared chat state: one room per topic,
//! the table that owns them, and the engine that fans events out to room
//! members.

pub mod engine;
pub mod fanout;
pub mod room;
pub mod table;

pub use engine::{Broker, BrokerOptions};
pub use fanout::{Broadcaster, DeliveryReport};
pub use room::{Room, RoomSnapshot};
pub use table::{DEFAULT_MAX_TOPIC_ID, MAX_ROOMS, RoomTable};
