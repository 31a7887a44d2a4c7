//! Upload publishing
//!
//! Owns the message-bus side of the bridge: the transport contract, the
//! Kafka implementation, and the publisher that dispatches completed
//! uploads without ever blocking the protocol path.

pub mod bus;
pub mod kafka;
pub mod memory;
pub mod publisher;
pub mod sink;

pub use bus::{MessageBus, PublishedMessage};
pub use kafka::KafkaBus;
pub use memory::MemoryBus;
pub use publisher::Publisher;
pub use sink::UploadSink;
