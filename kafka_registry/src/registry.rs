mod kafka_client;
mod kafka_registry;

pub use kafka_client::*;
pub use kafka_registry::*;
