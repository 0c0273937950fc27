pub mod client_config;
pub mod commands;
pub mod consumer;
pub mod error;
pub mod producer;
pub mod queries;
pub mod registry;
pub mod settings;

pub use commands::send_message::{send_message, send_message_partitioned};
pub use error::KafkaRegistryError;
pub use queries::consume::{consume, FanoutHandle, InboundMessage, MessageHandler, PartitionExit};
pub use registry::{InitMode, InitReport, KafkaClient, KafkaRegistry};
