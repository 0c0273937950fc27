use rdkafka::error::KafkaError;
use thiserror::Error;
use tokio::task::JoinError;

#[derive(Debug, Error)]
pub enum KafkaRegistryError {
    #[error("Kafka client for broker '{0}' wasn't found")]
    BrokerNotFound(String),

    #[error("Invalid broker settings: {0}")]
    Config(String),

    #[error("While creating kafka client")]
    Client(#[from] KafkaError),

    #[error("While connecting to brokers of '{broker}'")]
    Connect {
        broker: String,
        #[source]
        source: KafkaError,
    },

    #[error("While initializing kafka client for broker '{broker}'")]
    Init {
        broker: String,
        #[source]
        source: Box<KafkaRegistryError>,
    },

    #[error("While fetching metadata for topic '{topic}'")]
    Metadata {
        topic: String,
        #[source]
        source: KafkaError,
    },

    #[error("Topic '{0}' wasn't found")]
    TopicNotFound(String),

    #[error("While sending message to topic '{topic}'")]
    Send {
        topic: String,
        #[source]
        source: KafkaError,
    },

    #[error("Operation was cancelled")]
    Cancelled,

    #[error("While joining blocking task")]
    Join(#[from] JoinError),
}
