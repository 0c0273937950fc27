use bytes::Bytes;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub topic: String,
    pub value: Bytes,
    pub partition_key: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl OutboundMessage {
    /// An empty `partition_key` leaves the partition choice to the partitioner.
    pub fn new(topic: &str, value: impl Into<Bytes>, partition_key: &str) -> Self {
        Self {
            topic: topic.to_owned(),
            value: value.into(),
            partition_key: (!partition_key.is_empty()).then(|| partition_key.to_owned()),
            timestamp: Utc::now(),
        }
    }
}
