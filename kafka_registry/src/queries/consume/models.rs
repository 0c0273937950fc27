use crate::consumer::PartitionOffset;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use rdkafka::error::KafkaError;
use rdkafka::message::{BorrowedMessage, Headers};
use rdkafka::Message;
use std::borrow::Cow;
use std::sync::Arc;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub topic: String,
    pub partition_offset: PartitionOffset,
    pub timestamp: Option<DateTime<Utc>>,
    pub key: Option<Bytes>,
    pub payload: Option<Bytes>,
    pub headers: Vec<(String, Bytes)>,
}

impl InboundMessage {
    pub fn partition(&self) -> i32 {
        *self.partition_offset.partition()
    }

    pub fn offset(&self) -> i64 {
        *self.partition_offset.offset()
    }

    pub fn payload_lossy(&self) -> Cow<'_, str> {
        match &self.payload {
            Some(payload) => String::from_utf8_lossy(payload),
            None => Cow::Borrowed(""),
        }
    }
}

impl<'a> From<&BorrowedMessage<'a>> for InboundMessage {
    fn from(message: &BorrowedMessage<'a>) -> Self {
        let timestamp = message
            .timestamp()
            .to_millis()
            .and_then(DateTime::from_timestamp_millis);

        let headers = message
            .headers()
            .map(|h| {
                h.iter()
                    .map(|header| {
                        (
                            header.key.to_owned(),
                            header.value.map(Bytes::copy_from_slice).unwrap_or_default(),
                        )
                    })
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        Self {
            topic: message.topic().to_owned(),
            partition_offset: PartitionOffset::new(message.partition(), message.offset()),
            timestamp,
            key: message.key().map(Bytes::copy_from_slice),
            payload: message.payload().map(Bytes::copy_from_slice),
            headers,
        }
    }
}

/// Why a partition task stopped.
#[derive(Debug)]
pub enum PartitionExit {
    Cancelled,
    HandlerFailed(anyhow::Error),
    ReaderFailed(KafkaError),
    Panicked,
    /// The runtime dropped the task before it finished.
    Aborted,
}

/// Tasks started by [`crate::consume`]. Dropping the handle detaches them,
/// they keep running until the cancellation token fires.
#[derive(Debug)]
pub struct FanoutHandle {
    topic: Arc<String>,
    partitions: Vec<i32>,
    reader_task: JoinHandle<Vec<(i32, PartitionExit)>>,
}

impl FanoutHandle {
    pub(crate) fn new(
        topic: Arc<String>,
        partitions: Vec<i32>,
        reader_task: JoinHandle<Vec<(i32, PartitionExit)>>,
    ) -> Self {
        Self {
            topic,
            partitions,
            reader_task,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn partitions(&self) -> Vec<i32> {
        self.partitions.clone()
    }

    /// Waits for every partition task to stop. Exits are ordered by partition.
    pub async fn join(self) -> Vec<(i32, PartitionExit)> {
        match self.reader_task.await {
            Ok(exits) => exits,
            Err(_) => self
                .partitions
                .into_iter()
                .map(|x| (x, PartitionExit::Aborted))
                .collect(),
        }
    }
}
