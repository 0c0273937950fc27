use crate::commands::send_message::OutboundMessage;
use crate::consumer::PartitionOffset;
use crate::error::KafkaRegistryError;
use crate::registry::KafkaRegistry;
use crate::settings::Partitioner;
use bytes::Bytes;
use rdkafka::producer::FutureRecord;
use rdkafka::util::Timeout;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const SEND_QUEUE_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn send_message(
    registry: &KafkaRegistry,
    cancellation_token: &CancellationToken,
    broker: &str,
    topic: &str,
    value: impl Into<Bytes>,
) -> Result<PartitionOffset, KafkaRegistryError> {
    send_message_partitioned(registry, cancellation_token, broker, topic, value, "").await
}

/// Sends one message and waits for its delivery report.
///
/// The token is checked once, before the message is handed to the producer.
/// After that the delivery report is always awaited, so the result tells
/// whether the broker stored the message.
#[tracing::instrument(skip(registry, cancellation_token, value))]
pub async fn send_message_partitioned(
    registry: &KafkaRegistry,
    cancellation_token: &CancellationToken,
    broker: &str,
    topic: &str,
    value: impl Into<Bytes>,
    partition_key: &str,
) -> Result<PartitionOffset, KafkaRegistryError> {
    let client = registry.get_client(broker)?;
    let message = OutboundMessage::new(topic, value, partition_key);

    let partition = match (client.settings().partitioner, &message.partition_key) {
        (Partitioner::RoundRobin, None) => Some(client.next_round_robin_partition(topic).await?),
        _ => None,
    };

    let mut record = FutureRecord::<str, [u8]>::to(&message.topic)
        .payload(&message.value[..])
        .timestamp(message.timestamp.timestamp_millis());

    if let Some(key) = message.partition_key.as_deref() {
        record = record.key(key);
    }
    if let Some(partition) = partition {
        record = record.partition(partition);
    }

    if cancellation_token.is_cancelled() {
        warn!("Sending to topic {} was cancelled", message.topic);
        return Err(KafkaRegistryError::Cancelled);
    }

    let (partition, offset) = client
        .producer()
        .send(record, Timeout::After(SEND_QUEUE_TIMEOUT))
        .await
        .map_err(|(source, _)| KafkaRegistryError::Send {
            topic: message.topic.clone(),
            source,
        })?;

    debug!(partition, offset, "Send message success");

    Ok(PartitionOffset::new(partition, offset))
}
