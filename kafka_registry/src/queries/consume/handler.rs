use crate::consumer::{ConsumerWrapper, PartitionOffset, PartitionQueue};
use crate::error::KafkaRegistryError;
use crate::queries::consume::{FanoutHandle, InboundMessage, MessageHandler, PartitionExit};
use crate::registry::KafkaRegistry;
use rdkafka::Message;
use std::sync::Arc;
use tokio::select;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, trace, warn, Instrument};
use uuid::Uuid;

/// Starts one reader task per partition of `topic`, each beginning at the
/// newest offset, and returns once all of them are spawned.
///
/// All partitions share a single consumer: it is assigned every partition and
/// each task gets the partition's own queue split off it.
///
/// Only setup failures are returned. A partition whose offset or queue can't
/// be obtained is logged and skipped, runtime failures stop their partition only.
#[tracing::instrument(skip(registry, cancellation_token, handler))]
pub async fn consume<H: MessageHandler>(
    registry: &KafkaRegistry,
    cancellation_token: CancellationToken,
    broker: &str,
    topic: &str,
    handler: H,
) -> Result<FanoutHandle, KafkaRegistryError> {
    let client = registry.get_client(broker)?;
    let partitions = client.topic_partitions(topic).await?;

    let mut offsets = Vec::with_capacity(partitions.len());
    for partition in partitions {
        match client.newest_offset(topic, partition).await {
            Ok(offset) => offsets.push(PartitionOffset::new(partition, offset)),
            Err(e) => {
                info!(
                    "Get offset failed. Topic: {}, partition: {}. {:?}",
                    topic, partition, e
                );
            }
        }
    }

    let group = format!("kafka-registry-{}", Uuid::now_v7());
    let reader = client.open_topic_reader(&group, topic, &offsets)?;
    let topic = Arc::new(topic.to_owned());
    let handler = Arc::new(handler);

    debug!(
        "Starting {} partition readers for topic {}",
        offsets.len(),
        topic
    );

    let mut supervisors = JoinSet::new();
    let mut started = Vec::with_capacity(offsets.len());
    for partition_offset in offsets {
        let partition = *partition_offset.partition();
        let offset = *partition_offset.offset();

        let Some(queue) = reader.split_partition(&topic, partition) else {
            info!(
                "Split partition queue failed. Topic: {}, partition: {}",
                topic, partition
            );
            continue;
        };

        let future = read_partition(
            queue,
            topic.clone(),
            partition,
            handler.clone(),
            cancellation_token.clone(),
        )
        .instrument(info_span!("Consuming partition", partition, offset).or_current());

        let worker = tokio::task::spawn(future);
        supervisors.spawn(supervise(worker, topic.clone(), partition));
        started.push(partition);
    }

    let reader_task = tokio::task::spawn(
        serve_reader(reader, supervisors, topic.clone())
            .instrument(info_span!("Serving topic reader").or_current()),
    );

    Ok(FanoutHandle::new(topic, started, reader_task))
}

// Partition queues only get messages while the main queue is polled, so the
// reader is served here until the last partition task stops.
async fn serve_reader(
    reader: ConsumerWrapper,
    mut supervisors: JoinSet<(i32, PartitionExit)>,
    topic: Arc<String>,
) -> Vec<(i32, PartitionExit)> {
    let mut exits = Vec::with_capacity(supervisors.len());

    loop {
        select! {
            joined = supervisors.join_next() => match joined {
                Some(Ok((partition, exit))) => {
                    if let Err(e) = reader.pause_partition(&topic, partition) {
                        debug!("Pause partition failed. Topic: {}, partition: {}. {:?}", topic, partition, e);
                    }
                    exits.push((partition, exit));
                }
                Some(Err(e)) => {
                    error!("Partition supervisor stopped unexpectedly. Topic: {}. {:?}", topic, e);
                }
                None => break,
            },
            event = reader.recv() => match event {
                Ok(message) => {
                    debug!(
                        "Skipped message outside of partition queues. Partition: {}, offset: {}",
                        message.partition(),
                        message.offset()
                    );
                }
                Err(e) => {
                    warn!("Topic reader reported an error. Topic: {}. {:?}", topic, e);
                }
            },
        }
    }

    exits.sort_by_key(|(partition, _)| *partition);
    exits
}

async fn read_partition<H: MessageHandler>(
    queue: PartitionQueue,
    topic: Arc<String>,
    partition: i32,
    handler: Arc<H>,
    cancellation_token: CancellationToken,
) -> PartitionExit {
    loop {
        let message_result = select! {
            biased;
            _ = cancellation_token.cancelled() => {
                info!("Consuming was cancelled");
                return PartitionExit::Cancelled;
            }
            msg = queue.recv() => {
                msg.map(|x| InboundMessage::from(&x))
            }
        };

        let message = match message_result {
            Ok(message) => message,
            Err(e) => {
                error!(
                    "Error while reading message from kafka. Topic: {}, partition: {}. {:?}",
                    topic, partition, e
                );
                return PartitionExit::ReaderFailed(e);
            }
        };

        if cancellation_token.is_cancelled() {
            info!("Consuming was cancelled");
            return PartitionExit::Cancelled;
        }

        trace!(
            "New message. Topic: '{}', partition: {}, offset: {}",
            message.topic,
            message.partition(),
            message.offset(),
        );

        let partition_offset = message.partition_offset;
        if let Err(e) = handler.handle(message).await {
            error!(
                "Message handler failed, partition consuming stopped. Topic: {}, metadata: {:?}. {:?}",
                topic, partition_offset, e
            );
            return PartitionExit::HandlerFailed(e);
        }
    }
}

// The partition queue lives inside the worker future, so it is released on
// every exit path including a panicking handler.
async fn supervise(
    worker: JoinHandle<PartitionExit>,
    topic: Arc<String>,
    partition: i32,
) -> (i32, PartitionExit) {
    let exit = match worker.await {
        Ok(exit) => exit,
        Err(e) if e.is_panic() => {
            error!(
                "Panic occurred while consuming kafka messages. Topic: {}, partition: {}",
                topic, partition
            );
            PartitionExit::Panicked
        }
        Err(e) => {
            error!(
                "Partition task was aborted. Topic: {}, partition: {}. {:?}",
                topic, partition, e
            );
            PartitionExit::Aborted
        }
    };

    (partition, exit)
}
