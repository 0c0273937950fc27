use crate::client_config::{metadata_config, partition_reader_config};
use crate::consumer::PartitionOffset;
use crate::error::KafkaRegistryError;
use crate::settings::BrokerSettings;
use rdkafka::consumer::stream_consumer::StreamPartitionQueue;
use rdkafka::consumer::{Consumer, DefaultConsumerContext, StreamConsumer};
use rdkafka::error::KafkaError;
use rdkafka::util::Timeout;
use rdkafka::{Offset, TopicPartitionList};
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;
use tracing::trace;

/// Messages of a single partition split off a topic reader.
pub type PartitionQueue = StreamPartitionQueue<DefaultConsumerContext>;

pub struct ConsumerWrapper {
    consumer: Arc<StreamConsumer>,
}

impl ConsumerWrapper {
    /// Creates one reader assigned to every given partition of `topic`, each
    /// starting at its offset.
    pub fn create_for_partitions(
        settings: &BrokerSettings,
        group: &str,
        topic: &str,
        offsets: &[PartitionOffset],
    ) -> Result<Self, KafkaRegistryError> {
        let consumer: StreamConsumer = partition_reader_config(settings, group)?.create()?;

        let mut assignment = TopicPartitionList::with_capacity(offsets.len());
        for offset in offsets {
            assignment.add_partition_offset(
                topic,
                *offset.partition(),
                Offset::Offset(*offset.offset()),
            )?;
        }
        consumer.assign(&assignment)?;

        Ok(Self {
            consumer: Arc::new(consumer),
        })
    }

    pub fn create_for_non_consuming(settings: &BrokerSettings) -> Result<Self, KafkaRegistryError> {
        let consumer: StreamConsumer = metadata_config(settings)?.create()?;

        Ok(Self {
            consumer: Arc::new(consumer),
        })
    }

    /// Moves messages of `partition` to their own queue. Must be called after
    /// the assignment, the main queue still has to be polled for events.
    pub fn split_partition(&self, topic: &str, partition: i32) -> Option<PartitionQueue> {
        self.consumer.split_partition_queue(topic, partition)
    }

    /// Stops fetching `partition`, used once nobody reads its queue anymore.
    pub fn pause_partition(&self, topic: &str, partition: i32) -> Result<(), KafkaError> {
        let mut partitions = TopicPartitionList::with_capacity(1);
        partitions.add_partition(topic, partition);

        self.pause(&partitions)
    }

    /// Blocking. Returns the number of brokers in the cluster.
    pub fn brokers_count(&self, timeout: Duration) -> Result<usize, KafkaError> {
        let metadata = self.fetch_metadata(None, Timeout::After(timeout))?;

        Ok(metadata.brokers().len())
    }

    /// Blocking. Returns partition ids of `topic`.
    pub fn topic_partitions(
        &self,
        topic: &str,
        timeout: Duration,
    ) -> Result<Vec<i32>, KafkaRegistryError> {
        let metadata = self
            .fetch_metadata(Some(topic), Timeout::After(timeout))
            .map_err(|source| KafkaRegistryError::Metadata {
                topic: topic.to_owned(),
                source,
            })?;

        let Some(topic_metadata) = metadata.topics().iter().find(|x| x.name() == topic) else {
            return Err(KafkaRegistryError::TopicNotFound(topic.to_owned()));
        };

        trace!(
            "Got data for topic. Name: {}, partitions: {}, error: {:?}",
            topic_metadata.name(),
            topic_metadata.partitions().len(),
            topic_metadata.error()
        );

        if topic_metadata.error().is_some() || topic_metadata.partitions().is_empty() {
            return Err(KafkaRegistryError::TopicNotFound(topic.to_owned()));
        }

        let mut partitions = topic_metadata
            .partitions()
            .iter()
            .map(|x| x.id())
            .collect::<Vec<_>>();
        partitions.sort_unstable();

        Ok(partitions)
    }

    /// Blocking. Offset the next produced message of the partition will get.
    pub fn newest_offset(
        &self,
        topic: &str,
        partition: i32,
        timeout: Duration,
    ) -> Result<i64, KafkaError> {
        let (_, high) = self.fetch_watermarks(topic, partition, Timeout::After(timeout))?;

        Ok(high)
    }
}

impl Deref for ConsumerWrapper {
    type Target = StreamConsumer;

    fn deref(&self) -> &Self::Target {
        &self.consumer
    }
}
