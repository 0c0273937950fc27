use crate::consumer::{ConsumerWrapper, PartitionOffset};
use crate::error::KafkaRegistryError;
use crate::producer::{ProducerWrapper, RoundRobinCursor};
use crate::settings::BrokerSettings;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const DEFAULT_METADATA_TIMEOUT: Duration = Duration::from_secs(5);

/// Live handles of one named broker: the metadata connection, the synchronous
/// producer and the settings topic readers are opened with.
pub struct KafkaClient {
    name: String,
    settings: BrokerSettings,
    connection: Arc<ConsumerWrapper>,
    producer: ProducerWrapper,
    round_robin: RoundRobinCursor,
}

impl KafkaClient {
    /// Creates all handles and checks the brokers answer a metadata request.
    #[tracing::instrument(skip(settings))]
    pub async fn connect(
        name: &str,
        settings: &BrokerSettings,
    ) -> Result<Arc<Self>, KafkaRegistryError> {
        let connection = Arc::new(ConsumerWrapper::create_for_non_consuming(settings)?);
        let producer = ProducerWrapper::create(settings)?;

        let client = Arc::new(Self {
            name: name.to_owned(),
            settings: settings.clone(),
            connection,
            producer,
            round_robin: RoundRobinCursor::default(),
        });

        let connection = client.connection.clone();
        let timeout = client.metadata_timeout();
        let brokers_count = tokio::task::spawn_blocking(move || connection.brokers_count(timeout))
            .await?
            .map_err(|source| KafkaRegistryError::Connect {
                broker: name.to_owned(),
                source,
            })?;

        info!(
            "Connected to broker '{}'. Address: {}, brokers in cluster: {}",
            name, client.settings.address, brokers_count
        );

        Ok(client)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn settings(&self) -> &BrokerSettings {
        &self.settings
    }

    pub fn producer(&self) -> &ProducerWrapper {
        &self.producer
    }

    pub fn connection(&self) -> &ConsumerWrapper {
        &self.connection
    }

    pub async fn topic_partitions(&self, topic: &str) -> Result<Vec<i32>, KafkaRegistryError> {
        let connection = self.connection.clone();
        let topic = topic.to_owned();
        let timeout = self.metadata_timeout();

        tokio::task::spawn_blocking(move || connection.topic_partitions(&topic, timeout)).await?
    }

    pub async fn newest_offset(
        &self,
        topic: &str,
        partition: i32,
    ) -> Result<i64, KafkaRegistryError> {
        let connection = self.connection.clone();
        let topic = topic.to_owned();
        let timeout = self.metadata_timeout();

        tokio::task::spawn_blocking(move || {
            connection
                .newest_offset(&topic, partition, timeout)
                .map_err(|source| KafkaRegistryError::Metadata { topic, source })
        })
        .await?
    }

    /// Opens one reader for the given partitions of `topic`, each assigned at
    /// its offset. Partition queues are split off it by the caller.
    pub fn open_topic_reader(
        &self,
        group: &str,
        topic: &str,
        offsets: &[PartitionOffset],
    ) -> Result<ConsumerWrapper, KafkaRegistryError> {
        ConsumerWrapper::create_for_partitions(&self.settings, group, topic, offsets)
    }

    /// Partition for the next keyless message of a round-robin broker. The
    /// partition count is fetched again once the recorded one is stale.
    pub async fn next_round_robin_partition(&self, topic: &str) -> Result<i32, KafkaRegistryError> {
        if self.round_robin.partitions_count(topic).is_none() {
            let partitions_count = self.topic_partitions(topic).await?.len() as i32;
            self.round_robin.set_partitions_count(topic, partitions_count);
        }

        Ok(self.round_robin.next_partition(topic))
    }

    fn metadata_timeout(&self) -> Duration {
        self.settings
            .read_timeout()
            .unwrap_or(DEFAULT_METADATA_TIMEOUT)
    }
}

impl Debug for KafkaClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KafkaClient")
            .field("name", &self.name)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
