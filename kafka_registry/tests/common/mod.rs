#![allow(dead_code)]

use kafka_registry::settings::{BrokerSettings, KafkaSettings};
use kafka_registry::{InitMode, KafkaRegistry};
use rdkafka::mocking::MockCluster;
use rdkafka::producer::{DefaultProducerContext, FutureProducer, FutureRecord};
use rdkafka::ClientConfig;
use std::time::Duration;

pub const RECEIVE_TIMEOUT: Duration = Duration::from_secs(10);
pub const GRACE_PERIOD: Duration = Duration::from_secs(5);

pub type TestCluster = MockCluster<'static, DefaultProducerContext>;

pub fn mock_cluster(topic: &str, partitions: i32) -> TestCluster {
    let cluster = MockCluster::new(1).expect("Failed to create mock cluster");
    cluster
        .create_topic(topic, partitions, 1)
        .expect("Failed to create topic");

    cluster
}

pub async fn registry_for(broker: &str, settings: BrokerSettings) -> KafkaRegistry {
    let settings = KafkaSettings::default().with_broker(broker, settings);
    let report = KafkaRegistry::init(&settings, InitMode::AllOrNothing)
        .await
        .expect("Failed to init registry");

    report.registry
}

/// Producer writing to explicit partitions, bypassing the registry.
pub struct TestProducer {
    producer: FutureProducer,
}

impl TestProducer {
    pub fn new(cluster: &TestCluster) -> Self {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", cluster.bootstrap_servers())
            .set("message.timeout.ms", "5000")
            .create()
            .expect("Failed to create test producer");

        Self { producer }
    }

    pub async fn produce(&self, topic: &str, partition: i32, payload: &str) -> i64 {
        let (_, offset) = self
            .producer
            .send(
                FutureRecord::<str, str>::to(topic)
                    .partition(partition)
                    .payload(payload),
                Duration::from_secs(5),
            )
            .await
            .map_err(|(err, _msg)| err)
            .expect("Failed to produce test message");

        offset
    }
}
