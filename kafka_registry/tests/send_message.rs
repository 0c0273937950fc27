mod common;

use common::{mock_cluster, registry_for};
use kafka_registry::settings::{BrokerSettings, Partitioner};
use kafka_registry::{send_message, send_message_partitioned, KafkaRegistry, KafkaRegistryError};
use rdkafka::consumer::{BaseConsumer, Consumer};
use rdkafka::ClientConfig;
use std::collections::HashSet;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn unknown_broker_fails_without_network_call() {
    let registry = KafkaRegistry::default();
    let token = CancellationToken::new();

    let result = send_message(&registry, &token, "ghost", "t1", "hello").await;

    assert!(matches!(result, Err(KafkaRegistryError::BrokerNotFound(name)) if name == "ghost"));
}

#[tokio::test(flavor = "multi_thread")]
async fn same_key_goes_to_same_partition() {
    let cluster = mock_cluster("t1", 3);
    let registry = registry_for("b1", BrokerSettings::new(cluster.bootstrap_servers())).await;
    let token = CancellationToken::new();

    let mut partitions = HashSet::new();
    let mut offsets = vec![];
    for i in 0..5 {
        let delivered = send_message_partitioned(
            &registry,
            &token,
            "b1",
            "t1",
            format!("hello world {i}"),
            "user-42",
        )
        .await
        .expect("Send should succeed");

        partitions.insert(*delivered.partition());
        offsets.push(*delivered.offset());
    }

    assert_eq!(partitions.len(), 1);
    assert!(offsets.windows(2).all(|x| x[0] < x[1]));
}

#[tokio::test(flavor = "multi_thread")]
async fn round_robin_spreads_keyless_messages() {
    let cluster = mock_cluster("t1", 3);
    let mut settings = BrokerSettings::new(cluster.bootstrap_servers());
    settings.partitioner = Partitioner::RoundRobin;
    let registry = registry_for("b1", settings).await;
    let token = CancellationToken::new();

    let mut partitions = vec![];
    for i in 0..6 {
        let delivered = send_message(&registry, &token, "b1", "t1", format!("hello world {i}"))
            .await
            .expect("Send should succeed");
        partitions.push(*delivered.partition());
    }

    let first_round = partitions[..3].iter().collect::<HashSet<_>>();
    assert_eq!(first_round.len(), 3);
    assert_eq!(partitions[..3], partitions[3..]);
}

#[tokio::test(flavor = "multi_thread")]
async fn send_with_cancelled_token_is_not_attempted() {
    let cluster = mock_cluster("t1", 1);
    let registry = registry_for("b1", BrokerSettings::new(cluster.bootstrap_servers())).await;
    let token = CancellationToken::new();
    token.cancel();

    let result = send_message(&registry, &token, "b1", "t1", "hello").await;

    assert!(matches!(result, Err(KafkaRegistryError::Cancelled)));
    assert_eq!(high_watermark(&cluster.bootstrap_servers(), "t1", 0), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn cancellation_during_send_still_reports_delivery() {
    let cluster = mock_cluster("t1", 1);
    let mut settings = BrokerSettings::new(cluster.bootstrap_servers());
    settings.write_timeout = 30;
    let registry = registry_for("b1", settings).await;
    let token = CancellationToken::new();
    send_message(&registry, &token, "b1", "t1", "warm up")
        .await
        .expect("Send should succeed");

    cluster
        .broker_round_trip_time(1, Duration::from_millis(1500))
        .expect("Failed to slow down broker");

    let cancel = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        cancel.cancel();
    });

    let delivered = send_message(&registry, &token, "b1", "t1", "hello")
        .await
        .expect("Message handed to the producer should be reported as delivered");

    assert!(token.is_cancelled());
    assert_eq!(*delivered.partition(), 0);
    assert_eq!(*delivered.offset(), 1);

    cluster
        .broker_round_trip_time(1, Duration::ZERO)
        .expect("Failed to restore broker");
    assert_eq!(high_watermark(&cluster.bootstrap_servers(), "t1", 0), 2);
}

fn high_watermark(bootstrap_servers: &str, topic: &str, partition: i32) -> i64 {
    let consumer: BaseConsumer = ClientConfig::new()
        .set("bootstrap.servers", bootstrap_servers)
        .create()
        .expect("Failed to create watermark consumer");

    let (_, high) = consumer
        .fetch_watermarks(topic, partition, Duration::from_secs(5))
        .expect("Failed to fetch watermarks");

    high
}
