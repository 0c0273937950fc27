mod common;

use common::{mock_cluster, registry_for};
use kafka_registry::settings::{BrokerSettings, KafkaSettings};
use kafka_registry::{InitMode, KafkaRegistry, KafkaRegistryError};

fn unreachable_broker() -> BrokerSettings {
    let mut settings = BrokerSettings::new("127.0.0.1:1");
    settings.read_timeout = 1;
    settings
}

#[tokio::test(flavor = "multi_thread")]
async fn known_broker_is_registered() {
    let cluster = mock_cluster("t1", 1);

    let registry = registry_for("b1", BrokerSettings::new(cluster.bootstrap_servers())).await;

    let client = registry.get_client("b1").expect("Client should be registered");
    assert_eq!(client.name(), "b1");
    assert_eq!(registry.broker_names(), vec!["b1"]);
    assert_eq!(registry.len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_broker_is_not_found() {
    let cluster = mock_cluster("t1", 1);
    let registry = registry_for("b1", BrokerSettings::new(cluster.bootstrap_servers())).await;

    let result = registry.get_client("ghost");

    assert!(matches!(result, Err(KafkaRegistryError::BrokerNotFound(name)) if name == "ghost"));
}

#[tokio::test(flavor = "multi_thread")]
async fn partial_init_reports_failed_brokers() {
    let cluster = mock_cluster("t1", 1);
    let settings = KafkaSettings::default()
        .with_broker("bad", unreachable_broker())
        .with_broker("empty", BrokerSettings::new(" "))
        .with_broker("good", BrokerSettings::new(cluster.bootstrap_servers()));

    let report = KafkaRegistry::init(&settings, InitMode::Partial)
        .await
        .expect("Partial init never fails as a whole");

    assert_eq!(report.registry.broker_names(), vec!["good"]);

    let mut failed = report
        .failures
        .iter()
        .map(|x| x.broker.as_str())
        .collect::<Vec<_>>();
    failed.sort_unstable();
    assert_eq!(failed, vec!["bad", "empty"]);

    let empty = report.failures.iter().find(|x| x.broker == "empty").unwrap();
    assert!(matches!(empty.error, KafkaRegistryError::Config(_)));
    let bad = report.failures.iter().find(|x| x.broker == "bad").unwrap();
    assert!(matches!(bad.error, KafkaRegistryError::Connect { .. }));
}

#[tokio::test(flavor = "multi_thread")]
async fn all_or_nothing_init_fails_on_first_broker_error() {
    let cluster = mock_cluster("t1", 1);
    let settings = KafkaSettings::default()
        .with_broker("bad", unreachable_broker())
        .with_broker("good", BrokerSettings::new(cluster.bootstrap_servers()));

    let result = KafkaRegistry::init(&settings, InitMode::AllOrNothing).await;

    assert!(matches!(result, Err(KafkaRegistryError::Init { broker, .. }) if broker == "bad"));
}

#[tokio::test(flavor = "multi_thread")]
async fn registry_can_be_assembled_from_clients() {
    let cluster = mock_cluster("t1", 1);
    let first = registry_for("b1", BrokerSettings::new(cluster.bootstrap_servers())).await;
    let client = first.get_client("b1").unwrap();

    let registry = KafkaRegistry::from_clients([client]);

    assert!(registry.get_client("b1").is_ok());
    assert!(!registry.is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn broker_names_ignore_case() {
    let cluster = mock_cluster("t1", 1);

    let registry = registry_for(
        "OrdersCluster",
        BrokerSettings::new(cluster.bootstrap_servers()),
    )
    .await;

    assert_eq!(registry.broker_names(), vec!["orderscluster"]);
    assert!(registry.get_client("orderscluster").is_ok());
    let client = registry.get_client("OrdersCluster").expect("Lookup should ignore case");
    assert_eq!(client.name(), "OrdersCluster");

    let assembled = KafkaRegistry::from_clients([client]);
    assert!(assembled.get_client("ORDERSCLUSTER").is_ok());
}

#[tokio::test(flavor = "multi_thread")]
async fn names_differing_only_in_case_are_reported() {
    let cluster = mock_cluster("t1", 1);
    let settings = KafkaSettings::default()
        .with_broker("Orders", BrokerSettings::new(cluster.bootstrap_servers()))
        .with_broker("orders", BrokerSettings::new(cluster.bootstrap_servers()));

    let report = KafkaRegistry::init(&settings, InitMode::Partial)
        .await
        .expect("Partial init never fails as a whole");

    assert_eq!(report.registry.broker_names(), vec!["orders"]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].broker, "orders");
    assert!(matches!(report.failures[0].error, KafkaRegistryError::Config(_)));
}
