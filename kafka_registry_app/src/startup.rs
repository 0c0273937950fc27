use crate::app_config::{AppConfig, SmokeSettings};
use anyhow::Context;
use kafka_registry::{consume, send_message, InboundMessage, KafkaRegistry};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

pub async fn run_until_stopped(config: AppConfig) -> Result<(), anyhow::Error> {
    let report = KafkaRegistry::init(&config.kafka, config.init_mode)
        .await
        .context("While initializing kafka registry")?;

    for failure in &report.failures {
        warn!(
            "Broker '{}' is unavailable: {:?}",
            failure.broker, failure.error
        );
    }
    let registry = report.registry;
    let smoke = &config.smoke;

    send_messages(&registry, smoke).await;
    tokio::time::sleep(Duration::from_secs(1)).await;

    let cancellation_token = CancellationToken::new();
    let handle = consume(
        &registry,
        cancellation_token.clone(),
        &smoke.broker,
        &smoke.topic,
        print_message,
    )
    .await
    .context("While starting consumer")?;

    info!(
        "Consuming topic {} partitions {:?}, press Ctrl-C to stop",
        handle.topic(),
        handle.partitions()
    );

    tokio::signal::ctrl_c()
        .await
        .context("While waiting for Ctrl-C")?;
    cancellation_token.cancel();

    for (partition, exit) in handle.join().await {
        info!("Partition {} stopped: {:?}", partition, exit);
    }

    Ok(())
}

async fn send_messages(registry: &KafkaRegistry, smoke: &SmokeSettings) {
    let cancellation_token = CancellationToken::new();

    for i in 0..smoke.message_count {
        let result = send_message(
            registry,
            &cancellation_token,
            &smoke.broker,
            &smoke.topic,
            format!("hello world {i}"),
        )
        .await;

        if let Err(e) = result {
            error!("Failed to send message. {:?}", e);
        }
    }
}

async fn print_message(message: InboundMessage) -> Result<(), anyhow::Error> {
    let payload = message.payload_lossy();
    println!("Received message: {}", payload);
    info!(msg = %payload, "consume message");

    Ok(())
}
