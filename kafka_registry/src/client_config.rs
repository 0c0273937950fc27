use crate::error::KafkaRegistryError;
use crate::settings::BrokerSettings;
use rdkafka::ClientConfig;
use std::time::Duration;

// https://raw.githubusercontent.com/confluentinc/librdkafka/master/CONFIGURATION.md

/// Lower bound of the delivery deadline of a produced message.
pub const MIN_MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

impl TryFrom<&BrokerSettings> for ClientConfig {
    type Error = KafkaRegistryError;

    fn try_from(value: &BrokerSettings) -> Result<Self, Self::Error> {
        let brokers = value.brokers();
        if brokers.is_empty() {
            return Err(KafkaRegistryError::Config(format!(
                "No brokers specified in address '{}'",
                value.address
            )));
        }

        let mut config = ClientConfig::new();
        config.set("bootstrap.servers", brokers.join(","));

        if let Some(max_open_requests) = value.max_open_requests() {
            config.set(
                "max.in.flight.requests.per.connection",
                max_open_requests.to_string(),
            );
        }

        if let Ok(value) = std::env::var("RD_KAFKA_DEBUG") {
            config.set("debug", value);
        }

        Ok(config)
    }
}

/// Config of the synchronous producer. Every send waits for its delivery report.
///
/// The delivery deadline (`message.timeout.ms`) is the write timeout, but never
/// shorter than [`MIN_MESSAGE_TIMEOUT`].
pub fn producer_config(settings: &BrokerSettings) -> Result<ClientConfig, KafkaRegistryError> {
    let message_timeout = settings
        .write_timeout()
        .map_or(MIN_MESSAGE_TIMEOUT, |x| x.max(MIN_MESSAGE_TIMEOUT));

    let mut config = ClientConfig::try_from(settings)?;
    config
        .set("request.required.acks", settings.required_acks.to_string())
        .set("partitioner", settings.partitioner.to_string())
        .set("message.timeout.ms", message_timeout.as_millis().to_string())
        .set("linger.ms", "0");

    if let Some(timeout) = settings.write_timeout() {
        set_socket_timeout(&mut config, timeout);
    }

    Ok(config)
}

/// Config of the non-consuming connection used for metadata and offset lookups.
pub fn metadata_config(settings: &BrokerSettings) -> Result<ClientConfig, KafkaRegistryError> {
    let mut config = ClientConfig::try_from(settings)?;

    if let Some(timeout) = settings.read_timeout() {
        set_socket_timeout(&mut config, timeout);
    }

    Ok(config)
}

/// Config of a reader assigned to a single partition. The group is never
/// joined, offsets are neither stored nor committed.
pub fn partition_reader_config(
    settings: &BrokerSettings,
    group: &str,
) -> Result<ClientConfig, KafkaRegistryError> {
    let mut config = metadata_config(settings)?;
    config
        .set("group.id", group)
        .set("enable.partition.eof", "false")
        .set("enable.auto.commit", "false")
        .set("enable.auto.offset.store", "false");

    Ok(config)
}

fn set_socket_timeout(config: &mut ClientConfig, timeout: Duration) {
    config.set("socket.timeout.ms", timeout.as_millis().to_string());
}
