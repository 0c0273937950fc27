use crate::settings::Partitioner;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Named broker groups. Names are case-insensitive, the registry lowercases
/// them the same way the `config` crate does for keys.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct KafkaSettings {
    #[serde(default)]
    pub brokers: BTreeMap<String, BrokerSettings>,
}

impl KafkaSettings {
    pub fn with_broker(mut self, name: impl Into<String>, settings: BrokerSettings) -> Self {
        self.brokers.insert(name.into(), settings);
        self
    }
}

/// Settings of a single named broker group.
///
/// Zero timeouts and a zero request limit keep the client library defaults.
#[derive(Deserialize, Debug, Clone)]
pub struct BrokerSettings {
    /// Comma separated `host:port` list.
    pub address: String,
    #[serde(default = "default_required_acks")]
    pub required_acks: i16,
    #[serde(default)]
    pub partitioner: Partitioner,
    /// Seconds.
    #[serde(default)]
    pub read_timeout: u64,
    /// Seconds.
    #[serde(default)]
    pub write_timeout: u64,
    #[serde(default)]
    pub max_open_requests: u32,
}

fn default_required_acks() -> i16 {
    1
}

impl BrokerSettings {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            required_acks: default_required_acks(),
            partitioner: Partitioner::default(),
            read_timeout: 0,
            write_timeout: 0,
            max_open_requests: 0,
        }
    }

    pub fn brokers(&self) -> Vec<&str> {
        self.address
            .split(',')
            .map(str::trim)
            .filter(|x| !x.is_empty())
            .collect()
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        non_zero_seconds(self.read_timeout)
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        non_zero_seconds(self.write_timeout)
    }

    pub fn max_open_requests(&self) -> Option<u32> {
        (self.max_open_requests != 0).then_some(self.max_open_requests)
    }
}

fn non_zero_seconds(seconds: u64) -> Option<Duration> {
    (seconds != 0).then(|| Duration::from_secs(seconds))
}
