use crate::error::KafkaRegistryError;
use crate::registry::KafkaClient;
use crate::settings::KafkaSettings;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};

/// What to do when some of the configured brokers can't be connected.
#[derive(Deserialize, Debug, Copy, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InitMode {
    /// The first failure aborts initialization.
    AllOrNothing,
    /// Every broker is attempted, failures are reported next to the registry.
    #[default]
    Partial,
}

#[derive(Debug)]
pub struct InitReport {
    pub registry: KafkaRegistry,
    pub failures: Vec<BrokerInitFailure>,
}

#[derive(Debug)]
pub struct BrokerInitFailure {
    pub broker: String,
    pub error: KafkaRegistryError,
}

/// Broker name to client mapping. Written once by [`KafkaRegistry::init`],
/// read-only afterwards.
///
/// Broker names are case-insensitive: the `config` crate lowercases keys, so
/// names are stored and looked up lowercased.
#[derive(Debug, Default)]
pub struct KafkaRegistry {
    clients: HashMap<String, Arc<KafkaClient>>,
}

impl KafkaRegistry {
    #[tracing::instrument(skip_all)]
    pub async fn init(
        settings: &KafkaSettings,
        mode: InitMode,
    ) -> Result<InitReport, KafkaRegistryError> {
        let mut clients = HashMap::with_capacity(settings.brokers.len());
        let mut failures = vec![];

        for (name, broker_settings) in &settings.brokers {
            let key = registry_key(name);
            let connected = if clients.contains_key(&key) {
                Err(KafkaRegistryError::Config(format!(
                    "Broker name '{}' is already used with different case",
                    name
                )))
            } else {
                KafkaClient::connect(name, broker_settings).await
            };

            match connected {
                Ok(client) => {
                    clients.insert(key, client);
                }
                Err(error) => {
                    error!(
                        "Kafka client initialization failed. Broker: {}. {:?}",
                        name, error
                    );
                    match mode {
                        InitMode::AllOrNothing => {
                            return Err(KafkaRegistryError::Init {
                                broker: name.clone(),
                                source: Box::new(error),
                            })
                        }
                        InitMode::Partial => failures.push(BrokerInitFailure {
                            broker: name.clone(),
                            error,
                        }),
                    }
                }
            }
        }

        info!(
            "Kafka registry initialized. Connected: {}, failed: {}",
            clients.len(),
            failures.len()
        );

        Ok(InitReport {
            registry: Self { clients },
            failures,
        })
    }

    pub fn from_clients(clients: impl IntoIterator<Item = Arc<KafkaClient>>) -> Self {
        let clients = clients
            .into_iter()
            .map(|x| (registry_key(x.name()), x))
            .collect();

        Self { clients }
    }

    pub fn get_client(&self, name: &str) -> Result<Arc<KafkaClient>, KafkaRegistryError> {
        self.clients
            .get(&registry_key(name))
            .cloned()
            .ok_or_else(|| KafkaRegistryError::BrokerNotFound(name.to_owned()))
    }

    pub fn broker_names(&self) -> Vec<&str> {
        let mut names = self.clients.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

fn registry_key(name: &str) -> String {
    name.to_lowercase()
}
