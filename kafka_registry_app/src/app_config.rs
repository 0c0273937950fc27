use anyhow::Context;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder};
use kafka_registry::settings::KafkaSettings;
use kafka_registry::InitMode;
use serde::Deserialize;
use tracing::info;

#[derive(Deserialize, Debug)]
pub struct AppConfig {
    #[serde(default)]
    pub kafka: KafkaSettings,
    #[serde(default)]
    pub init_mode: InitMode,
    #[serde(default)]
    pub smoke: SmokeSettings,
}

/// Where the startup send-then-consume check runs.
#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct SmokeSettings {
    pub broker: String,
    pub topic: String,
    pub message_count: usize,
}

impl Default for SmokeSettings {
    fn default() -> Self {
        Self {
            broker: "broker1".to_owned(),
            topic: "xiaojiao".to_owned(),
            message_count: 10,
        }
    }
}

impl AppConfig {
    pub fn build() -> Result<Self, anyhow::Error> {
        let builder = Config::builder()
            .add_source(config::File::with_name("appsettings"))
            .add_source(config::Environment::with_prefix("App").separator("__"));

        Self::build_from(builder)
    }

    pub fn build_from(builder: ConfigBuilder<DefaultState>) -> Result<Self, anyhow::Error> {
        let config = builder.build().context("While building config")?;

        let deserialized_config: AppConfig = config
            .try_deserialize()
            .context("While deserializing config")?;

        info!("App config: {deserialized_config:?}");

        Ok(deserialized_config)
    }
}
