use crate::client_config::producer_config;
use crate::error::KafkaRegistryError;
use crate::settings::BrokerSettings;
use rdkafka::producer::FutureProducer;
use std::ops::{Deref, DerefMut};

pub struct ProducerWrapper {
    producer: FutureProducer,
}

impl ProducerWrapper {
    pub fn create(settings: &BrokerSettings) -> Result<Self, KafkaRegistryError> {
        let producer: FutureProducer = producer_config(settings)?.create()?;

        Ok(Self { producer })
    }
}

impl DerefMut for ProducerWrapper {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.producer
    }
}

impl Deref for ProducerWrapper {
    type Target = FutureProducer;

    fn deref(&self) -> &Self::Target {
        &self.producer
    }
}
