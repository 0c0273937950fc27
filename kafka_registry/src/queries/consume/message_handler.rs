use crate::queries::consume::InboundMessage;
use async_trait::async_trait;
use std::future::Future;

/// Callback applied to every consumed message. Returning an error stops the
/// partition the message came from.
#[async_trait]
pub trait MessageHandler: Send + Sync + 'static {
    async fn handle(&self, message: InboundMessage) -> Result<(), anyhow::Error>;
}

#[async_trait]
impl<F, Fut> MessageHandler for F
where
    F: Fn(InboundMessage) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), anyhow::Error>> + Send + 'static,
{
    async fn handle(&self, message: InboundMessage) -> Result<(), anyhow::Error> {
        (self)(message).await
    }
}
