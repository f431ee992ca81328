use crate::error::StrideError;
use async_trait::async_trait;

/// Outbound messaging capability.
///
/// The engine composes poll and reply text; actual delivery (webhooks,
/// provider SDKs, retries) belongs to the implementing collaborator. From
/// the engine's side a send is fire-and-forget: a `DeliveryResult` reports
/// acceptance, not receipt.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Send a text message to a channel address (e.g. a phone number).
    async fn send(&self, address: &str, text: &str) -> Result<DeliveryResult, StrideError>;
}

/// What happened to an outbound message at the channel boundary.
#[derive(Debug, Clone)]
pub struct DeliveryResult {
    pub accepted: bool,
    /// Channel-assigned message id, when the channel provides one.
    pub message_id: Option<String>,
}
