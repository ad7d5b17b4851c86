use async_trait::async_trait;
use serde::Deserialize;

use crate::core::error::ProviderError;
use crate::features::messaging::payload::Message;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: i64,
}

/// Outbound side of the relay. Implementations are created once at startup and shared
/// read-only between requests.
#[async_trait]
pub trait MessagingProvider: Send + Sync {
    /// Fetches a fresh short-lived access token; nothing is cached.
    async fn access_token(&self) -> Result<AccessToken, ProviderError>;

    /// Submits a message and returns the provider's message identifier.
    async fn send(&self, message: &Message) -> Result<String, ProviderError>;
}
