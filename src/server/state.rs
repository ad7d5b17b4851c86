use std::sync::Arc;

use crate::config::WebClientConfig;
use crate::features::messaging::MessagingProvider;

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn MessagingProvider>,
    pub web_client: Option<Arc<WebClientConfig>>,
}

impl AppState {
    pub fn new(provider: Arc<dyn MessagingProvider>, web_client: Option<WebClientConfig>) -> Self {
        Self {
            provider,
            web_client: web_client.map(Arc::new),
        }
    }
}
