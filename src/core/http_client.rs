use std::time::Duration;

use reqwest::Client;

use crate::config::AppConfig;
use crate::core::error::AppError;

const USER_AGENT: &str = concat!("fcm-relay/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);

/// Client shared by the OAuth exchange and the send call for the life of the process.
pub fn build_provider_client(config: &AppConfig) -> Result<Client, AppError> {
    let builder = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .pool_idle_timeout(POOL_IDLE_TIMEOUT);

    let builder = if config.disable_proxy {
        builder.no_proxy()
    } else {
        builder
    };

    builder
        .build()
        .map_err(|err| AppError::internal(format!("failed to build HTTP client: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn config(disable_proxy: bool) -> AppConfig {
        AppConfig {
            port: 0,
            service_account_path: PathBuf::from("service-account.json"),
            project_id: None,
            fcm_api_base: "https://fcm.googleapis.com".to_string(),
            dry_run: false,
            disable_proxy,
            web_client: None,
        }
    }

    #[test]
    fn builds_with_and_without_proxy() {
        assert!(build_provider_client(&config(true)).is_ok());
        assert!(build_provider_client(&config(false)).is_ok());
    }

    #[test]
    fn user_agent_names_the_relay() {
        assert!(USER_AGENT.starts_with("fcm-relay/"));
    }
}
