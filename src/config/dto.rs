use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub service_account_path: PathBuf,
    pub project_id: Option<String>,
    pub fcm_api_base: String,
    pub dry_run: bool,
    pub disable_proxy: bool,
    pub web_client: Option<WebClientConfig>,
}

/// Public configuration handed to the browser SDKs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebClientConfig {
    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub storage_bucket: String,
    pub messaging_sender_id: String,
    pub app_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measurement_id: Option<String>,
    #[serde(skip)]
    pub sdk_version: String,
}
