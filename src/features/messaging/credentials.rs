use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::core::error::AppError;

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Google service account descriptor, as downloaded from the Firebase console.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub private_key_id: String,
    pub private_key: String,
    pub client_email: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn from_file(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path).map_err(|err| {
            AppError::configuration(format!(
                "failed to read service account at {}: {err}",
                path.display()
            ))
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        let key: Self = serde_json::from_str(raw).map_err(|err| {
            AppError::configuration(format!("failed to parse service account: {err}"))
        })?;

        if key.client_email.trim().is_empty() {
            return Err(AppError::configuration(
                "service account is missing client_email".to_string(),
            ));
        }
        if !key.private_key.contains("PRIVATE KEY") {
            return Err(AppError::configuration(
                "service account private_key is not a PEM encoded key".to_string(),
            ));
        }

        Ok(key)
    }
}
