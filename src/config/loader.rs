use std::env;
use std::path::PathBuf;

use crate::config::dto::{AppConfig, WebClientConfig};
use crate::core::error::AppError;

const DEFAULT_PORT: &str = "3000";
const DEFAULT_SERVICE_ACCOUNT_PATH: &str = "service-account.json";
const DEFAULT_FCM_API_BASE: &str = "https://fcm.googleapis.com";
const DEFAULT_SDK_VERSION: &str = "10.8.0";

pub fn load_config() -> Result<AppConfig, AppError> {
    dotenvy::dotenv().ok();
    load_config_from(|key| env::var(key).ok())
}

/// Builds the configuration from an arbitrary variable source.
pub fn load_config_from<F>(lookup: F) -> Result<AppConfig, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let port = lookup("PORT")
        .unwrap_or_else(|| DEFAULT_PORT.to_string())
        .parse::<u16>()
        .map_err(|err| AppError::configuration(format!("invalid port: {err}")))?;

    let service_account_path = lookup("FCM_SERVICE_ACCOUNT_PATH")
        .or_else(|| lookup("GOOGLE_APPLICATION_CREDENTIALS"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SERVICE_ACCOUNT_PATH));

    let project_id = non_empty(lookup("FCM_PROJECT_ID"));
    let fcm_api_base = non_empty(lookup("FCM_API_BASE"))
        .unwrap_or_else(|| DEFAULT_FCM_API_BASE.to_string());

    let dry_run = parse_bool(lookup("FCM_DRY_RUN"), false);
    let disable_proxy = parse_bool(lookup("HTTP_DISABLE_PROXY"), false);
    let web_client = load_web_client(&lookup)?;

    Ok(AppConfig {
        port,
        service_account_path,
        project_id,
        fcm_api_base,
        dry_run,
        disable_proxy,
        web_client,
    })
}

fn load_web_client<F>(lookup: &F) -> Result<Option<WebClientConfig>, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(api_key) = non_empty(lookup("FIREBASE_API_KEY")) else {
        return Ok(None);
    };

    let required = |key: &str| {
        non_empty(lookup(key)).ok_or_else(|| {
            AppError::configuration(format!("{key} is required when FIREBASE_API_KEY is set"))
        })
    };

    let sdk_version = non_empty(lookup("FIREBASE_SDK_VERSION"))
        .unwrap_or_else(|| DEFAULT_SDK_VERSION.to_string());
    if !sdk_version
        .chars()
        .all(|ch| ch.is_ascii_digit() || ch == '.')
    {
        return Err(AppError::configuration(format!(
            "invalid FIREBASE_SDK_VERSION: {sdk_version}"
        )));
    }

    Ok(Some(WebClientConfig {
        api_key,
        auth_domain: required("FIREBASE_AUTH_DOMAIN")?,
        project_id: required("FIREBASE_PROJECT_ID")?,
        storage_bucket: required("FIREBASE_STORAGE_BUCKET")?,
        messaging_sender_id: required("FIREBASE_MESSAGING_SENDER_ID")?,
        app_id: required("FIREBASE_APP_ID")?,
        measurement_id: non_empty(lookup("FIREBASE_MEASUREMENT_ID")),
        sdk_version,
    }))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_bool(value: Option<String>, default: bool) -> bool {
    value
        .map(|value| matches!(value.as_str(), "true" | "1" | "TRUE" | "True"))
        .unwrap_or(default)
}
