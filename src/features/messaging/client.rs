use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::AppConfig;
use crate::core::error::{AppError, ProviderError};
use crate::core::http_client::build_provider_client;
use crate::features::messaging::credentials::ServiceAccountKey;
use crate::features::messaging::payload::Message;
use crate::features::messaging::provider::{AccessToken, MessagingProvider};

const OAUTH_SCOPES: &str = "https://www.googleapis.com/auth/cloud-platform https://www.googleapis.com/auth/firebase.messaging";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_MINUTES: i64 = 60;
const FCM_ERROR_TYPE: &str = "type.googleapis.com/google.firebase.fcm.v1.FcmError";
const UNKNOWN_ERROR: &str = "messaging/unknown-error";

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub iss: String,
    pub sub: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    validate_only: bool,
    message: &'a Message,
}

#[derive(Deserialize)]
struct SendMessageResponse {
    name: String,
}

#[derive(Deserialize)]
struct OAuthErrorResponse {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

#[derive(Deserialize)]
struct GoogleErrorEnvelope {
    error: GoogleError,
}

#[derive(Deserialize)]
struct GoogleError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    details: Vec<Value>,
}

/// Firebase Cloud Messaging over the HTTP v1 API, authenticated with a service account.
pub struct FcmClient {
    project_id: String,
    credentials: ServiceAccountKey,
    encoding_key: EncodingKey,
    api_base: String,
    validate_only: bool,
    http_client: reqwest::Client,
}

impl FcmClient {
    pub fn new(config: &AppConfig, credentials: ServiceAccountKey) -> Result<Self, AppError> {
        let encoding_key = EncodingKey::from_rsa_pem(credentials.private_key.as_bytes())
            .map_err(|err| {
                AppError::configuration(format!("failed to parse service account private key: {err}"))
            })?;

        let project_id = config
            .project_id
            .clone()
            .unwrap_or_else(|| credentials.project_id.clone());
        if project_id.is_empty() {
            return Err(AppError::configuration(
                "project id is missing from both FCM_PROJECT_ID and the service account".to_string(),
            ));
        }

        let http_client = build_provider_client(config)?;

        Ok(Self {
            project_id,
            credentials,
            encoding_key,
            api_base: config.fcm_api_base.trim_end_matches('/').to_string(),
            validate_only: config.dry_run,
            http_client,
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    fn send_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/messages:send",
            self.api_base, self.project_id
        )
    }

    fn build_assertion(&self) -> Result<String, ProviderError> {
        let now = Utc::now();
        let claims = JwtClaims {
            iss: self.credentials.client_email.clone(),
            sub: self.credentials.client_email.clone(),
            scope: OAUTH_SCOPES.to_string(),
            aud: self.credentials.token_uri.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::minutes(ASSERTION_LIFETIME_MINUTES)).timestamp(),
        };

        let mut header = Header::new(Algorithm::RS256);
        if !self.credentials.private_key_id.is_empty() {
            header.kid = Some(self.credentials.private_key_id.clone());
        }

        encode(&header, &claims, &self.encoding_key).map_err(|err| {
            ProviderError::invalid_credential(format!("failed to sign token assertion: {err}"))
        })
    }
}

#[async_trait]
impl MessagingProvider for FcmClient {
    async fn access_token(&self) -> Result<AccessToken, ProviderError> {
        let assertion = self.build_assertion()?;
        let params = [
            ("grant_type", JWT_BEARER_GRANT),
            ("assertion", assertion.as_str()),
        ];

        let response = self
            .http_client
            .post(&self.credentials.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|err| {
                ProviderError::network(format!("failed to reach token endpoint: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::invalid_credential(describe_oauth_error(
                status, &body,
            )));
        }

        response.json::<AccessToken>().await.map_err(|err| {
            ProviderError::invalid_credential(format!("failed to parse token response: {err}"))
        })
    }

    async fn send(&self, message: &Message) -> Result<String, ProviderError> {
        let token = self.access_token().await?;
        let request = SendMessageRequest {
            validate_only: self.validate_only,
            message,
        };

        let response = self
            .http_client
            .post(self.send_url())
            .bearer_auth(&token.access_token)
            .json(&request)
            .send()
            .await
            .map_err(|err| ProviderError::network(format!("FCM send request failed: {err}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| ProviderError::network(format!("failed to read FCM response: {err}")))?;
        debug!(%status, "FCM responded");

        if !status.is_success() {
            return Err(map_send_error(status, &body));
        }

        serde_json::from_str::<SendMessageResponse>(&body)
            .map(|parsed| parsed.name)
            .map_err(|err| {
                ProviderError::new(UNKNOWN_ERROR, format!("failed to parse FCM response: {err}"))
            })
    }
}

fn describe_oauth_error(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<OAuthErrorResponse>(body) {
        Ok(OAuthErrorResponse {
            error,
            error_description: Some(description),
        }) => format!("Error fetching access token: {error} ({description})"),
        Ok(OAuthErrorResponse { error, .. }) => format!("Error fetching access token: {error}"),
        Err(_) => format!("Error fetching access token: HTTP {status}: {body}"),
    }
}

fn map_send_error(status: StatusCode, body: &str) -> ProviderError {
    let Ok(GoogleErrorEnvelope { error }) = serde_json::from_str::<GoogleErrorEnvelope>(body)
    else {
        return ProviderError::new(
            code_for_status(status),
            format!("Unexpected response with status: {} and body: {body}", status.as_u16()),
        );
    };

    let fcm_code = error
        .details
        .iter()
        .filter(|detail| detail.get("@type").and_then(Value::as_str) == Some(FCM_ERROR_TYPE))
        .find_map(|detail| detail.get("errorCode").and_then(Value::as_str));

    let code = fcm_code
        .or(error.status.as_deref())
        .map(provider_code)
        .unwrap_or_else(|| code_for_status(status));
    let message = error
        .message
        .unwrap_or_else(|| format!("FCM request failed with status {}", status.as_u16()));

    ProviderError::new(code, message)
}

fn provider_code(server_code: &str) -> &'static str {
    match server_code {
        "INVALID_ARGUMENT" => "messaging/invalid-argument",
        "UNREGISTERED" | "NOT_FOUND" => "messaging/registration-token-not-registered",
        "SENDER_ID_MISMATCH" => "messaging/mismatched-credential",
        "QUOTA_EXCEEDED" | "RESOURCE_EXHAUSTED" => "messaging/message-rate-exceeded",
        "UNAVAILABLE" => "messaging/server-unavailable",
        "INTERNAL" => "messaging/internal-error",
        "THIRD_PARTY_AUTH_ERROR" | "APNS_AUTH_ERROR" => "messaging/third-party-auth-error",
        "UNAUTHENTICATED" => "messaging/authentication-error",
        "PERMISSION_DENIED" => "messaging/permission-denied",
        _ => UNKNOWN_ERROR,
    }
}

fn code_for_status(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "messaging/invalid-argument",
        StatusCode::UNAUTHORIZED => "messaging/authentication-error",
        StatusCode::FORBIDDEN => "messaging/permission-denied",
        StatusCode::NOT_FOUND => "messaging/registration-token-not-registered",
        StatusCode::TOO_MANY_REQUESTS => "messaging/message-rate-exceeded",
        StatusCode::INTERNAL_SERVER_ERROR => "messaging/internal-error",
        StatusCode::SERVICE_UNAVAILABLE => "messaging/server-unavailable",
        _ => UNKNOWN_ERROR,
    }
}
