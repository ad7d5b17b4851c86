use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

use crate::core::error::AppError;
use crate::features::messaging::dto::{
    AccessTokenResponse, NotificationRequest, SendNotificationResponse,
};
use crate::features::messaging::payload::{build_message, stringify_value, token_preview};
use crate::server::AppState;

pub const TOKEN_REQUIRED: &str = "FCM token is required";

pub async fn handle_issue_token(
    State(state): State<AppState>,
) -> Result<Json<AccessTokenResponse>, AppError> {
    match state.provider.access_token().await {
        Ok(token) => Ok(Json(AccessTokenResponse {
            token: token.access_token,
        })),
        Err(err) => {
            error!(code = %err.code, reason = %err.message, "error getting FCM token");
            Err(AppError::TokenIssuance(err))
        }
    }
}

pub async fn handle_send_notification(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SendNotificationResponse>, AppError> {
    let request = parse_request(&body).inspect_err(|err| {
        warn!(error = %err, "rejecting unreadable notification request");
    })?;
    let preview = token_preview(request.token.as_deref());
    let data = request.data.unwrap_or_default();
    let title = text_field(request.title);
    let text = text_field(request.body);
    let data_json = Value::Object(data.clone());

    info!(
        token = %preview,
        title = ?title,
        body = ?text,
        data = %data_json,
        "received notification request"
    );

    let Some(token) = request.token.filter(|token| !token.is_empty()) else {
        warn!("FCM token is missing in request");
        return Err(AppError::bad_request(TOKEN_REQUIRED.to_string()));
    };

    let message = build_message(&token, title.clone(), text.clone(), &data);
    if let Ok(rendered) = serde_json::to_string_pretty(&message) {
        debug!(payload = %rendered, "sending FCM message");
    }

    match state.provider.send(&message).await {
        Ok(message_id) => {
            info!(%message_id, "successfully sent message");
            Ok(Json(SendNotificationResponse::delivered(message_id)))
        }
        Err(err) => {
            error!(
                code = %err.code,
                reason = %err.message,
                token = %preview,
                title = ?title,
                body = ?text,
                data = ?message.data,
                "error sending FCM message"
            );
            Err(AppError::Delivery(err))
        }
    }
}

/// Title and body pass through with the same string conversion as data values.
fn text_field(value: Option<Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(value) => Some(stringify_value(&value)),
    }
}

/// An empty body reads as an empty object, so it fails on the missing token.
fn parse_request(body: &[u8]) -> Result<NotificationRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(NotificationRequest::default());
    }

    let payload: Value = serde_json::from_slice(body)
        .map_err(|err| AppError::bad_request(format!("invalid JSON body: {err}")))?;
    let payload = match payload {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };

    serde_json::from_value(payload)
        .map_err(|err| AppError::bad_request(format!("invalid notification request: {err}")))
}
