use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Default, Deserialize)]
pub struct NotificationRequest {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub body: Option<Value>,
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationResponse {
    pub success: bool,
    pub message_id: String,
}

impl SendNotificationResponse {
    pub fn delivered(message_id: String) -> Self {
        Self {
            success: true,
            message_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AccessTokenResponse {
    pub token: String,
}
