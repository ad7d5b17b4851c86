use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Number, Value};

pub const ANDROID_CHANNEL_ID: &str = "blood_requests";
pub const ANDROID_CLICK_ACTION: &str = "FLUTTER_NOTIFICATION_CLICK";
const TOKEN_PREVIEW_CHARS: usize = 10;

/// Message body of the FCM HTTP v1 `messages:send` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub token: String,
    pub notification: Notification,
    pub data: BTreeMap<String, String>,
    pub android: AndroidConfig,
    pub apns: ApnsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AndroidMessagePriority {
    Normal,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NotificationPriority {
    #[serde(rename = "PRIORITY_DEFAULT")]
    Default,
    #[serde(rename = "PRIORITY_HIGH")]
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AndroidConfig {
    pub priority: AndroidMessagePriority,
    pub notification: AndroidNotification,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AndroidNotification {
    pub channel_id: String,
    pub notification_priority: NotificationPriority,
    pub default_sound: bool,
    pub default_vibrate_timings: bool,
    pub click_action: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApnsConfig {
    pub payload: ApnsPayload,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApnsPayload {
    pub aps: Aps,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aps {
    pub sound: String,
    pub badge: u32,
    #[serde(rename = "content-available")]
    pub content_available: u8,
}

impl AndroidConfig {
    pub fn high_priority() -> Self {
        Self {
            priority: AndroidMessagePriority::High,
            notification: AndroidNotification {
                channel_id: ANDROID_CHANNEL_ID.to_string(),
                notification_priority: NotificationPriority::High,
                default_sound: true,
                default_vibrate_timings: true,
                click_action: ANDROID_CLICK_ACTION.to_string(),
            },
        }
    }
}

impl ApnsConfig {
    /// Default sound, badge of one and a background-fetch hint.
    pub fn background_alert() -> Self {
        Self {
            payload: ApnsPayload {
                aps: Aps {
                    sound: "default".to_string(),
                    badge: 1,
                    content_available: 1,
                },
            },
        }
    }
}

pub fn build_message(
    token: &str,
    title: Option<String>,
    body: Option<String>,
    data: &Map<String, Value>,
) -> Message {
    Message {
        token: token.to_string(),
        notification: Notification { title, body },
        data: coerce_data(data),
        android: AndroidConfig::high_priority(),
        apns: ApnsConfig::background_alert(),
    }
}

/// FCM only accepts string values in the data block.
pub fn coerce_data(data: &Map<String, Value>) -> BTreeMap<String, String> {
    data.iter()
        .map(|(key, value)| (key.clone(), stringify_value(value)))
        .collect()
}

/// Generic string conversion: arrays are joined with commas and objects collapse to a
/// fixed placeholder.
pub fn stringify_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => "null".to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => stringify_number(number),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => stringify_value(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

fn stringify_number(number: &Number) -> String {
    if let Some(value) = number.as_i64() {
        if value.unsigned_abs() <= MAX_SAFE_INTEGER {
            return value.to_string();
        }
    }
    if let Some(value) = number.as_u64() {
        if value <= MAX_SAFE_INTEGER {
            return value.to_string();
        }
    }

    match number.as_f64() {
        Some(value) => format_double(value),
        None => number.to_string(),
    }
}

/// Shortest round-trip digits laid out the way ECMAScript `Number::toString` does:
/// plain notation for exponents in `[-7, 21)`, `1e+21` style outside it.
fn format_double(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let scientific = format!("{:e}", value.abs());
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return value.to_string();
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return value.to_string();
    };

    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let k = digits.len() as i32;
    let n = exponent + 1;

    let body = if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (int_part, frac_part) = digits.split_at(n as usize);
        format!("{int_part}.{frac_part}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat((-n) as usize))
    } else {
        let exp_sign = if n - 1 >= 0 { '+' } else { '-' };
        let exp_abs = (n - 1).abs();
        let (lead, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{lead}e{exp_sign}{exp_abs}")
        } else {
            format!("{lead}.{rest}e{exp_sign}{exp_abs}")
        }
    };

    format!("{sign}{body}")
}

/// First characters of a device token, safe for logs.
pub fn token_preview(token: Option<&str>) -> String {
    match token {
        Some(token) if !token.is_empty() => {
            let prefix: String = token.chars().take(TOKEN_PREVIEW_CHARS).collect();
            format!("{prefix}...")
        }
        _ => "missing".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn every_data_value_becomes_a_string() {
        let data = object(json!({
            "count": 5,
            "ratio": 0.25,
            "whole": 3.0,
            "urgent": true,
            "missing": null,
            "label": "O-"
        }));

        let coerced = coerce_data(&data);
        assert_eq!(coerced["count"], "5");
        assert_eq!(coerced["ratio"], "0.25");
        assert_eq!(coerced["whole"], "3");
        assert_eq!(coerced["urgent"], "true");
        assert_eq!(coerced["missing"], "null");
        assert_eq!(coerced["label"], "O-");
    }

    #[test]
    fn nested_values_use_generic_conversion() {
        let data = object(json!({
            "list": [1, "two", null, [3, 4]],
            "nested": { "a": 1 },
            "empty": []
        }));

        let coerced = coerce_data(&data);
        assert_eq!(coerced["list"], "1,two,,3,4");
        assert_eq!(coerced["nested"], "[object Object]");
        assert_eq!(coerced["empty"], "");
    }

    #[test]
    fn large_and_tiny_numbers_follow_script_notation() {
        assert_eq!(stringify_value(&json!(1e21)), "1e+21");
        assert_eq!(stringify_value(&json!(1.5e300)), "1.5e+300");
        assert_eq!(stringify_value(&json!(1e-7)), "1e-7");
        assert_eq!(stringify_value(&json!(0.000001)), "0.000001");
        assert_eq!(stringify_value(&json!(123.456)), "123.456");
        assert_eq!(stringify_value(&json!(-2.5e-8)), "-2.5e-8");
        assert_eq!(stringify_value(&json!(1e20)), "100000000000000000000");
        assert_eq!(
            stringify_value(&json!(12345678901234567890u64)),
            "12345678901234567000"
        );
        assert_eq!(
            stringify_value(&json!(9007199254740991u64)),
            "9007199254740991"
        );
    }

    #[test]
    fn negative_zero_renders_as_zero() {
        assert_eq!(stringify_value(&json!(-0.0)), "0");
        assert_eq!(stringify_value(&json!(-12)), "-12");
    }

    #[test]
    fn message_always_carries_platform_blocks() {
        let message = build_message("abc", None, None, &Map::new());
        let wire = serde_json::to_value(&message).unwrap();

        assert_eq!(
            wire["android"],
            json!({
                "priority": "high",
                "notification": {
                    "channel_id": "blood_requests",
                    "notification_priority": "PRIORITY_HIGH",
                    "default_sound": true,
                    "default_vibrate_timings": true,
                    "click_action": "FLUTTER_NOTIFICATION_CLICK"
                }
            })
        );
        assert_eq!(
            wire["apns"],
            json!({ "payload": { "aps": { "sound": "default", "badge": 1, "content-available": 1 } } })
        );
        assert_eq!(wire["notification"], json!({}));
        assert_eq!(wire["data"], json!({}));
    }

    #[test]
    fn message_carries_notification_text() {
        let data = object(json!({ "x": 1 }));
        let message = build_message(
            "abc",
            Some("T".to_string()),
            Some("B".to_string()),
            &data,
        );
        let wire = serde_json::to_value(&message).unwrap();

        assert_eq!(wire["token"], "abc");
        assert_eq!(wire["notification"], json!({ "title": "T", "body": "B" }));
        assert_eq!(wire["data"], json!({ "x": "1" }));
    }

    #[test]
    fn token_preview_truncates() {
        assert_eq!(token_preview(Some("abcdefghijklmnop")), "abcdefghij...");
        assert_eq!(token_preview(Some("abc")), "abc...");
        assert_eq!(token_preview(Some("")), "missing");
        assert_eq!(token_preview(None), "missing");
    }
}
