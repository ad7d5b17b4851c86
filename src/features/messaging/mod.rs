pub mod client;
pub mod credentials;
pub mod dto;
pub mod handler;
pub mod payload;
pub mod provider;

pub use client::{FcmClient, JwtClaims};
pub use credentials::ServiceAccountKey;
pub use dto::{AccessTokenResponse, NotificationRequest, SendNotificationResponse};
pub use handler::{TOKEN_REQUIRED, handle_issue_token, handle_send_notification};
pub use payload::{Message, build_message, coerce_data, stringify_value};
pub use provider::{AccessToken, MessagingProvider};
