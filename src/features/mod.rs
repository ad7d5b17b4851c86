pub mod health;
pub mod messaging;
pub mod web_client;
