use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use fcm_relay::config::load_config;
use fcm_relay::core::error::AppError;
use fcm_relay::features::messaging::{FcmClient, MessagingProvider, ServiceAccountKey};
use fcm_relay::server::{AppState, build_router};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    init_tracing();

    let config = load_config()?;
    let credentials = ServiceAccountKey::from_file(&config.service_account_path)?;
    let client = FcmClient::new(&config, credentials)?;
    tracing::info!(
        project_id = client.project_id(),
        dry_run = config.dry_run,
        web_client = config.web_client.is_some(),
        "messaging provider initialised"
    );

    let provider: Arc<dyn MessagingProvider> = Arc::new(client);
    let app = build_router(AppState::new(provider, config.web_client.clone()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(%addr, "starting server");
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|err| AppError::internal(format!("failed to bind: {err}")))?;
    axum::serve(listener, app)
        .await
        .map_err(|err| AppError::internal(format!("server error: {err}")))?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
