use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::features::health::handle_healthcheck;
use crate::features::messaging::{handle_issue_token, handle_send_notification};
use crate::features::web_client::{handle_bootstrap_script, handle_web_config};
use crate::server::AppState;

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(handle_healthcheck))
        .route("/api/fcm/token", get(handle_issue_token))
        .route("/api/fcm/send", post(handle_send_notification))
        .route("/api/firebase/config", get(handle_web_config))
        .route("/firebase-config.js", get(handle_bootstrap_script))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
