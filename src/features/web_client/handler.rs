use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;

use crate::config::WebClientConfig;
use crate::core::error::AppError;
use crate::features::web_client::bootstrap::render_bootstrap_module;
use crate::server::AppState;

const NOT_CONFIGURED: &str = "web client configuration is not set";

fn configured(state: &AppState) -> Result<&WebClientConfig, AppError> {
    state
        .web_client
        .as_deref()
        .ok_or_else(|| AppError::not_found(NOT_CONFIGURED.to_string()))
}

pub async fn handle_web_config(
    State(state): State<AppState>,
) -> Result<Json<WebClientConfig>, AppError> {
    configured(&state).cloned().map(Json)
}

pub async fn handle_bootstrap_script(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let script = render_bootstrap_module(configured(&state)?)?;
    Ok((
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        script,
    ))
}
