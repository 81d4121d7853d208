//! Embed authorization API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use embedgate_application::{EmbedAuthorizationService, EmbedSigningSettings};
use embedgate_core::AppError;
use embedgate_infrastructure::LookerSsoEmbedSigner;
use tracing::{info, warn};

use crate::api_config::{ApiConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    if config.looker_api.is_none() {
        warn!("upstream API credentials are incomplete; signing requests will fail");
    }

    let http_client = reqwest::Client::builder()
        .build()
        .map_err(|error| AppError::Internal(format!("failed to build http client: {error}")))?;
    let signer = Arc::new(LookerSsoEmbedSigner::new(
        http_client,
        config.looker_api.clone(),
    ));

    let embed_authorization_service = EmbedAuthorizationService::new(
        signer,
        EmbedSigningSettings {
            upstream_base_url: config.upstream_base_url.clone(),
            embed_domain: config.frontend_url.clone(),
            user: config.embed_user.clone(),
        },
    );

    info!(
        embed_domain = embed_authorization_service.embed_domain(),
        "embed signing configured"
    );

    let app_state = AppState {
        embed_authorization_service,
        default_dashboard_id: config.default_dashboard_id,
        default_explore: config.default_explore.clone(),
    };

    let app = api_router::build_router(app_state, &config.frontend_url)?;

    let address = config.socket_address();
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "embedgate-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
