use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use embedgate_core::AppError;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Only the configured frontend origin is echoed back; other origins get no
/// `access-control-allow-origin` header.
pub(super) fn build_cors_layer(frontend_url: &str) -> Result<CorsLayer, AppError> {
    let frontend_origin = HeaderValue::from_str(frontend_url)
        .map_err(|error| AppError::Configuration(format!("invalid FRONTEND_URL: {error}")))?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list([frontend_origin]))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]))
}
