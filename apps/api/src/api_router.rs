mod cors;


use axum::Router;
use axum::middleware::from_fn;
use axum::routing::get;
use embedgate_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

use self::cors::build_cors_layer;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let cors_layer = build_cors_layer(frontend_url)?;

    let embed_routes = Router::new()
        .route(
            "/auth/dashboard",
            get(handlers::embed::default_dashboard_url_handler),
        )
        .route(
            "/auth/dashboard/{dashboard_id}",
            get(handlers::embed::dashboard_url_handler),
        )
        .route(
            "/auth/explore",
            get(handlers::embed::default_explore_url_handler),
        )
        .route(
            "/auth/explore/{model}/{explore}",
            get(handlers::embed::explore_url_handler),
        );

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(embed_routes)
        .layer(from_fn(middleware::log_request))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state))
}
