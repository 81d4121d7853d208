use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use chrono::{SecondsFormat, Utc};
use tracing::info;

pub async fn log_request(request: Request, next: Next) -> Response {
    info!(
        timestamp = %Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        method = %request.method(),
        path = %request.uri(),
        "incoming request"
    );

    next.run(request).await
}
