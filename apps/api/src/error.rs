use axum::Json;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use embedgate_core::AppError;
use embedgate_domain::ResourceKind;
use serde::Serialize;
use tracing::error;
use ts_rs::TS;

/// API error payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    error: String,
}

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub enum ApiError {
    /// Request-level failure rendered with its own message.
    App(AppError),
    /// Signing failure; details are logged and a generic message is returned.
    EmbedUrl {
        kind: ResourceKind,
        source: AppError,
    },
}

impl ApiError {
    pub fn embed_url(kind: ResourceKind) -> impl FnOnce(AppError) -> Self {
        move |source| Self::EmbedUrl { kind, source }
    }
}

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self::App(value)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(value: QueryRejection) -> Self {
        Self::App(AppError::Validation(value.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(value: PathRejection) -> Self {
        Self::App(AppError::Validation(value.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::App(error) => {
                let status = match error {
                    AppError::Validation(_) => StatusCode::BAD_REQUEST,
                    AppError::NotFound(_) => StatusCode::NOT_FOUND,
                    AppError::Configuration(_)
                    | AppError::Signing(_)
                    | AppError::Network(_)
                    | AppError::EmbedConnect(_)
                    | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, error.to_string())
            }
            Self::EmbedUrl { kind, source } => {
                error!(resource_kind = %kind, error = %source, "embed url request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to generate {kind} embed URL"),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;
