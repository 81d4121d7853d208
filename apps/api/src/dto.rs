use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Signed embed URL returned to the embed host.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/embed-url-response.ts"
)]
pub struct EmbedUrlResponse {
    pub url: String,
}

/// Optional presentation switches accepted by the signing endpoints.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/embed-query.ts"
)]
pub struct EmbedQuery {
    pub hide_title: Option<bool>,
    pub hide_filters: Option<bool>,
    pub theme: Option<String>,
}
