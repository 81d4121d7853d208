use axum::Json;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use embedgate_domain::{EmbedModifiers, EmbedTarget, ExplorePath};

use crate::dto::{EmbedQuery, EmbedUrlResponse};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

type EmbedQueryResult = Result<Query<EmbedQuery>, QueryRejection>;

pub async fn default_dashboard_url_handler(
    State(state): State<AppState>,
    query: EmbedQueryResult,
) -> ApiResult<Json<EmbedUrlResponse>> {
    let target = EmbedTarget::dashboard(state.default_dashboard_id);
    sign(&state, target, query).await
}

pub async fn dashboard_url_handler(
    State(state): State<AppState>,
    dashboard_id: Result<Path<u64>, PathRejection>,
    query: EmbedQueryResult,
) -> ApiResult<Json<EmbedUrlResponse>> {
    let Path(dashboard_id) = dashboard_id?;
    sign(&state, EmbedTarget::dashboard(dashboard_id), query).await
}

pub async fn default_explore_url_handler(
    State(state): State<AppState>,
    query: EmbedQueryResult,
) -> ApiResult<Json<EmbedUrlResponse>> {
    let target = EmbedTarget::explore(state.default_explore.clone());
    sign(&state, target, query).await
}

pub async fn explore_url_handler(
    State(state): State<AppState>,
    segments: Result<Path<(String, String)>, PathRejection>,
    query: EmbedQueryResult,
) -> ApiResult<Json<EmbedUrlResponse>> {
    let Path((model, explore)) = segments?;
    let target = EmbedTarget::explore(ExplorePath::new(model, explore)?);
    sign(&state, target, query).await
}

async fn sign(
    state: &AppState,
    target: EmbedTarget,
    query: EmbedQueryResult,
) -> ApiResult<Json<EmbedUrlResponse>> {
    let Query(query) = query?;
    let modifiers = EmbedModifiers::new(
        query.hide_title.unwrap_or(false),
        query.hide_filters.unwrap_or(false),
        query.theme,
    )?;
    let target = target.with_modifiers(modifiers);

    let signed = state
        .embed_authorization_service
        .sign_embed_url(&target)
        .await
        .map_err(ApiError::embed_url(target.kind()))?;

    Ok(Json(EmbedUrlResponse {
        url: signed.into(),
    }))
}
