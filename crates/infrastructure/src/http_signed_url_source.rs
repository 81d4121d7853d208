use async_trait::async_trait;
use embedgate_application::SignedUrlSource;
use embedgate_core::{AppError, AppResult};
use embedgate_domain::{EmbedResource, EmbedTarget, SignedEmbedUrl};
use serde::Deserialize;
use url::Url;

/// Fetches signed embed URLs from the authorization service over HTTP.
///
/// Dashboards use `/auth/dashboard/{id}` and explores use
/// `/auth/explore/{model}/{explore}`, so the signed URL always matches the
/// tab's own target.
pub struct HttpSignedUrlSource {
    http_client: reqwest::Client,
    api_base_url: Url,
}

#[derive(Debug, Deserialize)]
struct EmbedUrlPayload {
    url: String,
}

impl HttpSignedUrlSource {
    /// Creates a source for the authorization service at `api_base_url`.
    pub fn new(http_client: reqwest::Client, api_base_url: &str) -> AppResult<Self> {
        let api_base_url = Url::parse(api_base_url).map_err(|error| {
            AppError::Validation(format!(
                "invalid authorization service URL '{api_base_url}': {error}"
            ))
        })?;
        if api_base_url.cannot_be_a_base() {
            return Err(AppError::Validation(format!(
                "authorization service URL '{api_base_url}' cannot be used as a base"
            )));
        }

        Ok(Self {
            http_client,
            api_base_url,
        })
    }

    /// Returns the endpoint URL used for a target.
    pub fn endpoint(&self, target: &EmbedTarget) -> AppResult<Url> {
        let mut url = self.api_base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                AppError::Internal("authorization service URL cannot have a path".to_owned())
            })?;
            segments.pop_if_empty();
            match target.resource() {
                EmbedResource::Dashboard { id } => {
                    segments.extend(["auth", "dashboard", id.to_string().as_str()]);
                }
                EmbedResource::Explore { path } => {
                    segments.extend(["auth", "explore", path.model(), path.explore()]);
                }
            }
        }

        let pairs = target.modifiers().query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        Ok(url)
    }
}

#[async_trait]
impl SignedUrlSource for HttpSignedUrlSource {
    async fn fetch_signed_url(&self, target: &EmbedTarget) -> AppResult<SignedEmbedUrl> {
        let endpoint = self.endpoint(target)?;
        let response = self
            .http_client
            .get(endpoint.clone())
            .send()
            .await
            .map_err(|error| {
                AppError::Network(format!("request to '{endpoint}' failed: {error}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Network(format!(
                "authorization service returned status {status} for '{endpoint}'"
            )));
        }

        let payload = response.json::<EmbedUrlPayload>().await.map_err(|error| {
            AppError::Network(format!("invalid authorization service response: {error}"))
        })?;

        SignedEmbedUrl::new(payload.url, None).map_err(|_| {
            AppError::Network("authorization service returned an empty url".to_owned())
        })
    }
}
