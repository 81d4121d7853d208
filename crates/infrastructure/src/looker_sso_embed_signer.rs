//! SSO embed URL signer backed by the upstream BI platform's REST API.
//!
//! Mirrors what the vendor server SDK does: log in with API credentials,
//! then request a signed SSO embed URL for the target and user.

use std::collections::BTreeMap;

use async_trait::async_trait;
use embedgate_application::{EmbedSignRequest, EmbedUrlSigner};
use embedgate_core::{AppError, AppResult};
use embedgate_domain::SignedEmbedUrl;
use serde::{Deserialize, Serialize};

/// API version used when none is configured.
pub const DEFAULT_LOOKER_API_VERSION: &str = "4.0";

/// Credentials and location of the upstream API.
#[derive(Debug, Clone)]
pub struct LookerApiSettings {
    /// API base URL, e.g. `https://example.looker.com`.
    pub base_url: String,
    /// API client id.
    pub client_id: String,
    /// API client secret.
    pub client_secret: String,
    /// API version path segment.
    pub api_version: String,
}

/// Signer that calls the upstream `embed/sso_url` endpoint.
pub struct LookerSsoEmbedSigner {
    http_client: reqwest::Client,
    settings: Option<LookerApiSettings>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
}

#[derive(Debug, Serialize)]
struct SsoEmbedUrlBody<'a> {
    target_url: &'a str,
    session_length: u32,
    force_logout_login: bool,
    external_user_id: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    permissions: Vec<&'a str>,
    models: Vec<&'a str>,
    group_ids: Vec<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    external_group_id: Option<&'a str>,
    user_attributes: &'a BTreeMap<String, String>,
    access_filters: &'a BTreeMap<String, BTreeMap<String, String>>,
    embed_domain: &'a str,
}

#[derive(Debug, Deserialize)]
struct SsoEmbedUrlResponse {
    url: String,
}

impl LookerSsoEmbedSigner {
    /// Creates a signer. With `settings` unset every call fails with a
    /// configuration error.
    #[must_use]
    pub fn new(http_client: reqwest::Client, settings: Option<LookerApiSettings>) -> Self {
        Self {
            http_client,
            settings,
        }
    }

    fn settings(&self) -> AppResult<&LookerApiSettings> {
        let settings = self.settings.as_ref().ok_or_else(|| {
            AppError::Configuration("upstream API credentials are not configured".to_owned())
        })?;

        if settings.base_url.trim().is_empty()
            || settings.client_id.trim().is_empty()
            || settings.client_secret.trim().is_empty()
        {
            return Err(AppError::Configuration(
                "upstream API base URL, client id and client secret must not be empty".to_owned(),
            ));
        }

        Ok(settings)
    }

    fn endpoint(settings: &LookerApiSettings, path: &str) -> String {
        format!(
            "{}/api/{}/{path}",
            settings.base_url.trim_end_matches('/'),
            settings.api_version
        )
    }

    async fn login(&self, settings: &LookerApiSettings) -> AppResult<String> {
        let response = self
            .http_client
            .post(Self::endpoint(settings, "login"))
            .form(&[
                ("client_id", settings.client_id.as_str()),
                ("client_secret", settings.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|error| AppError::Signing(format!("upstream login request failed: {error}")))?;

        let response = ensure_success(response, "upstream login").await?;
        let login = response
            .json::<LoginResponse>()
            .await
            .map_err(|error| AppError::Signing(format!("invalid upstream login response: {error}")))?;

        Ok(login.access_token)
    }
}

#[async_trait]
impl EmbedUrlSigner for LookerSsoEmbedSigner {
    async fn sign_embed_url(&self, request: EmbedSignRequest) -> AppResult<SignedEmbedUrl> {
        let settings = self.settings()?;
        let access_token = self.login(settings).await?;

        let user = &request.user;
        let body = SsoEmbedUrlBody {
            target_url: request.target_url.as_str(),
            session_length: user.session_length(),
            force_logout_login: user.force_logout_login(),
            external_user_id: user.external_user_id(),
            first_name: user.first_name(),
            last_name: user.last_name(),
            permissions: user.permissions().collect(),
            models: user.models().collect(),
            group_ids: user.group_ids().collect(),
            external_group_id: user.external_group_id(),
            user_attributes: user.user_attributes(),
            access_filters: user.access_filters(),
            embed_domain: request.embed_domain.as_str(),
        };

        let response = self
            .http_client
            .post(Self::endpoint(settings, "embed/sso_url"))
            .header(reqwest::header::AUTHORIZATION, format!("token {access_token}"))
            .json(&body)
            .send()
            .await
            .map_err(|error| AppError::Signing(format!("upstream sso_url request failed: {error}")))?;

        let response = ensure_success(response, "upstream sso_url").await?;
        let signed = response
            .json::<SsoEmbedUrlResponse>()
            .await
            .map_err(|error| AppError::Signing(format!("invalid upstream sso_url response: {error}")))?;

        SignedEmbedUrl::new(signed.url, Some(user.session_length()))
            .map_err(|_| AppError::Signing("upstream returned an empty embed url".to_owned()))
    }
}

async fn ensure_success(response: reqwest::Response, call: &str) -> AppResult<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<response body unavailable>".to_owned());
    Err(AppError::Signing(format!(
        "{call} failed with status {status}: {body}"
    )))
}
