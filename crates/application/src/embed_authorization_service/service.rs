use std::sync::Arc;

use embedgate_core::{AppError, AppResult};
use embedgate_domain::{EmbedTarget, EmbedUser, SignedEmbedUrl};
use tracing::{error, info};

use super::ports::{EmbedSignRequest, EmbedUrlSigner};

/// Static inputs merged into every signing request.
#[derive(Debug, Clone)]
pub struct EmbedSigningSettings {
    /// Upstream BI base URL. Signing fails while this is unset.
    pub upstream_base_url: Option<String>,
    /// Origin that hosts the embed iframes.
    pub embed_domain: String,
    /// Embed user profile.
    pub user: EmbedUser,
}

/// Application service for embed URL signing.
#[derive(Clone)]
pub struct EmbedAuthorizationService {
    signer: Arc<dyn EmbedUrlSigner>,
    settings: Arc<EmbedSigningSettings>,
}

impl EmbedAuthorizationService {
    /// Creates a new embed authorization service.
    #[must_use]
    pub fn new(signer: Arc<dyn EmbedUrlSigner>, settings: EmbedSigningSettings) -> Self {
        Self {
            signer,
            settings: Arc::new(settings),
        }
    }

    /// Returns the origin embedded in every target URL.
    #[must_use]
    pub fn embed_domain(&self) -> &str {
        self.settings.embed_domain.as_str()
    }

    /// Builds the unsigned target URL for a resource.
    ///
    /// The result has the form
    /// `{base}{embed_path}?embed_domain={domain}[&modifier=value...]`.
    pub fn target_url(&self, target: &EmbedTarget) -> AppResult<String> {
        let base_url = self
            .settings
            .upstream_base_url
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                AppError::Configuration("upstream BI base URL is not configured".to_owned())
            })?;

        let mut target_url = format!(
            "{}{}?embed_domain={}",
            base_url.trim_end_matches('/'),
            target.embed_path(),
            self.settings.embed_domain
        );
        for (name, value) in target.modifiers().query_pairs() {
            target_url.push('&');
            target_url.push_str(name);
            target_url.push('=');
            target_url.push_str(value.as_str());
        }

        Ok(target_url)
    }

    /// Signs an embed URL for the configured user.
    ///
    /// Every call issues its own signing request; nothing is cached.
    pub async fn sign_embed_url(&self, target: &EmbedTarget) -> AppResult<SignedEmbedUrl> {
        let resource_kind = target.kind();
        let target_url = match self.target_url(target) {
            Ok(target_url) => target_url,
            Err(error) => {
                error!(%resource_kind, %error, "cannot build embed target url");
                return Err(error);
            }
        };

        let request = EmbedSignRequest {
            target_url,
            embed_domain: self.settings.embed_domain.clone(),
            user: self.settings.user.clone(),
        };

        match self.signer.sign_embed_url(request).await {
            Ok(signed) => {
                info!(%resource_kind, url = signed.url(), "generated signed embed url");
                Ok(signed)
            }
            Err(error) => {
                error!(%resource_kind, %error, "failed to create signed embed url");
                Err(error)
            }
        }
    }
}
