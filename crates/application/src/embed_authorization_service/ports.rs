use async_trait::async_trait;
use embedgate_core::AppResult;
use embedgate_domain::{EmbedUser, SignedEmbedUrl};

/// Everything the upstream signer needs for one embed session.
#[derive(Debug, Clone)]
pub struct EmbedSignRequest {
    /// Unsigned target URL on the upstream host, including query modifiers.
    pub target_url: String,
    /// Origin that will host the embed iframe.
    pub embed_domain: String,
    /// Embed user merged into the session.
    pub user: EmbedUser,
}

/// Port for the external SSO embed signing call.
#[async_trait]
pub trait EmbedUrlSigner: Send + Sync {
    /// Creates a signed embed URL. The returned URL is passed on unmodified.
    async fn sign_embed_url(&self, request: EmbedSignRequest) -> AppResult<SignedEmbedUrl>;
}
