use async_trait::async_trait;
use embedgate_core::AppResult;
use embedgate_domain::{EmbedInstanceHandle, EmbedTarget, MountPoint, SignedEmbedUrl};

/// Port for fetching signed URLs from the authorization service.
#[async_trait]
pub trait SignedUrlSource: Send + Sync {
    /// Fetches a freshly signed URL for the target.
    async fn fetch_signed_url(&self, target: &EmbedTarget) -> AppResult<SignedEmbedUrl>;
}

/// How the embed SDK should locate the content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedSource {
    /// Construct-with-URL using a pre-signed URL.
    SignedUrl(SignedEmbedUrl),
    /// Construct-with-id; the SDK performs its own auth round-trip.
    ById(EmbedTarget),
}

/// Build parameters handed to the embed SDK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedBuildRequest {
    /// Content source.
    pub source: EmbedSource,
    /// Anchor the widget is appended to.
    pub mount: MountPoint,
    /// CSS class applied to the widget frame.
    pub class_name: String,
    /// Optional upstream theme name.
    pub theme: Option<String>,
}

/// Port for the external embed SDK: build, then connect.
#[async_trait]
pub trait EmbedSdk: Send + Sync {
    /// Builds and connects a widget, resolving with its live handle.
    async fn connect(&self, request: EmbedBuildRequest) -> AppResult<EmbedInstanceHandle>;
}

/// Port for toggling mount point visibility. Hidden anchors stay mounted.
pub trait EmbedSurface: Send + Sync {
    /// Shows or hides the anchor.
    fn set_visible(&self, mount: &MountPoint, visible: bool);
}
