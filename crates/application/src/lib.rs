//! Application services and ports.

#![forbid(unsafe_code)]

mod embed_authorization_service;
mod embed_host_service;

pub use embed_authorization_service::{
    EmbedAuthorizationService, EmbedSignRequest, EmbedSigningSettings, EmbedUrlSigner,
};
pub use embed_host_service::{
    EMBED_CLASS_NAME, EmbedBuildRequest, EmbedHostController, EmbedSdk, EmbedSource,
    EmbedSourceMode, EmbedSurface, EmbedTab, SignedUrlSource, TabPhase, TabSelection,
};
