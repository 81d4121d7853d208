//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_signed_url_source;
mod looker_sso_embed_signer;

#[cfg(test)]
mod test_server;

pub use http_signed_url_source::HttpSignedUrlSource;
pub use looker_sso_embed_signer::{
    DEFAULT_LOOKER_API_VERSION, LookerApiSettings, LookerSsoEmbedSigner,
};
