//! Embed-session authorization: turns a requested resource into a signed,
//! time-limited embed URL for the configured embed user.
//!
//! The signature itself is produced by the upstream BI platform through the
//! [`EmbedUrlSigner`] port. This service only interpolates the target URL and
//! merges the static user profile.

mod ports;
mod service;

#[cfg(test)]
mod tests;

pub use ports::{EmbedSignRequest, EmbedUrlSigner};
pub use service::{EmbedAuthorizationService, EmbedSigningSettings};
