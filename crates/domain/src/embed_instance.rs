use std::fmt::{Display, Formatter};
use std::time::Duration;

use embedgate_core::{AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Opaque signed URL produced by the upstream signing call.
///
/// Consumed once by the embed host to instantiate a widget; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedEmbedUrl {
    url: NonEmptyString,
    session_length: Option<u32>,
}

impl SignedEmbedUrl {
    /// Wraps the URL returned by the signer.
    ///
    /// `session_length` is known where the URL was signed; consumers that only
    /// see the URL pass `None`.
    pub fn new(url: impl Into<String>, session_length: Option<u32>) -> AppResult<Self> {
        Ok(Self {
            url: NonEmptyString::new(url)?,
            session_length,
        })
    }

    /// Returns the signed URL exactly as produced by the signer.
    #[must_use]
    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns how long the embed session stays valid once started, if known.
    #[must_use]
    pub fn session_validity(&self) -> Option<Duration> {
        self.session_length
            .map(|seconds| Duration::from_secs(u64::from(seconds)))
    }
}

impl From<SignedEmbedUrl> for String {
    fn from(value: SignedEmbedUrl) -> Self {
        value.url.into()
    }
}

/// Key identifying one tab of the embed host, e.g. `dashboard`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceKey(NonEmptyString);

impl ResourceKey {
    /// Creates a validated resource key.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        Ok(Self(NonEmptyString::new(value)?))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for ResourceKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.0.as_str())
    }
}

/// Named DOM anchor an embed widget is appended to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MountPoint(NonEmptyString);

impl MountPoint {
    /// Creates a mount point from an element id (without the leading `#`).
    pub fn new(element_id: impl Into<String>) -> AppResult<Self> {
        let element_id: String = element_id.into();
        Ok(Self(NonEmptyString::new(
            element_id.trim_start_matches('#').to_owned(),
        )?))
    }

    /// Returns the element id.
    #[must_use]
    pub fn element_id(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the CSS selector for the anchor, e.g. `#dashboard`.
    #[must_use]
    pub fn selector(&self) -> String {
        format!("#{}", self.0)
    }
}

/// Opaque handle to a live, connected embed widget.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmbedInstanceHandle(String);

impl EmbedInstanceHandle {
    /// Wraps the identifier returned by the embed SDK.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the SDK identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Live embed widget together with the anchor that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedInstance {
    handle: EmbedInstanceHandle,
    mount: MountPoint,
}

impl EmbedInstance {
    /// Binds a handle to its mount point.
    #[must_use]
    pub fn new(handle: EmbedInstanceHandle, mount: MountPoint) -> Self {
        Self { handle, mount }
    }

    /// Returns the SDK handle.
    #[must_use]
    pub fn handle(&self) -> &EmbedInstanceHandle {
        &self.handle
    }

    /// Returns the owning mount point.
    #[must_use]
    pub fn mount(&self) -> &MountPoint {
        &self.mount
    }
}
