//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod embed_instance;
mod embed_target;
mod embed_user;

pub use embed_instance::{
    EmbedInstance, EmbedInstanceHandle, MountPoint, ResourceKey, SignedEmbedUrl,
};
pub use embed_target::{EmbedModifiers, EmbedResource, EmbedTarget, ExplorePath, ResourceKind};
pub use embed_user::{
    EmbedUser, EmbedUserInput, LOCALE_ATTRIBUTE, MAX_SESSION_LENGTH_SECONDS,
};
