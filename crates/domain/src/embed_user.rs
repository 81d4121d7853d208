//! Embed user profile and its validation rules.
//!
//! The profile is fixed per deployment and merged into every signing request.
//! It is not derived from any real authentication.

use std::collections::{BTreeMap, BTreeSet};

use embedgate_core::{AppError, AppResult, NonEmptyString};

/// Longest embed session the upstream platform accepts (30 days).
pub const MAX_SESSION_LENGTH_SECONDS: u32 = 2_592_000;

/// User attribute key carrying the embed user's locale.
pub const LOCALE_ATTRIBUTE: &str = "locale";

/// Unvalidated embed user fields, typically read from configuration.
#[derive(Debug, Clone, Default)]
pub struct EmbedUserInput {
    /// Identifier of the user in the embedding application.
    pub external_user_id: String,
    /// Given name shown on the upstream platform.
    pub first_name: String,
    /// Family name shown on the upstream platform.
    pub last_name: String,
    /// Embed session length in seconds.
    pub session_length: u32,
    /// Whether an existing upstream session is replaced on login.
    pub force_logout_login: bool,
    /// Upstream permission names.
    pub permissions: Vec<String>,
    /// Model names the user may query.
    pub models: Vec<String>,
    /// Upstream group ids.
    pub group_ids: Vec<u64>,
    /// Group identifier in the embedding application.
    pub external_group_id: Option<String>,
    /// User attribute values, e.g. `locale`.
    pub user_attributes: BTreeMap<String, String>,
    /// Row-level filters keyed by model, then by field.
    pub access_filters: BTreeMap<String, BTreeMap<String, String>>,
}

/// Validated embed user profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedUser {
    external_user_id: NonEmptyString,
    first_name: String,
    last_name: String,
    session_length: u32,
    force_logout_login: bool,
    permissions: BTreeSet<NonEmptyString>,
    models: BTreeSet<NonEmptyString>,
    group_ids: BTreeSet<u64>,
    external_group_id: Option<NonEmptyString>,
    user_attributes: BTreeMap<String, String>,
    access_filters: BTreeMap<String, BTreeMap<String, String>>,
}

impl EmbedUser {
    /// Validates the input and builds the profile.
    pub fn new(input: EmbedUserInput) -> AppResult<Self> {
        let external_user_id = NonEmptyString::new(input.external_user_id).map_err(|_| {
            AppError::Validation("embed user external_user_id must not be empty".to_owned())
        })?;

        if input.session_length == 0 || input.session_length > MAX_SESSION_LENGTH_SECONDS {
            return Err(AppError::Validation(format!(
                "embed session_length must be between 1 and {MAX_SESSION_LENGTH_SECONDS} seconds, got {}",
                input.session_length
            )));
        }

        let permissions = collect_names("permission", input.permissions)?;
        let models = collect_names("model", input.models)?;
        let external_group_id = input
            .external_group_id
            .filter(|value| !value.trim().is_empty())
            .map(NonEmptyString::new)
            .transpose()?;

        Ok(Self {
            external_user_id,
            first_name: input.first_name.trim().to_owned(),
            last_name: input.last_name.trim().to_owned(),
            session_length: input.session_length,
            force_logout_login: input.force_logout_login,
            permissions,
            models,
            group_ids: input.group_ids.into_iter().collect(),
            external_group_id,
            user_attributes: input.user_attributes,
            access_filters: input.access_filters,
        })
    }

    /// Returns the external user id.
    #[must_use]
    pub fn external_user_id(&self) -> &str {
        self.external_user_id.as_str()
    }

    /// Returns the first name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    /// Returns the last name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        self.last_name.as_str()
    }

    /// Returns the session length in seconds.
    #[must_use]
    pub fn session_length(&self) -> u32 {
        self.session_length
    }

    /// Returns whether existing upstream sessions are replaced.
    #[must_use]
    pub fn force_logout_login(&self) -> bool {
        self.force_logout_login
    }

    /// Returns the permission names in sorted order.
    pub fn permissions(&self) -> impl Iterator<Item = &str> {
        self.permissions.iter().map(NonEmptyString::as_str)
    }

    /// Returns the model names in sorted order.
    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.models.iter().map(NonEmptyString::as_str)
    }

    /// Returns the group ids in ascending order.
    pub fn group_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.group_ids.iter().copied()
    }

    /// Returns the external group id, if configured.
    #[must_use]
    pub fn external_group_id(&self) -> Option<&str> {
        self.external_group_id.as_ref().map(NonEmptyString::as_str)
    }

    /// Returns the user attributes.
    #[must_use]
    pub fn user_attributes(&self) -> &BTreeMap<String, String> {
        &self.user_attributes
    }

    /// Returns the locale attribute, if set.
    #[must_use]
    pub fn locale(&self) -> Option<&str> {
        self.user_attributes.get(LOCALE_ATTRIBUTE).map(String::as_str)
    }

    /// Returns the access filters.
    #[must_use]
    pub fn access_filters(&self) -> &BTreeMap<String, BTreeMap<String, String>> {
        &self.access_filters
    }
}

fn collect_names(label: &str, values: Vec<String>) -> AppResult<BTreeSet<NonEmptyString>> {
    values
        .into_iter()
        .map(|value| {
            NonEmptyString::new(value.trim()).map_err(|_| {
                AppError::Validation(format!("embed user {label} names must not be empty"))
            })
        })
        .collect()
}
