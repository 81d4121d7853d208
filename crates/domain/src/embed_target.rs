use std::fmt::{Display, Formatter};
use std::str::FromStr;

use embedgate_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Class of upstream BI artifact that can be embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A dashboard addressed by numeric id.
    Dashboard,
    /// An explore addressed by `model/explore` path.
    Explore,
}

impl ResourceKind {
    /// Returns the stable lowercase name used in routes and messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Explore => "explore",
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Explore location made of a model name and an explore name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExplorePath {
    model: NonEmptyString,
    explore: NonEmptyString,
}

impl ExplorePath {
    /// Creates an explore path from its two segments.
    pub fn new(model: impl Into<String>, explore: impl Into<String>) -> AppResult<Self> {
        let model = NonEmptyString::new(model)?;
        let explore = NonEmptyString::new(explore)?;

        for segment in [&model, &explore] {
            if segment.as_str().contains('/') || segment.as_str().contains(char::is_whitespace) {
                return Err(AppError::Validation(format!(
                    "explore path segment '{segment}' must not contain '/' or whitespace"
                )));
            }
        }

        Ok(Self { model, explore })
    }

    /// Returns the model segment.
    #[must_use]
    pub fn model(&self) -> &str {
        self.model.as_str()
    }

    /// Returns the explore segment.
    #[must_use]
    pub fn explore(&self) -> &str {
        self.explore.as_str()
    }
}

impl FromStr for ExplorePath {
    type Err = AppError;

    fn from_str(value: &str) -> AppResult<Self> {
        let mut segments = value.trim().trim_matches('/').split('/');
        match (segments.next(), segments.next(), segments.next()) {
            (Some(model), Some(explore), None) => Self::new(model, explore),
            _ => Err(AppError::Validation(format!(
                "explore path '{value}' must have the form 'model/explore'"
            ))),
        }
    }
}

impl Display for ExplorePath {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}/{}", self.model, self.explore)
    }
}

/// Upstream artifact selected for embedding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EmbedResource {
    /// Dashboard by numeric id.
    Dashboard {
        /// Dashboard id on the upstream host.
        id: u64,
    },
    /// Explore by fixed path.
    Explore {
        /// Model and explore names.
        path: ExplorePath,
    },
}

/// Presentation switches appended to the unsigned target URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmbedModifiers {
    hide_title: bool,
    hide_filters: bool,
    theme: Option<NonEmptyString>,
}

impl EmbedModifiers {
    /// Creates modifiers, validating the optional theme name.
    pub fn new(hide_title: bool, hide_filters: bool, theme: Option<String>) -> AppResult<Self> {
        let theme = theme
            .filter(|value| !value.trim().is_empty())
            .map(|value| {
                if value
                    .chars()
                    .all(|character| character.is_ascii_alphanumeric() || character == '_')
                {
                    NonEmptyString::new(value)
                } else {
                    Err(AppError::Validation(format!(
                        "theme '{value}' may only contain ASCII letters, digits and '_'"
                    )))
                }
            })
            .transpose()?;

        Ok(Self {
            hide_title,
            hide_filters,
            theme,
        })
    }

    /// Returns the theme name, if any.
    #[must_use]
    pub fn theme(&self) -> Option<&str> {
        self.theme.as_ref().map(NonEmptyString::as_str)
    }

    /// Returns the query parameters in their stable rendering order.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if self.hide_title {
            pairs.push(("hide_title", "true".to_owned()));
        }
        if self.hide_filters {
            pairs.push(("hide_filters", "true".to_owned()));
        }
        if let Some(theme) = &self.theme {
            pairs.push(("theme", theme.as_str().to_owned()));
        }
        pairs
    }
}

/// Resource plus presentation modifiers requested for one embed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmbedTarget {
    resource: EmbedResource,
    modifiers: EmbedModifiers,
}

impl EmbedTarget {
    /// Targets a dashboard by id.
    #[must_use]
    pub fn dashboard(id: u64) -> Self {
        Self {
            resource: EmbedResource::Dashboard { id },
            modifiers: EmbedModifiers::default(),
        }
    }

    /// Targets an explore by path.
    #[must_use]
    pub fn explore(path: ExplorePath) -> Self {
        Self {
            resource: EmbedResource::Explore { path },
            modifiers: EmbedModifiers::default(),
        }
    }

    /// Replaces the presentation modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: EmbedModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Returns the targeted resource.
    #[must_use]
    pub fn resource(&self) -> &EmbedResource {
        &self.resource
    }

    /// Returns the presentation modifiers.
    #[must_use]
    pub fn modifiers(&self) -> &EmbedModifiers {
        &self.modifiers
    }

    /// Returns the resource class.
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        match self.resource {
            EmbedResource::Dashboard { .. } => ResourceKind::Dashboard,
            EmbedResource::Explore { .. } => ResourceKind::Explore,
        }
    }

    /// Returns the host-relative embed path, e.g. `/embed/dashboards/332`.
    #[must_use]
    pub fn embed_path(&self) -> String {
        match &self.resource {
            EmbedResource::Dashboard { id } => format!("/embed/dashboards/{id}"),
            EmbedResource::Explore { path } => {
                format!("/embed/explore/{}/{}", path.model(), path.explore())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::{EmbedModifiers, EmbedTarget, ExplorePath, ResourceKind};

    #[test]
    fn explore_path_parses_model_and_explore() {
        let path = "sales/order_items".parse::<ExplorePath>();
        assert!(path.is_ok());
        let path = path.unwrap_or_else(|_| unreachable!());
        assert_eq!(path.model(), "sales");
        assert_eq!(path.explore(), "order_items");
        assert_eq!(
            EmbedTarget::explore(path).embed_path(),
            "/embed/explore/sales/order_items"
        );
    }

    #[test]
    fn explore_path_rejects_wrong_segment_count() {
        assert!("sales".parse::<ExplorePath>().is_err());
        assert!("sales/order_items/extra".parse::<ExplorePath>().is_err());
        assert!("sales/ ".parse::<ExplorePath>().is_err());
    }

    #[test]
    fn modifiers_render_in_stable_order() {
        let modifiers = EmbedModifiers::new(true, true, Some("dark_mode".to_owned()))
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(
            modifiers.query_pairs(),
            vec![
                ("hide_title", "true".to_owned()),
                ("hide_filters", "true".to_owned()),
                ("theme", "dark_mode".to_owned()),
            ]
        );
    }

    #[test]
    fn modifiers_reject_theme_with_query_characters() {
        assert!(EmbedModifiers::new(false, false, Some("a&b=c".to_owned())).is_err());
    }

    #[test]
    fn blank_theme_is_treated_as_absent() {
        let modifiers = EmbedModifiers::new(false, false, Some("  ".to_owned()))
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(modifiers.theme(), None);
        assert!(modifiers.query_pairs().is_empty());
    }

    #[test]
    fn kind_follows_resource() {
        assert_eq!(EmbedTarget::dashboard(1).kind(), ResourceKind::Dashboard);
        assert_eq!(ResourceKind::Explore.to_string(), "explore");
    }

    proptest! {
        #[test]
        fn dashboard_path_interpolates_any_id(id in any::<u64>()) {
            let path = EmbedTarget::dashboard(id).embed_path();
            prop_assert_eq!(path, format!("/embed/dashboards/{id}"));
        }

        #[test]
        fn explore_path_round_trips_through_display(
            model in "[a-z][a-z0-9_]{0,15}",
            explore in "[a-z][a-z0-9_]{0,15}",
        ) {
            let raw = format!("{model}/{explore}");
            let parsed = raw.parse::<ExplorePath>();
            prop_assert!(parsed.is_ok());
            prop_assert_eq!(parsed.unwrap_or_else(|_| unreachable!()).to_string(), raw);
        }
    }
}
