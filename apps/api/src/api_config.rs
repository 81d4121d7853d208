use std::collections::BTreeMap;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use embedgate_core::AppError;
use embedgate_domain::{EmbedUser, EmbedUserInput, ExplorePath, LOCALE_ATTRIBUTE};
use embedgate_infrastructure::{DEFAULT_LOOKER_API_VERSION, LookerApiSettings};
use tracing_subscriber::EnvFilter;

const DEFAULT_PERMISSIONS: &str = "access_data,see_looks,see_user_dashboards,explore";

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_host: IpAddr,
    pub api_port: u16,
    pub frontend_url: String,
    pub upstream_base_url: Option<String>,
    pub looker_api: Option<LookerApiSettings>,
    pub default_dashboard_id: u64,
    pub default_explore: ExplorePath,
    pub embed_user: EmbedUser,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable source.
    ///
    /// Missing upstream settings are allowed here; they surface as a
    /// configuration error on every signing call instead.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let api_host = parse_var(&var, "API_HOST", IpAddr::from([127, 0, 0, 1]))?;
        let api_port = parse_var(&var, "API_PORT", 3001_u16)?;
        let frontend_url =
            var("FRONTEND_URL").unwrap_or_else(|| "http://localhost:3000".to_owned());

        let upstream_base_url = var("LOOKERSDK_BASE_URL");
        let looker_api = match (
            upstream_base_url.clone(),
            var("LOOKERSDK_CLIENT_ID"),
            var("LOOKERSDK_CLIENT_SECRET"),
        ) {
            (Some(base_url), Some(client_id), Some(client_secret)) => Some(LookerApiSettings {
                base_url,
                client_id,
                client_secret,
                api_version: var("LOOKERSDK_API_VERSION")
                    .unwrap_or_else(|| DEFAULT_LOOKER_API_VERSION.to_owned()),
            }),
            _ => None,
        };

        let default_dashboard_id = parse_var(&var, "EMBED_DASHBOARD_ID", 332_u64)?;
        let default_explore = var("EMBED_EXPLORE_PATH")
            .unwrap_or_else(|| "sales/order_items".to_owned())
            .parse::<ExplorePath>()?;

        let group_ids = list_var(&var, "EMBED_GROUP_IDS", "23")
            .into_iter()
            .map(|value| {
                value.parse::<u64>().map_err(|error| {
                    AppError::Validation(format!("invalid EMBED_GROUP_IDS entry '{value}': {error}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let embed_user = EmbedUser::new(EmbedUserInput {
            external_user_id: var("EMBED_EXTERNAL_USER_ID").unwrap_or_else(|| "7777777".to_owned()),
            first_name: var("EMBED_FIRST_NAME").unwrap_or_else(|| "Prabha7".to_owned()),
            last_name: var("EMBED_LAST_NAME").unwrap_or_else(|| "Embed7".to_owned()),
            session_length: parse_var(&var, "EMBED_SESSION_LENGTH", 3600_u32)?,
            force_logout_login: parse_var(&var, "EMBED_FORCE_LOGOUT_LOGIN", true)?,
            permissions: list_var(&var, "EMBED_PERMISSIONS", DEFAULT_PERMISSIONS),
            models: list_var(&var, "EMBED_MODELS", "sales"),
            group_ids,
            external_group_id: Some(
                var("EMBED_EXTERNAL_GROUP_ID").unwrap_or_else(|| "23".to_owned()),
            ),
            user_attributes: BTreeMap::from([(
                LOCALE_ATTRIBUTE.to_owned(),
                var("EMBED_LOCALE").unwrap_or_else(|| "en_US".to_owned()),
            )]),
            access_filters: BTreeMap::new(),
        })?;

        Ok(Self {
            api_host,
            api_port,
            frontend_url,
            upstream_base_url,
            looker_api,
            default_dashboard_id,
            default_explore,
            embed_user,
        })
    }

    #[must_use]
    pub fn socket_address(&self) -> SocketAddr {
        SocketAddr::from((self.api_host, self.api_port))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn parse_var<T>(var: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match var(name) {
        Some(value) => value
            .parse::<T>()
            .map_err(|error| AppError::Validation(format!("invalid {name} '{value}': {error}"))),
        None => Ok(default),
    }
}

fn list_var(var: &impl Fn(&str) -> Option<String>, name: &str, default: &str) -> Vec<String> {
    var(name)
        .unwrap_or_else(|| default.to_owned())
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use embedgate_core::AppError;

    use super::ApiConfig;

    fn load(vars: &[(&str, &str)]) -> Result<ApiConfig, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect();
        ApiConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_reproduce_the_demo_profile() {
        let config = load(&[]).unwrap_or_else(|_| unreachable!());

        assert_eq!(config.socket_address().to_string(), "127.0.0.1:3001");
        assert_eq!(config.api_port, 3001);
        assert_eq!(config.frontend_url, "http://localhost:3000");
        assert_eq!(config.default_dashboard_id, 332);
        assert_eq!(config.default_explore.to_string(), "sales/order_items");
        assert_eq!(config.embed_user.external_user_id(), "7777777");
        assert_eq!(config.embed_user.session_length(), 3600);
        assert!(config.embed_user.force_logout_login());
        assert_eq!(config.embed_user.permissions().count(), 4);
        assert_eq!(config.embed_user.group_ids().collect::<Vec<_>>(), vec![23]);
        assert_eq!(config.embed_user.locale(), Some("en_US"));
        assert!(config.upstream_base_url.is_none());
        assert!(config.looker_api.is_none());
    }

    #[test]
    fn api_host_accepts_ip_addresses() {
        let config = load(&[("API_HOST", "0.0.0.0"), ("API_PORT", "8080")])
            .unwrap_or_else(|_| unreachable!());

        assert_eq!(config.socket_address().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn upstream_settings_require_all_credentials() {
        let partial = load(&[("LOOKERSDK_BASE_URL", "https://example.looker.com")])
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(
            partial.upstream_base_url.as_deref(),
            Some("https://example.looker.com")
        );
        assert!(partial.looker_api.is_none());

        let complete = load(&[
            ("LOOKERSDK_BASE_URL", "https://example.looker.com"),
            ("LOOKERSDK_CLIENT_ID", "id"),
            ("LOOKERSDK_CLIENT_SECRET", "secret"),
        ])
        .unwrap_or_else(|_| unreachable!());
        let api = complete.looker_api.unwrap_or_else(|| unreachable!());
        assert_eq!(api.api_version, "4.0");
    }

    #[test]
    fn profile_lists_are_parsed_from_comma_separated_values() {
        let config = load(&[
            ("EMBED_PERMISSIONS", "access_data, explore ,"),
            ("EMBED_MODELS", "sales,marketing"),
            ("EMBED_GROUP_IDS", "5,7"),
        ])
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(
            config.embed_user.permissions().collect::<Vec<_>>(),
            vec!["access_data", "explore"]
        );
        assert_eq!(
            config.embed_user.models().collect::<Vec<_>>(),
            vec!["marketing", "sales"]
        );
        assert_eq!(config.embed_user.group_ids().collect::<Vec<_>>(), vec![5, 7]);
    }

    #[test]
    fn malformed_values_fail_startup() {
        assert!(matches!(
            load(&[("API_HOST", "localhost:3001")]),
            Err(AppError::Validation(_))
        ));
        assert!(load(&[("API_PORT", "http")]).is_err());
        assert!(load(&[("EMBED_GROUP_IDS", "23,abc")]).is_err());
        assert!(load(&[("EMBED_SESSION_LENGTH", "0")]).is_err());
        assert!(load(&[("EMBED_EXPLORE_PATH", "order_items")]).is_err());
        assert!(load(&[("EMBED_FORCE_LOGOUT_LOGIN", "yes")]).is_err());
    }
}
