use embedgate_application::EmbedAuthorizationService;
use embedgate_domain::ExplorePath;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub embed_authorization_service: EmbedAuthorizationService,
    pub default_dashboard_id: u64,
    pub default_explore: ExplorePath,
}
