use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use embedgate_core::{AppError, AppResult};
use embedgate_domain::{
    EmbedModifiers, EmbedTarget, EmbedUser, EmbedUserInput, ExplorePath, SignedEmbedUrl,
};
use tokio::sync::Mutex;

use super::{EmbedAuthorizationService, EmbedSignRequest, EmbedSigningSettings, EmbedUrlSigner};

/// Signer that appends a per-call signature to the target URL.
#[derive(Default)]
struct RecordingSigner {
    requests: Mutex<Vec<EmbedSignRequest>>,
}

#[async_trait]
impl EmbedUrlSigner for RecordingSigner {
    async fn sign_embed_url(&self, request: EmbedSignRequest) -> AppResult<SignedEmbedUrl> {
        let mut requests = self.requests.lock().await;
        let signed = SignedEmbedUrl::new(
            format!("{}&signature=sig-{}", request.target_url, requests.len()),
            Some(request.user.session_length()),
        )?;
        requests.push(request);
        Ok(signed)
    }
}

struct RejectingSigner;

#[async_trait]
impl EmbedUrlSigner for RejectingSigner {
    async fn sign_embed_url(&self, _request: EmbedSignRequest) -> AppResult<SignedEmbedUrl> {
        Err(AppError::Signing("upstream rejected credentials".to_owned()))
    }
}

fn embed_user() -> EmbedUser {
    EmbedUser::new(EmbedUserInput {
        external_user_id: "7777777".to_owned(),
        first_name: "Prabha7".to_owned(),
        last_name: "Embed7".to_owned(),
        session_length: 3600,
        force_logout_login: true,
        permissions: vec!["access_data".to_owned(), "explore".to_owned()],
        models: vec!["sales".to_owned()],
        group_ids: vec![23],
        external_group_id: Some("23".to_owned()),
        user_attributes: BTreeMap::from([("locale".to_owned(), "en_US".to_owned())]),
        access_filters: BTreeMap::new(),
    })
    .unwrap_or_else(|_| unreachable!())
}

fn build_service(
    signer: Arc<dyn EmbedUrlSigner>,
    upstream_base_url: Option<&str>,
) -> EmbedAuthorizationService {
    EmbedAuthorizationService::new(
        signer,
        EmbedSigningSettings {
            upstream_base_url: upstream_base_url.map(str::to_owned),
            embed_domain: "http://localhost:3000".to_owned(),
            user: embed_user(),
        },
    )
}

#[tokio::test]
async fn dashboard_url_interpolates_path_and_embed_domain() {
    let signer = Arc::new(RecordingSigner::default());
    let service = build_service(signer.clone(), Some("https://example.looker.com"));

    let signed = service.sign_embed_url(&EmbedTarget::dashboard(332)).await;

    assert!(signed.is_ok());
    let signed = signed.unwrap_or_else(|_| unreachable!());
    assert!(signed.url().starts_with(
        "https://example.looker.com/embed/dashboards/332?embed_domain=http://localhost:3000&"
    ));

    let requests = signer.requests.lock().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].embed_domain, "http://localhost:3000");
    assert_eq!(requests[0].user.external_user_id(), "7777777");
}

#[tokio::test]
async fn explore_url_carries_modifiers_after_embed_domain() {
    let signer = Arc::new(RecordingSigner::default());
    let service = build_service(signer.clone(), Some("https://example.looker.com/"));
    let path = "sales/order_items"
        .parse::<ExplorePath>()
        .unwrap_or_else(|_| unreachable!());
    let modifiers = EmbedModifiers::new(true, false, Some("dark".to_owned()))
        .unwrap_or_else(|_| unreachable!());

    let target_url = service.target_url(&EmbedTarget::explore(path).with_modifiers(modifiers));

    assert_eq!(
        target_url.unwrap_or_else(|_| unreachable!()),
        "https://example.looker.com/embed/explore/sales/order_items?embed_domain=http://localhost:3000&hide_title=true&theme=dark"
    );
}

#[tokio::test]
async fn repeated_calls_issue_independent_signing_requests() {
    let signer = Arc::new(RecordingSigner::default());
    let service = build_service(signer.clone(), Some("https://example.looker.com"));
    let target = EmbedTarget::dashboard(332);

    let first = service.sign_embed_url(&target).await;
    let second = service.sign_embed_url(&target).await;

    assert!(first.is_ok());
    assert!(second.is_ok());
    assert_ne!(
        first.unwrap_or_else(|_| unreachable!()).url(),
        second.unwrap_or_else(|_| unreachable!()).url()
    );
    assert_eq!(signer.requests.lock().await.len(), 2);
}

#[tokio::test]
async fn missing_upstream_base_url_fails_without_calling_signer() {
    let signer = Arc::new(RecordingSigner::default());
    let service = build_service(signer.clone(), None);

    let result = service.sign_embed_url(&EmbedTarget::dashboard(332)).await;

    assert!(matches!(result, Err(AppError::Configuration(_))));
    assert!(signer.requests.lock().await.is_empty());
}

#[tokio::test]
async fn signer_rejection_is_propagated() {
    let service = build_service(Arc::new(RejectingSigner), Some("https://example.looker.com"));

    let result = service.sign_embed_url(&EmbedTarget::dashboard(332)).await;

    assert!(matches!(result, Err(AppError::Signing(_))));
}
