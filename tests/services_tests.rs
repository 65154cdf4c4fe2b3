//! AuthService / LinkService tests

mod common;

use std::sync::Arc;

use tinylink::api::jwt::JwtService;
use tinylink::config::StaticConfig;
use tinylink::domain::{LinkRegistry, VisitTracker};
use tinylink::errors::TinylinkError;
use tinylink::runtime::StartupContext;
use tinylink::runtime::startup::{DEMO_EMAILS, DEMO_PASSWORD};
use tinylink::services::{AuthService, LinkService};

use common::{PlainHasher, account, identity_store};

const SECRET: &str = "test_secret_key_32_bytes_long!!";

fn auth_service() -> AuthService {
    AuthService::new(identity_store(), JwtService::new(SECRET, 60))
}

fn link_service() -> LinkService {
    LinkService::new(Arc::new(LinkRegistry::default()))
}

// =============================================================================
// AuthService
// =============================================================================

#[tokio::test]
async fn test_register_issues_resolvable_session() {
    let auth = auth_service();
    let session = auth
        .register("user@example.com", "purple-monkey-dinosaur")
        .await
        .unwrap();

    assert_eq!(session.account.email, "user@example.com");
    assert_eq!(auth.resolve_token(&session.token), Some(session.account));
}

#[tokio::test]
async fn test_login_round_trip() {
    let auth = auth_service();
    let registered = auth.register("user@example.com", "secret").await.unwrap();

    let session = auth.login("user@example.com", "secret").await.unwrap();
    assert_eq!(session.account, registered.account);
    assert_eq!(auth.resolve_token(&session.token), Some(registered.account));
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let auth = auth_service();
    auth.register("user@example.com", "secret").await.unwrap();

    let wrong_secret = auth.login("user@example.com", "nope").await.unwrap_err();
    let unknown_email = auth.login("nobody@example.com", "secret").await.unwrap_err();

    assert!(matches!(wrong_secret, TinylinkError::LoginFailed(_)));
    assert_eq!(wrong_secret, unknown_email);
    assert_eq!(wrong_secret.http_status().as_u16(), 403);
}

#[tokio::test]
async fn test_register_errors_map_to_bad_request() {
    let auth = auth_service();
    auth.register("user@example.com", "secret").await.unwrap();

    let blank = auth.register("", "secret").await.unwrap_err();
    assert!(matches!(blank, TinylinkError::EmailBlank(_)));
    assert_eq!(blank.http_status().as_u16(), 400);

    let no_secret = auth.register("x@example.com", "").await.unwrap_err();
    assert!(matches!(no_secret, TinylinkError::SecretBlank(_)));

    let taken = auth.register("user@example.com", "other").await.unwrap_err();
    assert!(matches!(taken, TinylinkError::EmailTaken(_)));
    assert_eq!(taken.http_status().as_u16(), 400);
}

#[tokio::test]
async fn test_resolve_token_rejects_garbage_and_strangers() {
    let auth = auth_service();
    assert!(auth.resolve_token("not-a-token").is_none());
    assert!(auth.resolve_token("").is_none());

    // 同一密钥签发、但账号不在本 store 中
    let other = AuthService::new(identity_store(), JwtService::new(SECRET, 60));
    let session = other.register("ghost@example.com", "secret").await.unwrap();
    assert!(auth.resolve_token(&session.token).is_none());
}

// =============================================================================
// LinkService
// =============================================================================

#[test]
fn test_create_requires_identity_and_target() {
    let links = link_service();

    let anon = links.create_link(None, "https://example.com").unwrap_err();
    assert!(matches!(anon, TinylinkError::Unauthenticated(_)));

    let owner = account("owner");
    let blank = links.create_link(Some(&owner), "   ").unwrap_err();
    assert!(matches!(blank, TinylinkError::Validation(_)));
    assert!(links.registry().is_empty());

    let link = links
        .create_link(Some(&owner), "  https://example.com ")
        .unwrap();
    assert_eq!(link.target, "https://example.com");
    assert_eq!(link.owner_id, owner.id);
}

#[test]
fn test_view_link_precedence() {
    let links = link_service();
    let owner = account("owner");
    let other = account("other");
    let link = links.create_link(Some(&owner), "https://example.com").unwrap();

    let details = links.view_link(Some(&owner), &link.code).unwrap();
    assert_eq!(details.link.code, link.code);
    assert_eq!(details.stats.total_visits, 0);

    assert!(matches!(
        links.view_link(Some(&other), &link.code),
        Err(TinylinkError::Forbidden(_))
    ));
    assert!(matches!(
        links.view_link(None, &link.code),
        Err(TinylinkError::Unauthenticated(_))
    ));
    assert!(matches!(
        links.view_link(None, "nope42"),
        Err(TinylinkError::NotFound(_))
    ));
}

#[test]
fn test_update_link() {
    let links = link_service();
    let owner = account("owner");
    let link = links.create_link(Some(&owner), "https://one.example").unwrap();

    assert!(matches!(
        links.update_link(Some(&account("other")), &link.code, "https://x.example"),
        Err(TinylinkError::Forbidden(_))
    ));
    assert!(matches!(
        links.update_link(None, &link.code, "https://x.example"),
        Err(TinylinkError::Unauthenticated(_))
    ));
    assert!(matches!(
        links.update_link(Some(&owner), &link.code, ""),
        Err(TinylinkError::Validation(_))
    ));
    // 策略先于校验：非所有者即使目标为空也得到 403
    assert!(matches!(
        links.update_link(Some(&account("other")), &link.code, ""),
        Err(TinylinkError::Forbidden(_))
    ));

    let updated = links
        .update_link(Some(&owner), &link.code, "https://two.example")
        .unwrap();
    assert_eq!(updated.target, "https://two.example");
}

#[test]
fn test_delete_link() {
    let links = link_service();
    let owner = account("owner");
    let link = links.create_link(Some(&owner), "https://example.com").unwrap();

    assert!(matches!(
        links.delete_link(Some(&account("other")), &link.code),
        Err(TinylinkError::Forbidden(_))
    ));
    assert!(links.registry().contains(&link.code));

    links.delete_link(Some(&owner), &link.code).unwrap();
    assert!(!links.registry().contains(&link.code));

    assert!(matches!(
        links.delete_link(Some(&owner), &link.code),
        Err(TinylinkError::NotFound(_))
    ));
}

#[test]
fn test_list_links_scoped_to_caller() {
    let links = link_service();
    let alice = account("alice");
    let bob = account("bob");

    links.create_link(Some(&alice), "https://a.example/1").unwrap();
    links.create_link(Some(&bob), "https://b.example/1").unwrap();
    links.create_link(Some(&alice), "https://a.example/2").unwrap();

    let mine = links.list_links(Some(&alice)).unwrap();
    let targets: Vec<_> = mine.iter().map(|d| d.link.target.as_str()).collect();
    assert_eq!(targets, vec!["https://a.example/1", "https://a.example/2"]);

    assert!(matches!(
        links.list_links(None),
        Err(TinylinkError::Unauthenticated(_))
    ));
}

#[test]
fn test_resolve_redirect_counts_visits() {
    let links = link_service();
    let owner = account("owner");
    let link = links.create_link(Some(&owner), "https://example.com").unwrap();

    for origin in ["10.0.0.1", "10.0.0.1", "10.0.0.2", "unknown"] {
        assert_eq!(
            links.resolve_redirect(&link.code, origin).unwrap(),
            "https://example.com"
        );
    }

    let details = links.view_link(Some(&owner), &link.code).unwrap();
    assert_eq!(details.stats.total_visits, 4);
    assert_eq!(details.stats.unique_origins, 3);
    assert_eq!(
        VisitTracker::stats(&details.link),
        details.stats
    );

    assert!(matches!(
        links.resolve_redirect("nope42", "10.0.0.1"),
        Err(TinylinkError::NotFound(_))
    ));
}

#[test]
fn test_link_details_serializes_flat() {
    let links = link_service();
    let owner = account("owner");
    let link = links.create_link(Some(&owner), "https://example.com").unwrap();
    links.resolve_redirect(&link.code, "10.0.0.1").unwrap();

    let details = links.view_link(Some(&owner), &link.code).unwrap();
    let json = serde_json::to_value(&details).unwrap();
    assert_eq!(json["code"], link.code.as_str());
    assert_eq!(json["total_visits"], 1);
    assert_eq!(json["unique_origins"], 1);
}

// =============================================================================
// Startup wiring
// =============================================================================

#[tokio::test]
async fn test_seed_demo() {
    let context = StartupContext::with_hasher(&StaticConfig::default(), Arc::new(PlainHasher));
    context.seed_demo().await.unwrap();

    assert_eq!(context.identities.len(), 2);
    assert_eq!(context.registry.len(), 2);

    let first = context.identities.find_by_email(DEMO_EMAILS[0]).unwrap();
    let second = context.identities.find_by_email(DEMO_EMAILS[1]).unwrap();
    assert_eq!(context.registry.list_for_owner(&first.id).len(), 2);
    assert!(context.registry.list_for_owner(&second.id).is_empty());

    let session = context
        .auth_service
        .login(DEMO_EMAILS[1], DEMO_PASSWORD)
        .await
        .unwrap();
    assert_eq!(session.account, second);
}

#[tokio::test]
async fn test_startup_uses_configured_code_length() {
    let mut config = StaticConfig::default();
    config.links.code_length = 9;
    let context = StartupContext::with_hasher(&config, Arc::new(PlainHasher));

    let link = context
        .link_service
        .create_link(Some(&account("owner")), "https://example.com")
        .unwrap();
    assert_eq!(link.code.len(), 9);
}
