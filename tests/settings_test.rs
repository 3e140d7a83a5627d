//! End-to-end tests for the settings pages.
//!
//! Every test drives the real router against a fresh in-memory SQLite
//! database with one provisioned account.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
        Request, StatusCode,
    },
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use studyolle_settings::api::{create_router, AppState};
use studyolle_settings::config::Config;
use studyolle_settings::domain::{Account, Password};
use studyolle_settings::infra::Database;
use studyolle_settings::services::{ServiceContainer, Services};

const INITIAL_PASSWORD: &str = "initial-password";

struct TestApp {
    router: Router,
    services: Services,
    account_id: Uuid,
    token: String,
}

impl TestApp {
    async fn new() -> Self {
        let db = Arc::new(Database::connect("sqlite::memory:").await.unwrap());
        let config = Config::new(
            "sqlite::memory:",
            "test-secret-key-that-is-at-least-32-chars",
        )
        .unwrap();
        let services = Services::from_connection(db.get_connection(), config);

        let account = services
            .auth()
            .register(
                "gicheol".to_string(),
                "gicheol@example.com".to_string(),
                INITIAL_PASSWORD.to_string(),
            )
            .await
            .unwrap();
        let token = services.auth().issue_token(&account).unwrap().access_token;

        let router = create_router(AppState::from_container(&services, db));

        Self {
            router,
            services,
            account_id: account.id,
            token,
        }
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder()
            .uri(uri)
            .header(AUTHORIZATION, format!("Bearer {}", self.token));
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    async fn post_form(&self, uri: &str, fields: &[(&str, &str)]) -> Response {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, form_encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    async fn post_json(&self, uri: &str, body: Value) -> Response {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn account(&self) -> Account {
        self.services
            .settings()
            .account(self.account_id)
            .await
            .unwrap()
    }
}

/// Percent-encode everything but ASCII alphanumerics
fn form_encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| {
            if b.is_ascii_alphanumeric() {
                (b as char).to_string()
            } else {
                format!("%{:02X}", b)
            }
        })
        .collect()
}

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Raw Set-Cookie header of the response
fn set_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

/// `name=value` part of a Set-Cookie header, as a browser would send it back
fn cookie_pair(set_cookie: &str) -> String {
    set_cookie.split(';').next().unwrap_or_default().trim().to_string()
}

// =============================================================================
// Profile
// =============================================================================

#[tokio::test]
async fn test_profile_form_shows_stored_values() {
    let app = TestApp::new().await;

    let response = app.get("/settings/profile", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["view"], "settings/profile");
    assert_eq!(json["account"]["nickname"], "gicheol");
    assert!(json["profile"]["bio"].is_null());
    assert!(json.get("message").is_none());
    assert!(json.get("errors").is_none());
}

#[tokio::test]
async fn test_update_profile_redirects_and_stores_bio() {
    let app = TestApp::new().await;

    let response = app
        .post_form("/settings/profile", &[("bio", "짧은 소개")])
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/settings/profile");
    let flash = set_cookie(&response).expect("flash cookie");
    assert!(flash.starts_with("flash="));

    assert_eq!(app.account().await.bio.as_deref(), Some("짧은 소개"));
}

#[tokio::test]
async fn test_update_profile_stores_every_field() {
    let app = TestApp::new().await;

    let response = app
        .post_form(
            "/settings/profile",
            &[
                ("bio", "hello"),
                ("url", "https://example.com"),
                ("occupation", "Backend developer"),
                ("location", "Seoul"),
                ("profileImage", ""),
            ],
        )
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let account = app.account().await;
    assert_eq!(account.url.as_deref(), Some("https://example.com"));
    assert_eq!(account.occupation.as_deref(), Some("Backend developer"));
    assert_eq!(account.location.as_deref(), Some("Seoul"));
    assert_eq!(account.profile_image, None);
}

#[tokio::test]
async fn test_update_profile_rejects_long_bio() {
    let app = TestApp::new().await;
    let long_bio = "너무 긴 소개입니다. ".repeat(10);

    let response = app
        .post_form("/settings/profile", &[("bio", long_bio.as_str())])
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response).is_none());

    let json = body_json(response).await;
    assert_eq!(json["view"], "settings/profile");
    assert_eq!(json["account"]["nickname"], "gicheol");
    assert_eq!(json["profile"]["bio"], long_bio.as_str());
    assert!(json["errors"]["fields"]["bio"].is_array());

    assert_eq!(app.account().await.bio, None);
}

#[tokio::test]
async fn test_update_profile_rejects_long_url() {
    let app = TestApp::new().await;
    let long_url = format!("https://example.com/{}", "a".repeat(40));

    let response = app.post_form("/settings/profile", &[("url", &long_url)]).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["errors"]["fields"]["url"].is_array());
    assert_eq!(app.account().await.url, None);
}

#[tokio::test]
async fn test_flash_message_is_shown_once() {
    let app = TestApp::new().await;

    let response = app.post_form("/settings/profile", &[("bio", "hello")]).await;
    let flash = cookie_pair(&set_cookie(&response).expect("flash cookie"));

    let response = app.get("/settings/profile", Some(&flash)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let cleared = set_cookie(&response).expect("flash cookie cleared");
    assert!(cleared.starts_with("flash="));
    assert!(cleared.contains("Max-Age=0"));

    let json = body_json(response).await;
    assert_eq!(json["message"], "프로필을 수정했습니다.");
    assert_eq!(json["profile"]["bio"], "hello");

    // The browser has dropped the cookie
    let json = body_json(app.get("/settings/profile", None).await).await;
    assert!(json.get("message").is_none());
}

// =============================================================================
// Password
// =============================================================================

#[tokio::test]
async fn test_password_form_is_empty() {
    let app = TestApp::new().await;

    let response = app.get("/settings/password", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["view"], "settings/password");
    assert_eq!(json["account"]["nickname"], "gicheol");
    assert_eq!(json["passwordForm"]["newPassword"], "");
    assert_eq!(json["passwordForm"]["newPasswordConfirm"], "");
}

#[tokio::test]
async fn test_update_password_changes_hash() {
    let app = TestApp::new().await;

    let response = app
        .post_form(
            "/settings/password",
            &[("newPassword", "12345678"), ("newPasswordConfirm", "12345678")],
        )
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/settings/password");
    let flash = cookie_pair(&set_cookie(&response).expect("flash cookie"));

    let stored = Password::from_hash(app.account().await.password_hash);
    assert!(stored.verify("12345678"));
    assert!(!stored.verify(INITIAL_PASSWORD));

    let json = body_json(app.get("/settings/password", Some(&flash)).await).await;
    assert_eq!(json["message"], "패스워드를 변경했습니다.");
}

#[tokio::test]
async fn test_update_password_rejects_mismatch() {
    let app = TestApp::new().await;

    let response = app
        .post_form(
            "/settings/password",
            &[("newPassword", "12345678"), ("newPasswordConfirm", "11111111")],
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response).is_none());

    let json = body_json(response).await;
    assert_eq!(json["view"], "settings/password");
    assert_eq!(json["account"]["nickname"], "gicheol");
    assert_eq!(json["errors"]["global"].as_array().map(Vec::len), Some(1));
    assert_eq!(json["passwordForm"]["newPassword"], "");

    let stored = Password::from_hash(app.account().await.password_hash);
    assert!(stored.verify(INITIAL_PASSWORD));
}

#[tokio::test]
async fn test_update_password_rejects_short_password() {
    let app = TestApp::new().await;

    let response = app
        .post_form(
            "/settings/password",
            &[("newPassword", "1234"), ("newPasswordConfirm", "1234")],
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["errors"]["fields"]["newPassword"].is_array());
}

// =============================================================================
// Tags
// =============================================================================

async fn tags_page(app: &TestApp) -> Value {
    let response = app.get("/settings/tags", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

#[tokio::test]
async fn test_tags_form_starts_empty() {
    let app = TestApp::new().await;

    let json = tags_page(&app).await;
    assert_eq!(json["view"], "settings/tags");
    assert_eq!(json["tags"], json!([]));
    assert_eq!(json["whitelist"], json!([]));
}

#[tokio::test]
async fn test_add_tag_creates_and_associates() {
    let app = TestApp::new().await;

    let response = app
        .post_json("/settings/tags/add", json!({ "tagTitle": " newTag " }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = tags_page(&app).await;
    assert_eq!(json["tags"], json!(["newTag"]));
    assert_eq!(json["whitelist"], json!(["newTag"]));
}

#[tokio::test]
async fn test_add_tag_is_idempotent() {
    let app = TestApp::new().await;

    for _ in 0..2 {
        let response = app
            .post_json("/settings/tags/add", json!({ "tagTitle": "spring" }))
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let json = tags_page(&app).await;
    assert_eq!(json["tags"], json!(["spring"]));
}

#[tokio::test]
async fn test_remove_tag_keeps_it_in_whitelist() {
    let app = TestApp::new().await;
    app.post_json("/settings/tags/add", json!({ "tagTitle": "spring" }))
        .await;
    app.post_json("/settings/tags/add", json!({ "tagTitle": "jpa" }))
        .await;

    let response = app
        .post_json("/settings/tags/remove", json!({ "tagTitle": "spring" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = tags_page(&app).await;
    assert_eq!(json["tags"], json!(["jpa"]));
    assert_eq!(json["whitelist"], json!(["jpa", "spring"]));
}

#[tokio::test]
async fn test_remove_unknown_tag_is_noop() {
    let app = TestApp::new().await;

    let response = app
        .post_json("/settings/tags/remove", json!({ "tagTitle": "unknown" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = tags_page(&app).await;
    assert_eq!(json["whitelist"], json!([]));
}

#[tokio::test]
async fn test_remove_tag_held_only_by_another_account() {
    let app = TestApp::new().await;
    let other = app
        .services
        .auth()
        .register(
            "whiteship".to_string(),
            "whiteship@example.com".to_string(),
            INITIAL_PASSWORD.to_string(),
        )
        .await
        .unwrap();
    app.services.settings().add_tag(other.id, "jpa").await.unwrap();

    let response = app
        .post_json("/settings/tags/remove", json!({ "tagTitle": "jpa" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = tags_page(&app).await;
    assert_eq!(json["tags"], json!([]));
    assert_eq!(json["whitelist"], json!(["jpa"]));

    let others = app.services.settings().tag_settings(other.id).await.unwrap();
    assert_eq!(others.tags, vec!["jpa"]);
}

#[tokio::test]
async fn test_blank_tag_title_is_rejected() {
    let app = TestApp::new().await;

    for title in ["", "   "] {
        let response = app
            .post_json("/settings/tags/add", json!({ "tagTitle": title }))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(json["error"]["field"], "tagTitle");
    }

    let response = app
        .post_json("/settings/tags/remove", json!({ "tagTitle": "" }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = tags_page(&app).await;
    assert_eq!(json["whitelist"], json!([]));
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn test_settings_require_authentication() {
    let app = TestApp::new().await;

    for uri in ["/settings/profile", "/settings/password", "/settings/tags"] {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.send(request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }

    let request = Request::builder()
        .uri("/settings/profile")
        .header(AUTHORIZATION, "Bearer not-a-token")
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.send(request).await.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_token_opens_settings() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "login": "gicheol@example.com", "password": INITIAL_PASSWORD }).to_string(),
        ))
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let token = body_json(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    let request = Request::builder()
        .uri("/settings/profile")
        .header(AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.send(request).await.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "login": "gicheol", "password": "wrong-password" }).to_string(),
        ))
        .unwrap();

    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["error"]["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn test_health_reports_database() {
    let app = TestApp::new().await;

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["database"]["status"], "healthy");
}
