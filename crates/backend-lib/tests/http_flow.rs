// crates/backend-lib/tests/http_flow.rs
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use boathouse_backend_lib::{
    auth::PasswordHasher,
    config::Settings,
    router::create_router,
    storage::MemoryStore,
    AppState,
};
use boathouse_common::Credential;
use tower::ServiceExt;

const FAST_WORK_FACTOR: u8 = 4;

fn app_with(store: &MemoryStore) -> Router {
    let mut settings = Settings::default();
    settings.password.work_factor = FAST_WORK_FACTOR;
    let state = AppState::new(Arc::new(store.clone()), Arc::new(store.clone()), settings).unwrap();
    create_router(Arc::new(state))
}

fn seeded() -> MemoryStore {
    let store = MemoryStore::new();
    let hash = PasswordHasher::new(FAST_WORK_FACTOR)
        .unwrap()
        .hash("correct-horse")
        .unwrap();
    store
        .insert_credential(Credential::new("alice", hash.into_string()))
        .unwrap();
    store
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_logout(cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri("/logout");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_login(form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_owned()))
        .unwrap()
}

fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

fn set_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .map(|v| v.to_str().unwrap().to_owned())
}

/// `sid=<token>` pair to send back on later requests
fn sid_pair(set_cookie: &str) -> String {
    set_cookie.split(';').next().unwrap().trim().to_owned()
}

#[tokio::test]
async fn test_ping() {
    let response = app_with(&MemoryStore::new())
        .oneshot(get("/ping", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), 1024).await.unwrap();
    assert_eq!(&body[..], b"OK");
}

#[tokio::test]
async fn test_anonymous_request_is_redirected() {
    let app = app_with(&seeded());

    let response = app.clone().oneshot(get("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/login");

    let response = app.oneshot(get("/", Some("sid=forged"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn test_login_page_renders() {
    let response = app_with(&seeded())
        .oneshot(get("/login", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
    assert!(String::from_utf8_lossy(&body).contains("name=\"persist\""));
}

#[tokio::test]
async fn test_full_session_flow() {
    let store = seeded();
    let app = app_with(&store);

    // login without "remember me"
    let response = app
        .clone()
        .oneshot(post_login("username=alice&pwd=correct-horse"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    let cookie = set_cookie(&response).expect("login sets the session cookie");
    assert!(cookie.starts_with("sid="));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("HttpOnly"));
    assert!(!cookie.contains("Max-Age"));
    assert_eq!(store.session_count(), 1);
    let sid = sid_pair(&cookie);

    // the gate lets the session through
    let response = app.clone().oneshot(get("/", Some(&sid))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
    assert!(String::from_utf8_lossy(&body).contains("Signed in as alice"));

    // an authenticated visit to /login bounces home
    let response = app.clone().oneshot(get("/login", Some(&sid))).await.unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/");

    // logout clears the cookie and the server-side row
    let response = app.clone().oneshot(post_logout(Some(&sid))).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    let removal = set_cookie(&response).unwrap();
    assert!(removal.starts_with("sid="));
    assert!(removal.contains("Max-Age=0"));
    assert_eq!(store.session_count(), 0);

    // replaying the old cookie no longer works
    let response = app.oneshot(get("/", Some(&sid))).await.unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn test_remember_me_sets_max_age() {
    let response = app_with(&seeded())
        .oneshot(post_login("username=alice&pwd=correct-horse&persist=on"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let cookie = set_cookie(&response).unwrap();
    assert!(cookie.contains("Max-Age=31536000"));
}

#[tokio::test]
async fn test_bad_credentials_rerender_form() {
    let store = seeded();
    let app = app_with(&store);

    for form in [
        "username=alice&pwd=wrong",
        "username=mallory&pwd=correct-horse",
    ] {
        let response = app.clone().oneshot(post_login(form)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(set_cookie(&response).is_none());

        let body = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        assert!(String::from_utf8_lossy(&body).contains("Incorrect username or password"));
    }
    assert_eq!(store.session_count(), 0);

    let response = app.oneshot(get("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn test_relogin_revokes_previous_session() {
    let store = seeded();
    let app = app_with(&store);

    let first = app
        .clone()
        .oneshot(post_login("username=alice&pwd=correct-horse"))
        .await
        .unwrap();
    let old_sid = sid_pair(&set_cookie(&first).unwrap());

    let second = Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::COOKIE, &old_sid)
        .body(Body::from("username=alice&pwd=correct-horse"))
        .unwrap();
    let response = app.clone().oneshot(second).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(store.session_count(), 1);

    let response = app.oneshot(get("/", Some(&old_sid))).await.unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn test_logout_without_cookie() {
    let response = app_with(&seeded())
        .oneshot(post_logout(None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_logout_rejects_get() {
    let store = seeded();
    let app = app_with(&store);

    let response = app
        .clone()
        .oneshot(post_login("username=alice&pwd=correct-horse"))
        .await
        .unwrap();
    let sid = sid_pair(&set_cookie(&response).unwrap());

    let response = app.clone().oneshot(get("/logout", Some(&sid))).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert!(set_cookie(&response).is_none());
    assert_eq!(store.session_count(), 1);

    let response = app.oneshot(get("/", Some(&sid))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
