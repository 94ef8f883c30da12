//! Integration tests for the HTTP surface: routing, the authorization gate,
//! login/signup flows, and the document lifecycle.

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use tempfile::TempDir;
use tower::util::ServiceExt;

use vellum_cms::config::Config;
use vellum_cms::{http_server, AppState};

const ADMIN_PASSWORD: &str = "correcthorse";

fn test_state(temp: &TempDir) -> AppState {
    let config = Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        data_dir: temp.path().join("data"),
        credentials_path: temp.path().join("users.toml"),
        admin_user: "admin".to_string(),
        session_secret: Some("an-unguessable-test-secret-of-enough-bytes".to_string()),
        log_level: tracing::Level::INFO,
        log_dir: None,
    };
    AppState::from_config(&config).unwrap()
}

fn get(uri: &str, cookies: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookies) = cookies {
        builder = builder.header(header::COOKIE, cookies);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str, cookies: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookies) = cookies {
        builder = builder.header(header::COOKIE, cookies);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Fold the response's Set-Cookie headers into a Cookie header value.
fn cookies_from(response: &Response<Body>) -> String {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .map(str::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("")
}

/// Register `username` and sign in, returning the session cookies.
async fn sign_in(app: &Router, state: &AppState, username: &str, password: &str) -> String {
    if !state.credentials().load_all().unwrap().contains_key(username) {
        state.credentials().register(username, password).unwrap();
    }
    let response = app
        .clone()
        .oneshot(post_form(
            "/users/login",
            &format!("username={username}&password={password}"),
            None,
        ))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    cookies_from(&response)
}

#[tokio::test]
async fn test_index_lists_documents() {
    let temp = TempDir::new().unwrap();
    let state = test_state(&temp);
    let app = http_server::router(state.clone());

    state.documents().write("about.md", b"hello").unwrap();
    state.documents().write("changes.txt", b"log").unwrap();

    let response = app.oneshot(get("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("about.md"));
    assert!(body.contains("changes.txt"));
    // Anonymous visitors get no mutation affordances.
    assert!(!body.contains("/new"));
}

#[tokio::test]
async fn test_view_missing_document_redirects_with_error() {
    let temp = TempDir::new().unwrap();
    let state = test_state(&temp);
    let app = http_server::router(state);

    let response = app
        .clone()
        .oneshot(get("/ghost.txt", None))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/");

    // The flash error shows up once on the next page...
    let cookies = cookies_from(&response);
    let response = app
        .clone()
        .oneshot(get("/", Some(&cookies)))
        .await
        .unwrap();
    let body = body_string(response).await;
    assert!(body.contains("ghost.txt does not exist"));
}

#[tokio::test]
async fn test_view_renders_markdown_as_html() {
    let temp = TempDir::new().unwrap();
    let state = test_state(&temp);
    let app = http_server::router(state.clone());

    state.documents().write("notes.md", b"# Hello").unwrap();

    let response = app.oneshot(get("/notes.md", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("<h1>Hello</h1>"));
}

#[tokio::test]
async fn test_view_serves_plain_text_verbatim() {
    let temp = TempDir::new().unwrap();
    let state = test_state(&temp);
    let app = http_server::router(state.clone());

    state
        .documents()
        .write("changes.txt", b"first line\nsecond line")
        .unwrap();

    let response = app.oneshot(get("/changes.txt", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap()
        .starts_with("text/plain"));

    let body = body_string(response).await;
    assert_eq!(body, "first line\nsecond line");
}

#[tokio::test]
async fn test_protected_routes_reject_anonymous_visitors() {
    let temp = TempDir::new().unwrap();
    let state = test_state(&temp);
    let app = http_server::router(state.clone());

    state.documents().write("a.txt", b"original").unwrap();

    for request in [
        get("/new", None),
        post_form("/create", "name=b.txt", None),
        get("/a.txt/edit", None),
        post_form("/a.txt", "content=overwritten", None),
        post_form("/a.txt/delete", "", None),
        post_form("/a.txt/duplicate", "", None),
    ] {
        let response = app.clone().oneshot(request).await.unwrap();
        assert!(response.status().is_redirection());
        assert_eq!(location(&response), "/");
    }

    // None of the mutations happened.
    assert_eq!(state.documents().read("a.txt").unwrap(), b"original");
    assert!(!state.documents().exists("b.txt"));
    assert!(!state.documents().exists("copy a.txt"));
}

#[tokio::test]
async fn test_protected_routes_reject_non_admin_users() {
    let temp = TempDir::new().unwrap();
    let state = test_state(&temp);
    let app = http_server::router(state.clone());

    state.documents().write("a.txt", b"original").unwrap();
    let cookies = sign_in(&app, &state, "bob", "pw123").await;

    let response = app
        .clone()
        .oneshot(post_form("/a.txt/delete", "", Some(&cookies)))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/");
    assert!(state.documents().exists("a.txt"));
}

#[tokio::test]
async fn test_login_round_trip() {
    let temp = TempDir::new().unwrap();
    let state = test_state(&temp);
    let app = http_server::router(state.clone());

    state.credentials().register("bob", "pw123").unwrap();

    // Wrong password: 422 with an inline error and no session cookie.
    let response = app
        .clone()
        .oneshot(post_form(
            "/users/login",
            "username=bob&password=wrong",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let cookies = cookies_from(&response);
    assert!(!cookies.contains("vellum_user="));
    let body = body_string(response).await;
    assert!(body.contains("invalid credentials"));

    // Right password: redirect home, signed in.
    let cookies = sign_in(&app, &state, "bob", "pw123").await;
    assert!(cookies.contains("vellum_user="));

    let response = app
        .clone()
        .oneshot(get("/", Some(&cookies)))
        .await
        .unwrap();
    let body = body_string(response).await;
    assert!(body.contains("Signed in as bob"));
}

#[tokio::test]
async fn test_signout_clears_the_session() {
    let temp = TempDir::new().unwrap();
    let state = test_state(&temp);
    let app = http_server::router(state.clone());

    let cookies = sign_in(&app, &state, "bob", "pw123").await;

    let response = app
        .clone()
        .oneshot(post_form("/users/signout", "", Some(&cookies)))
        .await
        .unwrap();
    assert!(response.status().is_redirection());

    let cookies = cookies_from(&response);
    let response = app
        .clone()
        .oneshot(get("/", Some(&cookies)))
        .await
        .unwrap();
    let body = body_string(response).await;
    assert!(body.contains("You have been signed out"));
    assert!(!body.contains("Signed in as bob"));
}

#[tokio::test]
async fn test_signup_then_login() {
    let temp = TempDir::new().unwrap();
    let state = test_state(&temp);
    let app = http_server::router(state.clone());

    let response = app
        .clone()
        .oneshot(post_form(
            "/users/signup",
            "username=carol&password=hunter2",
            None,
        ))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/users/login");

    let response = app
        .clone()
        .oneshot(post_form(
            "/users/login",
            "username=carol&password=hunter2",
            None,
        ))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
}

#[tokio::test]
async fn test_signup_rejects_taken_username() {
    let temp = TempDir::new().unwrap();
    let state = test_state(&temp);
    let app = http_server::router(state.clone());

    state.credentials().register("carol", "hunter2").unwrap();

    let response = app
        .clone()
        .oneshot(post_form(
            "/users/signup",
            "username=carol&password=other",
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_string(response).await;
    assert!(body.contains("already taken"));

    // The original credential still works.
    assert!(state.credentials().verify("carol", "hunter2").unwrap());
}

#[tokio::test]
async fn test_admin_document_lifecycle() {
    let temp = TempDir::new().unwrap();
    let state = test_state(&temp);
    let app = http_server::router(state.clone());

    let cookies = sign_in(&app, &state, "admin", ADMIN_PASSWORD).await;

    // Create: placeholder content lands on disk.
    let response = app
        .clone()
        .oneshot(post_form("/create", "name=notes.md", Some(&cookies)))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(state.documents().read("notes.md").unwrap(), b"default");

    // Edit form is pre-filled with the current content.
    let response = app
        .clone()
        .oneshot(get("/notes.md/edit", Some(&cookies)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("default"));

    // Save new content, then view it rendered.
    let response = app
        .clone()
        .oneshot(post_form("/notes.md", "content=%23%20Hello", Some(&cookies)))
        .await
        .unwrap();
    assert!(response.status().is_redirection());

    let response = app
        .clone()
        .oneshot(get("/notes.md", Some(&cookies)))
        .await
        .unwrap();
    let body = body_string(response).await;
    assert!(body.contains("<h1>Hello</h1>"));

    // Duplicate, then delete the original.
    let response = app
        .clone()
        .oneshot(post_form("/notes.md/duplicate", "", Some(&cookies)))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(
        state.documents().read("copy notes.md").unwrap(),
        state.documents().read("notes.md").unwrap()
    );

    let response = app
        .clone()
        .oneshot(post_form("/notes.md/delete", "", Some(&cookies)))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert!(!state.documents().exists("notes.md"));
    assert!(state.documents().exists("copy notes.md"));
}

#[tokio::test]
async fn test_create_rejects_bad_names_with_422() {
    let temp = TempDir::new().unwrap();
    let state = test_state(&temp);
    let app = http_server::router(state.clone());

    let cookies = sign_in(&app, &state, "admin", ADMIN_PASSWORD).await;

    // Disallowed extension.
    let response = app
        .clone()
        .oneshot(post_form("/create", "name=report.pdf", Some(&cookies)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!state.documents().exists("report.pdf"));

    // Empty name.
    let response = app
        .clone()
        .oneshot(post_form("/create", "name=", Some(&cookies)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_string(response).await;
    assert!(body.contains("A name is required."));

    assert!(state.documents().list().unwrap().is_empty());
}

#[tokio::test]
async fn test_health_endpoints_are_public() {
    let temp = TempDir::new().unwrap();
    let state = test_state(&temp);
    let app = http_server::router(state);

    let response = app
        .clone()
        .oneshot(get("/_status/healthz", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get("/_status/versionz", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("version"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let temp = TempDir::new().unwrap();
    let state = test_state(&temp);
    let app = http_server::router(state);

    // A nested path matches no route and falls through to the 404 handler.
    let response = app
        .oneshot(get("/no/such/page", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
