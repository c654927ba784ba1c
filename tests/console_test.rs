mod common;

use axum::Json;
use axum::extract::Form;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use common::{ScriptedBackend, available_station};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::time::Duration;
use voltboard::api::BackendApi;
use voltboard::auth::AuthSessionManager;
use voltboard::config::Config;
use voltboard::console::OperatorConsole;
use voltboard::error::VoltboardError;
use voltboard::persistence::TokenStore;

async fn token_endpoint(Form(params): Form<HashMap<String, String>>) -> impl IntoResponse {
    if params.get("password").map(String::as_str) == Some("secret") {
        Json(serde_json::json!({"access_token": "tok-abc", "token_type": "bearer"}))
            .into_response()
    } else {
        StatusCode::UNAUTHORIZED.into_response()
    }
}

async fn spawn_token_backend() -> String {
    let app = axum::Router::new().route("/token", post(token_endpoint));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn fast_config(base: &str, dir: &tempfile::TempDir) -> Config {
    let mut config = Config::default();
    config.backend.base_url = base.to_string();
    config.auth.token_file = dir.path().join("token.json").to_string_lossy().to_string();
    config.poll_interval_ms = 50;
    config
}

fn build_console(base: &str, dir: &tempfile::TempDir) -> (OperatorConsole, Arc<ScriptedBackend>) {
    let config = fast_config(base, dir);
    let auth = Arc::new(
        AuthSessionManager::new(base, TokenStore::new(&config.auth.token_file)).unwrap(),
    );
    let api = Arc::new(ScriptedBackend::new());
    api.set_stations(HashMap::from([("A".to_string(), available_station())]));
    let console =
        OperatorConsole::with_backend(config, auth, api.clone() as Arc<dyn BackendApi>);
    (console, api)
}

#[tokio::test]
async fn login_starts_polling_and_logout_stops_it() {
    let base = spawn_token_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let (console, api) = build_console(&base, &dir);

    console.login("op", "secret").await.unwrap();

    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(api.call_count() >= 2);
    assert_eq!(console.registry().station_count(), 1);

    console.logout();
    assert!(!console.is_authenticated());
    assert_eq!(console.registry().station_count(), 0);

    tokio::time::sleep(Duration::from_millis(20)).await;
    let settled = api.call_count();
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(api.call_count(), settled);
}

#[tokio::test]
async fn rejected_login_starts_nothing() {
    let base = spawn_token_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let (console, api) = build_console(&base, &dir);

    let err = console.login("op", "wrong").await.unwrap_err();
    assert!(matches!(err, VoltboardError::InvalidCredentials { .. }));
    assert!(!console.is_authenticated());

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn resume_picks_up_the_persisted_session() {
    let base = spawn_token_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let token_file = dir.path().join("token.json").to_string_lossy().to_string();
    TokenStore::new(&token_file).save("tok-earlier").unwrap();

    let (console, api) = build_console(&base, &dir);
    assert!(console.resume());
    assert!(console.is_authenticated());

    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(api.call_count() >= 2);
}

#[tokio::test]
async fn resume_without_a_token_does_nothing() {
    let base = spawn_token_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let (console, api) = build_console(&base, &dir);

    assert!(!console.resume());
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(api.call_count(), 0);
}

#[tokio::test]
async fn expired_session_stops_polling_and_discards_the_mirror() {
    let base = spawn_token_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let (console, api) = build_console(&base, &dir);

    console.login("op", "secret").await.unwrap();
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(console.registry().station_count(), 1);

    // A poll tick runs into a 401; the session ends without an explicit
    // logout call
    api.reject_next_sessions_fetch(Arc::clone(console.auth()));
    tokio::time::sleep(Duration::from_millis(150)).await;

    assert!(!console.is_authenticated());
    assert_eq!(console.registry().station_count(), 0);

    let settled = api.call_count();
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(api.call_count(), settled);
}

#[tokio::test]
async fn logging_back_in_polls_again() {
    let base = spawn_token_backend().await;
    let dir = tempfile::tempdir().unwrap();
    let (console, api) = build_console(&base, &dir);

    console.login("op", "secret").await.unwrap();
    tokio::time::sleep(Duration::from_millis(30)).await;
    console.logout();
    tokio::time::sleep(Duration::from_millis(20)).await;

    let before = api.call_count();
    console.login("op", "secret").await.unwrap();
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert!(api.call_count() > before);
    assert_eq!(console.registry().station_count(), 1);
}
