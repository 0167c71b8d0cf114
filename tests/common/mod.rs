//! Common test utilities and helpers for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use liftlog::auth::{AuthConfig, AuthManager};
use liftlog::database::{Database, SqliteDatabase};
use liftlog::server::AppState;

/// Create an in-memory database for testing
pub async fn create_test_database() -> Arc<SqliteDatabase> {
    Arc::new(
        SqliteDatabase::in_memory()
            .await
            .expect("Failed to create test database"),
    )
}

/// Create a test authentication manager with the default token lifetime
pub fn create_test_auth_manager<D: Database>(db: Arc<D>) -> Arc<AuthManager<D>> {
    Arc::new(AuthManager::new(db, AuthConfig::default()))
}

/// Create a test application state backed by an in-memory database
pub async fn create_test_state() -> AppState<SqliteDatabase> {
    let database = create_test_database().await;
    let auth_manager = create_test_auth_manager(Arc::clone(&database));

    AppState {
        auth_manager,
        database,
    }
}

/// Run a test server in the background and return the address
/// The server will be shut down when the returned shutdown sender is dropped or sent
pub async fn run_test_server(
    state: AppState<SqliteDatabase>,
) -> (std::net::SocketAddr, tokio::sync::oneshot::Sender<()>) {
    use tokio::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to get local address");

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let app = liftlog::server::build_router(state)
        .layer(tower_http::trace::TraceLayer::new_for_http());

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
            .expect("Server error");
    });

    // Give the server a moment to start (100ms is sufficient for slow CI systems)
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    (addr, shutdown_tx)
}

/// Register a user through the HTTP API
pub async fn register_user(
    client: &reqwest::Client,
    addr: std::net::SocketAddr,
    username: &str,
    password: &str,
) -> reqwest::Response {
    client
        .post(format!("http://{}/users", addr))
        .json(&serde_json::json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": password,
        }))
        .send()
        .await
        .expect("Failed to send registration request")
}

/// Log a user in through the HTTP API and return the bearer token
pub async fn login_user(
    client: &reqwest::Client,
    addr: std::net::SocketAddr,
    username: &str,
    password: &str,
) -> String {
    let response = client
        .post(format!("http://{}/token/authentication", addr))
        .json(&serde_json::json!({
            "username": username,
            "password": password,
        }))
        .send()
        .await
        .expect("Failed to send login request");
    assert_eq!(response.status(), 201);

    let body: serde_json::Value = response.json().await.expect("Invalid login response body");
    body["auth_token"]
        .as_str()
        .expect("Login response missing auth_token")
        .to_string()
}

/// Register and log in a fresh user, returning their bearer token
pub async fn register_and_login(
    client: &reqwest::Client,
    addr: std::net::SocketAddr,
    username: &str,
    password: &str,
) -> String {
    let response = register_user(client, addr, username, password).await;
    assert_eq!(response.status(), 201);
    login_user(client, addr, username, password).await
}
