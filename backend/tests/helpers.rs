// backend/tests/helpers.rs
#![allow(dead_code)]

use jlearn_backend::{
    config::{AppConfig, AuthConfig, DatabaseConfig, JwtConfig, WebConfig},
    store::DocumentStore,
    web_server::AppState,
};
use jlearn_common::{Credentials, LoginResponse, RegisterRequest, RegisterResponse};
use once_cell::sync::Lazy;
use reqwest::StatusCode;
use std::net::{Ipv4Addr, SocketAddr};
use tokio::net::TcpListener;

pub const TEST_JWT_SECRET: &str = "test-secret";

pub static TRACING: Lazy<()> = Lazy::new(|| {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_test_writer()
        .init();
});

pub fn test_config(port: u16, protect_mutations: bool) -> AppConfig {
    AppConfig {
        web: WebConfig {
            addr: "127.0.0.1".to_string(),
            port,
            cors_origin: "http://localhost:5173".to_string(),
        },
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            expires_days: 7,
        },
        auth: AuthConfig {
            // Lowest cost bcrypt accepts, keeps the suite fast.
            bcrypt_cost: 4,
            protect_mutations,
        },
    }
}

/// Fresh in-memory store with the schema applied. One connection, so every
/// query sees the same database.
pub async fn test_state(port: u16, protect_mutations: bool) -> AppState {
    let config = test_config(port, protect_mutations);
    let store = DocumentStore::connect(&config.database)
        .await
        .expect("Failed to create in-memory document store.");

    AppState {
        store,
        app_config: config,
    }
}

/// Spawn a test server with the public route surface.
pub async fn spawn_app() -> (SocketAddr, reqwest::Client, DocumentStore) {
    spawn_app_with(false).await
}

/// Spawn a test server and return the address, a reqwest client and the store.
pub async fn spawn_app_with(protect_mutations: bool) -> (SocketAddr, reqwest::Client, DocumentStore) {
    Lazy::force(&TRACING);

    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();

    let app_state = test_state(addr.port(), protect_mutations).await;
    let store = app_state.store.clone();
    let app = jlearn_backend::web_server::create_router(app_state);

    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service())
            .await
            .unwrap();
    });

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    (addr, client, store)
}

/// Registers a user and returns the id the store assigned to it.
pub async fn register_user(
    addr: &SocketAddr,
    client: &reqwest::Client,
    name: &str,
    email: &str,
    password: &str,
) -> String {
    let response = client
        .post(format!("http://{addr}/register"))
        .json(&RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            photo: Some("https://img.example.com/a.png".to_string()),
        })
        .send()
        .await
        .expect("Failed to register user");
    assert_eq!(response.status(), StatusCode::CREATED, "Registration failed");

    let body: RegisterResponse = response.json().await.unwrap();
    body.result.inserted_id
}

/// Signs in and returns the bearer token.
pub async fn sign_in(
    addr: &SocketAddr,
    client: &reqwest::Client,
    email: &str,
    password: &str,
) -> String {
    let response = client
        .post(format!("http://{addr}/singIn"))
        .json(&Credentials {
            email: email.to_string(),
            password: password.to_string(),
        })
        .send()
        .await
        .expect("Failed to sign in user");
    assert_eq!(response.status(), StatusCode::OK, "Sign-in did not return 200 OK");

    let body: LoginResponse = response.json().await.unwrap();
    body.token
}

/// Helper to register and sign in a test user, returning their token.
pub async fn get_auth_token(addr: &SocketAddr, client: &reqwest::Client) -> String {
    register_user(addr, client, "Test User", "test@example.com", "password123").await;
    sign_in(addr, client, "test@example.com", "password123").await
}
