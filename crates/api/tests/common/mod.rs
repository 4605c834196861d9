//! Common test utilities for integration tests.
//!
//! The app runs on the in-memory backend with an HS256 secret, seeded with a
//! parent organization and one child organization.

// Not every test binary uses every helper.
#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use domain::models::Role;
use domain::store::Stores;
use persistence::MemoryStore;
use serde_json::{json, Value};
use taskboard_api::{
    app::create_app,
    config::{
        BootstrapConfig, Config, DatabaseConfig, JwtAuthConfig, LoggingConfig, SecurityConfig,
        SeedOrganization, SeedUser, ServerConfig, StorageBackend, StorageConfig,
    },
    services::seed,
};
use tower::ServiceExt;

pub const PASSWORD: &str = "password123";
pub const FATHER_ORG: &str = "org-father";
pub const CHILD_ORG: &str = "org-child";

pub const OWNER_FATHER: &str = "owner@father.test";
pub const ADMIN_FATHER: &str = "admin@father.test";
pub const VIEWER_FATHER: &str = "viewer@father.test";
pub const OWNER_CHILD: &str = "owner@child.test";
pub const ADMIN_CHILD: &str = "admin@child.test";

fn seed_user(email: &str, role: Role, organization: &str) -> SeedUser {
    SeedUser {
        email: email.to_string(),
        role,
        organization: organization.to_string(),
        password: None,
    }
}

/// Test configuration: memory backend, HS256 secret, seeded hierarchy.
pub fn test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            request_timeout_secs: 30,
        },
        storage: StorageConfig {
            backend: StorageBackend::Memory,
        },
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout_secs: 10,
            idle_timeout_secs: 600,
        },
        logging: LoggingConfig {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            cors_origins: vec![],
            hsts_enabled: true,
        },
        jwt: JwtAuthConfig {
            secret: "integration-test-secret".to_string(),
            private_key: String::new(),
            public_key: String::new(),
            access_token_expiry_secs: 3600,
            leeway_secs: 0,
        },
        bootstrap: BootstrapConfig {
            enabled: true,
            default_password: PASSWORD.to_string(),
            organizations: vec![
                SeedOrganization {
                    name: FATHER_ORG.to_string(),
                    parent: None,
                },
                SeedOrganization {
                    name: CHILD_ORG.to_string(),
                    parent: Some(FATHER_ORG.to_string()),
                },
            ],
            users: vec![
                seed_user(OWNER_FATHER, Role::Owner, FATHER_ORG),
                seed_user(ADMIN_FATHER, Role::Admin, FATHER_ORG),
                seed_user(VIEWER_FATHER, Role::Viewer, FATHER_ORG),
                seed_user(OWNER_CHILD, Role::Owner, CHILD_ORG),
                seed_user(ADMIN_CHILD, Role::Admin, CHILD_ORG),
            ],
        },
    }
}

/// Seeds a fresh in-memory store and builds the router over it.
pub async fn create_test_app_with_stores(config: Config) -> (Router, Stores) {
    let stores = MemoryStore::new().into_stores();
    seed(&stores, &config.bootstrap)
        .await
        .expect("Failed to seed test data");

    let app = create_app(config, stores.clone()).expect("Failed to build app");
    (app, stores)
}

pub async fn create_test_app() -> Router {
    create_test_app_with_stores(test_config()).await.0
}

pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

pub fn json_request_with_auth(method: Method, uri: &str, body: Value, token: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn get_request_with_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

pub fn delete_request_with_auth(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .unwrap()
}

pub async fn parse_response_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(Value::Null)
}

/// Logs in and returns the full response body.
pub async fn login(app: &Router, email: &str) -> Value {
    let request = json_request(
        Method::POST,
        "/api/auth/login",
        json!({ "email": email, "password": PASSWORD }),
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK, "login failed for {}", email);
    parse_response_body(response).await
}

/// Logs in and returns the bearer token.
pub async fn token_for(app: &Router, email: &str) -> String {
    login(app, email).await["accessToken"]
        .as_str()
        .expect("accessToken missing")
        .to_string()
}

/// Creates a task through the API and returns the response body.
pub async fn create_task(app: &Router, token: &str, title: &str) -> Value {
    let request = json_request_with_auth(
        Method::POST,
        "/api/tasks",
        json!({ "title": title, "category": "CORE" }),
        token,
    );
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    parse_response_body(response).await
}
