//! Shared helpers for API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum_test::{TestRequest, TestServer};
use gazette::config::ServerConfig;
use gazette::web::handlers::AppState;
use gazette::web::middleware::JwtState;
use gazette::web::router::create_router;
use gazette::{Database, Role, UserRepository};
use serde_json::{json, Value};

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only";
pub const TEST_PASSWORD: &str = "password123";

/// An API under test plus a handle on its database.
pub struct TestApp {
    pub server: TestServer,
    pub db: Database,
}

impl TestApp {
    /// Build the router over a fresh in-memory database.
    pub async fn new() -> Self {
        let db = Database::open_in_memory()
            .await
            .expect("Failed to create test database");
        let config = ServerConfig {
            jwt_secret: TEST_SECRET.to_string(),
            jwt_expiry_secs: 900,
            ..Default::default()
        };

        let app_state = Arc::new(AppState::new(db.clone(), &config));
        let jwt_state = Arc::new(JwtState::new(TEST_SECRET));
        let router = create_router(app_state, jwt_state, &[]);
        let server = TestServer::new(router).expect("Failed to create test server");

        Self { server, db }
    }

    /// Register a member and return the response body.
    pub async fn register(&self, username: &str, email: &str) -> Value {
        let response = self
            .server
            .post("/api/auth/register")
            .json(&json!({
                "username": username,
                "email": email,
                "password": TEST_PASSWORD
            }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<Value>()
    }

    /// Log in and return the bearer token.
    pub async fn login(&self, email: &str) -> String {
        let response = self
            .server
            .post("/api/auth/login")
            .json(&json!({ "email": email, "password": TEST_PASSWORD }))
            .await;
        response.assert_status_ok();
        response.json::<Value>()["data"]["token"]
            .as_str()
            .expect("login response carries a token")
            .to_string()
    }

    /// Register a member, log in, and return `(user_id, token)`.
    pub async fn member(&self, username: &str) -> (i64, String) {
        let email = format!("{username}@example.com");
        let body = self.register(username, &email).await;
        let id = body["data"]["id"].as_i64().expect("user id");
        (id, self.login(&email).await)
    }

    /// Register an administrator, log in, and return `(user_id, token)`.
    pub async fn admin(&self, username: &str) -> (i64, String) {
        let email = format!("{username}@example.com");
        let body = self.register(username, &email).await;
        let id = body["data"]["id"].as_i64().expect("user id");
        UserRepository::new(self.db.pool())
            .set_role(id, Role::Admin)
            .await
            .expect("promote to admin");
        (id, self.login(&email).await)
    }

    /// Publish a post as `token` and return its ID.
    pub async fn create_post(&self, token: &str, title: &str) -> i64 {
        let response = authed(self.server.post("/api/posts"), token)
            .json(&json!({ "title": title, "content": format!("Body of {title}") }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<Value>()["data"]["id"]
            .as_i64()
            .expect("post id")
    }
}

/// Attach a bearer token to a request.
pub fn authed(request: TestRequest, token: &str) -> TestRequest {
    request.add_header(AUTHORIZATION, format!("Bearer {token}"))
}
