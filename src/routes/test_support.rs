//! Router harness: in-memory storage, captured notifications, HS256 tokens.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use crate::app::{create_app, AppState};
use crate::auth::claims::UserMetadata;
use crate::auth::{Claims, TokenVerifier};
use crate::config::Settings;
use crate::estimation::SimulatorVariant;
use crate::services::notifications::testing::RecordingNotifier;
use crate::services::notifications::{NotificationKind, NotificationPayload};
use crate::services::storage::memory::MemoryStorage;

const SECRET: &str = "router-test-secret";

pub struct TestApp {
    pub router: Router,
    pub storage: Arc<MemoryStorage>,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_variant(SimulatorVariant::WithFinancing)
    }

    pub fn with_variant(variant: SimulatorVariant) -> Self {
        let storage = Arc::new(MemoryStorage::new());
        let notifier = Arc::new(RecordingNotifier::default());

        let mut settings = Settings::for_tests();
        settings.simulator_variant = variant;

        let state = AppState::new(
            settings,
            storage.clone(),
            notifier.clone(),
            TokenVerifier::with_secret(SECRET, None, "authenticated".to_string()),
        );

        Self {
            router: create_app(state),
            storage,
            notifier,
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, token, None).await
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.request(request).await
    }

    /// Send a hand-built request
    pub async fn request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    /// Let spawned deliveries run, then return what was captured
    pub async fn notifications(&self, expected: usize) -> Vec<(NotificationKind, NotificationPayload)> {
        for _ in 0..100 {
            if self.notifier.sent().len() >= expected {
                break;
            }
            tokio::task::yield_now().await;
        }
        self.notifier.sent()
    }

    /// Give any spawned delivery a fixed number of turns, then return what was captured
    pub async fn settled_notifications(&self) -> Vec<(NotificationKind, NotificationPayload)> {
        for _ in 0..50 {
            tokio::task::yield_now().await;
        }
        self.notifier.sent()
    }
}

/// Signed access token for `user_id`
pub fn token_for(user_id: Uuid) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        aud: "authenticated".to_string(),
        iss: None,
        exp: chrono::Utc::now().timestamp() + 3600,
        iat: None,
        email: Some("client@example.ci".to_string()),
        role: Some("authenticated".to_string()),
        user_metadata: Some(UserMetadata {
            first_name: Some("Awa".to_string()),
            last_name: Some("Koné".to_string()),
        }),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}
