use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::app::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub services: ServiceHealth,
}

#[derive(Serialize)]
pub struct ServiceHealth {
    pub database: String,
}

/// Health check endpoint - public
///
/// The estimator itself has no dependencies, so only storage is probed.
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<HealthResponse>) {
    let database_ok = state.storage.health_check().await;

    let (status_code, status) = if database_ok {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            services: ServiceHealth {
                database: if database_ok { "ok" } else { "error" }.to_string(),
            },
        }),
    )
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::TestApp;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn reports_storage_state() {
        let app = TestApp::new();

        let (status, body) = app.get("/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["services"]["database"], "ok");

        app.storage.set_outage(true);
        let (status, body) = app.get("/health", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "unhealthy");
    }
}
