use axum::{http::HeaderValue, middleware::from_fn, Router};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::auth::TokenVerifier;
use crate::config::Settings;
use crate::middleware::{request_id_layer, stamp_error_request_id};
use crate::routes;
use crate::services::{Notifier, Storage, SubmissionRecorder};

/// Form payloads are small; anything larger is refused before parsing
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub storage: Arc<dyn Storage>,
    pub notifier: Arc<dyn Notifier>,
    pub verifier: TokenVerifier,
    pub recorder: SubmissionRecorder,
}

impl AppState {
    pub fn new(
        settings: Settings,
        storage: Arc<dyn Storage>,
        notifier: Arc<dyn Notifier>,
        verifier: TokenVerifier,
    ) -> Arc<Self> {
        let recorder = SubmissionRecorder::new(storage.clone(), settings.simulator_variant);

        Arc::new(Self {
            settings,
            storage,
            notifier,
            verifier,
            recorder,
        })
    }
}

/// Build the complete application with all middleware
pub fn create_app(state: Arc<AppState>) -> Router {
    let cors = build_cors_layer(&state.settings);

    // DEBUG spans keep INFO output to one line per event
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::DEBUG));

    let (set_request_id, propagate_request_id) = request_id_layer();

    Router::new()
        .merge(routes::api_router())
        // Middleware stack (applied bottom-up)
        .layer(from_fn(stamp_error_request_id))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(propagate_request_id)
        .layer(trace_layer)
        .layer(set_request_id)
        .layer(cors)
        .with_state(state)
}

fn build_cors_layer(settings: &Settings) -> CorsLayer {
    let origins: Vec<HeaderValue> = settings
        .cors_allow_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let max_age = if settings.env.is_dev() {
        std::time::Duration::from_secs(86400)
    } else {
        std::time::Duration::from_secs(3600)
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::list([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
            axum::http::HeaderName::from_static("x-request-id"),
        ]))
        .allow_credentials(true)
        .max_age(max_age)
}
