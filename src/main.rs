mod api;
mod app;
mod auth;
mod config;
mod db;
mod domain;
mod error;
mod estimation;
mod logging;
mod middleware;
mod routes;
mod services;

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

use auth::{JwksCache, TokenVerifier};
use services::notifications::Branding;
use services::{LogOnlyNotifier, Notifier, PgStorage, ResendNotifier, Storage};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let settings = config::Settings::from_env()?;

    logging::init_logging(&settings);

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        variant = ?settings.simulator_variant,
        "Starting BuildSim backend"
    );

    let pool = db::create_pool(&settings)?;
    let storage: Arc<dyn Storage> = Arc::new(PgStorage::new(pool));

    // One client for JWKS and the email API
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(15))
        .build()
        .context("Failed to build HTTP client")?;

    let notifier: Arc<dyn Notifier> = match &settings.resend_api_key {
        Some(api_key) => Arc::new(ResendNotifier::new(
            http_client.clone(),
            api_key,
            Branding {
                company_name: settings.company_name.clone(),
                from: settings.notify_from.clone(),
                admin_email: settings.notify_admin_email.clone(),
                website_url: settings.website_url.clone(),
            },
        )),
        None => {
            tracing::warn!("RESEND_API_KEY not set - notifications will only be logged");
            Arc::new(LogOnlyNotifier)
        }
    };

    let verifier = build_verifier(&settings, http_client)?;
    if let Some(jwks) = verifier.jwks() {
        if let Err(e) = jwks.warm().await {
            tracing::warn!(error = %e, "Failed to warm JWKS cache - will fetch on first request");
        }
    }

    let state = app::AppState::new(settings.clone(), storage, notifier, verifier);
    let app = app::create_app(state);

    let listener = tokio::net::TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("Listening on {}", settings.server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn build_verifier(settings: &config::Settings, http_client: reqwest::Client) -> Result<TokenVerifier> {
    let issuer = settings.supabase_jwt_issuer.clone();
    let audience = settings.supabase_jwt_audience.clone();

    match (&settings.supabase_jwt_secret, &settings.supabase_jwt_jwks_url) {
        (Some(secret), _) => Ok(TokenVerifier::with_secret(secret, issuer, audience)),
        (None, Some(url)) => Ok(TokenVerifier::with_jwks(
            JwksCache::new(http_client, url.clone(), settings.jwks_cache_ttl_seconds),
            issuer,
            audience,
        )),
        (None, None) => anyhow::bail!("SUPABASE_JWT_JWKS_URL or SUPABASE_JWT_SECRET must be set"),
    }
}
