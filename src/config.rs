use anyhow::{Context, Result};
use std::env;

use crate::estimation::SimulatorVariant;
use crate::logging::LogFormat;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,
    pub server_addr: String,
    pub log_format: LogFormat,

    // Database
    pub database_url: String,
    pub database_max_connections: u32,

    // CORS
    pub cors_allow_origins: Vec<String>,

    // Supabase Auth
    pub supabase_jwt_jwks_url: Option<String>,
    pub supabase_jwt_issuer: Option<String>,
    pub supabase_jwt_audience: String,
    pub supabase_jwt_secret: Option<String>,
    pub jwks_cache_ttl_seconds: u64,

    // Notifications
    pub resend_api_key: Option<String>,
    pub notify_from: String,
    pub notify_admin_email: String,
    pub company_name: String,
    pub website_url: String,

    // Simulator
    pub simulator_variant: SimulatorVariant,
    pub default_interest_rate: f64,
    pub default_loan_duration_months: u32,
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let env = Environment::from_str(&env::var("ENV").unwrap_or_else(|_| "dev".to_string()));
        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let log_format = LogFormat::resolve(optional("LOG_FORMAT").as_deref(), &env);

        // Database
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let database_max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(10);

        // CORS
        let cors_allow_origins = env::var("CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        // Supabase Auth: shared secret wins over JWKS when both are configured
        let supabase_jwt_jwks_url = optional("SUPABASE_JWT_JWKS_URL");
        let supabase_jwt_secret = optional("SUPABASE_JWT_SECRET");
        let supabase_jwt_issuer = optional("SUPABASE_JWT_ISSUER");
        let supabase_jwt_audience =
            env::var("SUPABASE_JWT_AUDIENCE").unwrap_or_else(|_| "authenticated".to_string());
        let jwks_cache_ttl_seconds = env::var("JWKS_CACHE_TTL_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(1800); // 30 minutes default

        // Notifications (disabled without an API key)
        let resend_api_key = optional("RESEND_API_KEY");
        let notify_from = env::var("NOTIFY_FROM")
            .unwrap_or_else(|_| "Notifications <onboarding@resend.dev>".to_string());
        let notify_admin_email = env::var("NOTIFY_ADMIN_EMAIL")
            .unwrap_or_else(|_| "contact@example.com".to_string());
        let company_name = env::var("COMPANY_NAME").unwrap_or_else(|_| "BuildSim".to_string());
        let website_url =
            env::var("WEBSITE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        // Simulator
        let simulator_variant = env::var("SIMULATOR_VARIANT")
            .ok()
            .map(|s| SimulatorVariant::parse(&s))
            .unwrap_or_default();
        let default_interest_rate = env::var("DEFAULT_INTEREST_RATE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(7.5);
        let default_loan_duration_months = env::var("DEFAULT_LOAN_DURATION_MONTHS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(180); // 15 years

        Ok(Settings {
            env,
            server_addr,
            log_format,
            database_url,
            database_max_connections,
            cors_allow_origins,
            supabase_jwt_jwks_url,
            supabase_jwt_issuer,
            supabase_jwt_audience,
            supabase_jwt_secret,
            jwks_cache_ttl_seconds,
            resend_api_key,
            notify_from,
            notify_admin_email,
            company_name,
            website_url,
            simulator_variant,
            default_interest_rate,
            default_loan_duration_months,
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Settings {
            env: Environment::Dev,
            server_addr: "127.0.0.1:0".to_string(),
            log_format: LogFormat::Pretty,
            database_url: "postgres://localhost/test".to_string(),
            database_max_connections: 1,
            cors_allow_origins: vec!["http://localhost:3000".to_string()],
            supabase_jwt_jwks_url: None,
            supabase_jwt_issuer: None,
            supabase_jwt_audience: "authenticated".to_string(),
            supabase_jwt_secret: Some("test-secret".to_string()),
            jwks_cache_ttl_seconds: 1800,
            resend_api_key: None,
            notify_from: "Test <test@example.com>".to_string(),
            notify_admin_email: "admin@example.com".to_string(),
            company_name: "BuildSim".to_string(),
            website_url: "http://localhost:3000".to_string(),
            simulator_variant: SimulatorVariant::WithFinancing,
            default_interest_rate: 7.5,
            default_loan_duration_months: 180,
        }
    }
}
