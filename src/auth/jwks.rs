//! JWKS key cache for Supabase asymmetric signing keys (RS256 / ES256)

use anyhow::{Context, Result};
use jsonwebtoken::{Algorithm, DecodingKey};
use parking_lot::RwLock;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Minimum spacing between two JWKS fetches, so unknown `kid`s can't hammer the endpoint
const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

#[derive(Debug, Deserialize)]
struct Jwk {
    kid: String,
    kty: String,
    #[serde(default)]
    n: Option<String>,
    #[serde(default)]
    e: Option<String>,
    #[serde(default)]
    x: Option<String>,
    #[serde(default)]
    y: Option<String>,
}

impl Jwk {
    fn decoding_key(&self) -> Result<(DecodingKey, Algorithm)> {
        match self.kty.as_str() {
            "RSA" => {
                let n = self.n.as_deref().context("RSA key missing modulus")?;
                let e = self.e.as_deref().context("RSA key missing exponent")?;
                Ok((DecodingKey::from_rsa_components(n, e)?, Algorithm::RS256))
            }
            "EC" => {
                let x = self.x.as_deref().context("EC key missing x")?;
                let y = self.y.as_deref().context("EC key missing y")?;
                Ok((DecodingKey::from_ec_components(x, y)?, Algorithm::ES256))
            }
            other => anyhow::bail!("unsupported key type {other}"),
        }
    }
}

#[derive(Clone)]
pub(crate) struct CachedKey {
    pub key: DecodingKey,
    pub algorithm: Algorithm,
}

struct KeyStore {
    keys: HashMap<String, CachedKey>,
    fetched_at: Option<Instant>,
}

/// Shared, lazily refreshed view of the project's JWKS
#[derive(Clone)]
pub struct JwksCache {
    http: reqwest::Client,
    url: String,
    ttl: Duration,
    store: Arc<RwLock<KeyStore>>,
}

impl JwksCache {
    pub fn new(http: reqwest::Client, url: String, ttl_seconds: u64) -> Self {
        Self {
            http,
            url,
            ttl: Duration::from_secs(ttl_seconds),
            store: Arc::new(RwLock::new(KeyStore {
                keys: HashMap::new(),
                fetched_at: None,
            })),
        }
    }

    /// Key for `kid`, refreshing the set when stale or when the key is unknown
    pub(crate) async fn key(&self, kid: &str) -> Result<CachedKey> {
        {
            let store = self.store.read();
            let fresh = store
                .fetched_at
                .is_some_and(|at| at.elapsed() < self.ttl);
            if let (true, Some(key)) = (fresh, store.keys.get(kid)) {
                return Ok(key.clone());
            }
        }

        self.refresh().await?;

        self.store
            .read()
            .keys
            .get(kid)
            .cloned()
            .with_context(|| format!("Signing key {kid} not found in JWKS"))
    }

    async fn refresh(&self) -> Result<()> {
        let recently_fetched = self
            .store
            .read()
            .fetched_at
            .is_some_and(|at| at.elapsed() < MIN_REFRESH_INTERVAL);
        if recently_fetched {
            return Ok(());
        }

        tracing::debug!(url = %self.url, "Fetching JWKS");

        let response = self
            .http
            .get(&self.url)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .context("Failed to fetch JWKS")?;

        if !response.status().is_success() {
            anyhow::bail!("JWKS fetch failed with status: {}", response.status());
        }

        let set: JwkSet = response.json().await.context("Failed to parse JWKS")?;

        let mut keys = HashMap::new();
        for jwk in set.keys {
            match jwk.decoding_key() {
                Ok((key, algorithm)) => {
                    keys.insert(jwk.kid.clone(), CachedKey { key, algorithm });
                }
                Err(e) => tracing::warn!(kid = %jwk.kid, error = %e, "Skipping unusable JWK"),
            }
        }

        let mut store = self.store.write();
        store.keys = keys;
        store.fetched_at = Some(Instant::now());
        tracing::info!(keys = store.keys.len(), "JWKS cache refreshed");

        Ok(())
    }

    /// Fetch keys ahead of the first request
    pub async fn warm(&self) -> Result<()> {
        self.refresh().await
    }
}
