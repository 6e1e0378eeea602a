//! Access token verification
//!
//! Supabase projects sign tokens either with a shared HS256 secret or with
//! asymmetric keys published as a JWKS. Both are supported.

use anyhow::{Context, Result};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};

use super::{Claims, JwksCache};

#[derive(Clone)]
enum KeySource {
    Secret(DecodingKey),
    Jwks(JwksCache),
}

#[derive(Clone)]
pub struct TokenVerifier {
    source: KeySource,
    issuer: Option<String>,
    audience: String,
}

impl TokenVerifier {
    pub fn with_secret(secret: &str, issuer: Option<String>, audience: String) -> Self {
        Self {
            source: KeySource::Secret(DecodingKey::from_secret(secret.as_bytes())),
            issuer,
            audience,
        }
    }

    pub fn with_jwks(jwks: JwksCache, issuer: Option<String>, audience: String) -> Self {
        Self {
            source: KeySource::Jwks(jwks),
            issuer,
            audience,
        }
    }

    pub fn jwks(&self) -> Option<&JwksCache> {
        match &self.source {
            KeySource::Jwks(cache) => Some(cache),
            KeySource::Secret(_) => None,
        }
    }

    fn validation(&self, algorithm: Algorithm) -> Validation {
        let mut validation = Validation::new(algorithm);
        validation.set_audience(&[&self.audience]);
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }
        validation
    }

    /// Verify signature, expiry, audience and issuer
    pub async fn verify(&self, token: &str) -> Result<Claims> {
        let header = decode_header(token).context("Invalid JWT header")?;

        let data = match &self.source {
            KeySource::Secret(key) => {
                if header.alg != Algorithm::HS256 {
                    anyhow::bail!("Unexpected JWT algorithm {:?}", header.alg);
                }
                decode::<Claims>(token, key, &self.validation(Algorithm::HS256))
            }
            KeySource::Jwks(cache) => {
                let kid = header.kid.context("JWT missing kid header")?;
                let cached = cache.key(&kid).await?;
                if header.alg != cached.algorithm {
                    anyhow::bail!("JWT algorithm does not match signing key");
                }
                decode::<Claims>(token, &cached.key, &self.validation(cached.algorithm))
            }
        }
        .context("JWT validation failed")?;

        Ok(data.claims)
    }
}
