//! GitHub App JWT minting and caching.
//!
//! An App JWT proves the service's identity to GitHub and is valid for at
//! most 10 minutes. Signing is synchronous RSA work and GitHub rate-limits
//! the endpoints it guards, so the most recent JWT is kept in a
//! process-wide slot and reused until it comes close to expiry.

use std::sync::Mutex;

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;

use crate::error::{GiflyError, Result};

/// App JWT validity window in seconds (the GitHub maximum).
pub const JWT_TTL_SECS: i64 = 600;

/// A cached JWT is reused only while it stays valid for at least this long.
pub const JWT_REUSE_BUFFER_SECS: i64 = 60;

/// A signed, time-bounded GitHub App JWT.
#[derive(Debug, Clone)]
pub struct AppJwt {
    /// The encoded JWT.
    pub token: String,
    /// Issued-at (unix seconds).
    pub issued_at: i64,
    /// Expiry (unix seconds), always `issued_at + JWT_TTL_SECS`.
    pub expires_at: i64,
}

/// Process-wide slot holding the most recently minted App JWT.
///
/// Webhook events are handled concurrently, so the slot is mutex-guarded.
/// Two events racing past an expired entry may both mint; the overwrite is
/// harmless (last writer wins, both JWTs are valid).
#[derive(Debug, Default)]
pub struct JwtCache {
    slot: Mutex<Option<AppJwt>>,
}

impl JwtCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached JWT, if any.
    pub fn get(&self) -> Option<AppJwt> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Stores a JWT, replacing any previous value.
    pub fn set(&self, jwt: AppJwt) {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(jwt);
    }
}

#[derive(Debug, Serialize)]
struct Claims {
    iat: i64,
    exp: i64,
    iss: String,
}

/// Mints and caches GitHub App JWTs.
pub struct AppAuth {
    app_id: u64,
    private_key_pem: String,
    cache: JwtCache,
}

impl AppAuth {
    /// Creates a new App authenticator from a PEM-encoded RSA private key.
    pub fn new(app_id: u64, private_key_pem: String) -> Self {
        Self {
            app_id,
            private_key_pem,
            cache: JwtCache::new(),
        }
    }

    /// Returns an App JWT valid for at least [`JWT_REUSE_BUFFER_SECS`],
    /// minting a new one when the cached value is missing or near expiry.
    pub fn app_jwt(&self) -> Result<AppJwt> {
        self.app_jwt_at(Utc::now().timestamp())
    }

    /// Clock-injectable variant of [`AppAuth::app_jwt`].
    pub fn app_jwt_at(&self, now: i64) -> Result<AppJwt> {
        if let Some(cached) = self.cache.get() {
            if now < cached.expires_at - JWT_REUSE_BUFFER_SECS {
                return Ok(cached);
            }
        }

        let jwt = self.mint(now)?;
        self.cache.set(jwt.clone());

        tracing::debug!(
            app_id = self.app_id,
            expires_at = jwt.expires_at,
            "Minted GitHub App JWT"
        );

        Ok(jwt)
    }

    fn mint(&self, now: i64) -> Result<AppJwt> {
        let claims = Claims {
            iat: now,
            exp: now + JWT_TTL_SECS,
            iss: self.app_id.to_string(),
        };

        let key = EncodingKey::from_rsa_pem(self.private_key_pem.as_bytes())
            .map_err(|e| GiflyError::Signing(format!("Invalid RSA private key: {}", e)))?;

        let header = Header::new(Algorithm::RS256);
        let token = encode(&header, &claims, &key)
            .map_err(|e| GiflyError::Signing(format!("Failed to encode JWT: {}", e)))?;

        Ok(AppJwt {
            token,
            issued_at: claims.iat,
            expires_at: claims.exp,
        })
    }
}

impl std::fmt::Debug for AppAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppAuth")
            .field("app_id", &self.app_id)
            .field("private_key_pem", &"<REDACTED>")
            .finish()
    }
}
