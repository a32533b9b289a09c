//! JWT service — issue and verify tokens.
//!
//! The login and register routes issue, everything behind auth
//! verifies. The demo constructor uses a hardcoded secret; anything
//! real would read one from config.

use serde::{Deserialize, Serialize};

/// JWT claims — what's inside the token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the username.
    pub sub: String,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

/// JWT service — issue and verify tokens.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: jsonwebtoken::EncodingKey,
    decoding_key: jsonwebtoken::DecodingKey,
    validation: jsonwebtoken::Validation,
    expire_secs: i64,
}

/// Demo secret — hardcoded, not for production.
pub const DEMO_SECRET: &str = "conduit-demo-jwt-secret";

impl JwtService {
    /// Create a new JwtService with an HMAC secret.
    pub fn new(secret: &str, expire_secs: i64) -> Self {
        Self {
            encoding_key: jsonwebtoken::EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: jsonwebtoken::DecodingKey::from_secret(secret.as_bytes()),
            validation: jsonwebtoken::Validation::default(),
            expire_secs,
        }
    }

    /// Create with the demo secret (24h expiry).
    pub fn demo() -> Self {
        Self::new(DEMO_SECRET, 86400)
    }

    /// Issue a signed JWT for a username.
    pub fn issue(&self, username: &str) -> Result<String, String> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: username.to_string(),
            iat: now,
            exp: now + self.expire_secs,
        };
        jsonwebtoken::encode(&jsonwebtoken::Header::default(), &claims, &self.encoding_key)
            .map_err(|e| format!("jwt encode: {}", e))
    }

    /// Verify a JWT and extract claims.
    /// Returns Err if the token is invalid, expired, or tampered with.
    pub fn verify(&self, token: &str) -> Result<Claims, String> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| format!("jwt verify: {}", e))
    }
}
