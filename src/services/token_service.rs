//! Bearer token issuance and verification.
//!
//! Tokens are JWTs signed with a symmetric (HMAC) algorithm and carry the
//! subject plus issue/expiry timestamps. The server keeps no record of issued
//! tokens: a token is valid while its signature checks out and it has not expired.
//!
//! The signing secret is injected at construction. When none is configured a
//! random one is generated for the process, which means a restart invalidates
//! every outstanding token.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Claims embedded in every access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (the username)
    pub sub: String,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration (unix seconds)
    pub exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Any verification failure: bad signature, malformed token, missing
    /// subject or expired. Callers are not told which.
    #[error("Invalid token")]
    Invalid,

    #[error("Unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Failed to sign token: {0}")]
    Signing(jsonwebtoken::errors::Error),

    /// Issue time plus lifetime does not fit a timestamp.
    #[error("Token lifetime out of range")]
    LifetimeOutOfRange,
}

/// Issues and verifies access tokens with a single process-wide secret.
#[derive(Clone)]
pub struct TokenService {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &self.algorithm)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl TokenService {
    /// Create a service from an explicit secret.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::UnsupportedAlgorithm` for anything other than
    /// HS256, HS384 or HS512.
    pub fn new(secret: &[u8], algorithm: Algorithm) -> Result<Self, TokenError> {
        match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {}
            other => return Err(TokenError::UnsupportedAlgorithm(format!("{other:?}"))),
        }

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        })
    }

    /// Build the service from configuration, generating a secret when none is set.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::UnsupportedAlgorithm` if `ALGORITHM` is not a known
    /// HMAC algorithm name.
    pub fn from_config(config: &Config) -> Result<Self, TokenError> {
        let algorithm: Algorithm = config
            .algorithm
            .parse()
            .map_err(|_| TokenError::UnsupportedAlgorithm(config.algorithm.clone()))?;

        match config.configured_secret() {
            Some(secret) => Self::new(secret.as_bytes(), algorithm),
            None => {
                tracing::warn!(
                    "SECRET_KEY not set; using a generated signing secret, tokens will not survive a restart"
                );
                Self::new(generate_secret().as_bytes(), algorithm)
            }
        }
    }

    /// Issue a token for `subject` that expires `ttl` from now.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Signing` if the claims cannot be encoded and
    /// `TokenError::LifetimeOutOfRange` if the expiry overflows.
    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<String, TokenError> {
        self.issue_at(subject, ttl, Utc::now())
    }

    fn issue_at(
        &self,
        subject: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let expires = now
            .checked_add_signed(ttl)
            .ok_or(TokenError::LifetimeOutOfRange)?;

        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            // Round up so a sub-second issue time never cuts the lifetime short.
            exp: expires.timestamp() + i64::from(expires.timestamp_subsec_nanos() > 0),
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Verify a token and return its subject.
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Invalid` for every kind of rejection.
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        self.verify_at(token, Utc::now())
    }

    fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is checked below without leeway.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| TokenError::Invalid)?;

        if data.claims.exp <= now.timestamp() || data.claims.sub.is_empty() {
            return Err(TokenError::Invalid);
        }

        Ok(data.claims.sub)
    }
}

/// 32 random bytes, hex encoded.
fn generate_secret() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}
