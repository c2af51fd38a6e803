/// JWT issuance and decoding (HS256 family)
///
/// Tokens are the standard three-segment base64url wire format signed with a
/// shared symmetric secret. Claims carry the subject, issued-at/expiry
/// timestamps, a fresh `jti` per issuance (the revocation key) and the token
/// type. Keys and lifetimes are explicit state on [`Jwt`] rather than
/// process-wide globals, so independently configured instances can coexist.
use std::str::FromStr;

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AuthError, Result};

/// Discriminates access tokens from refresh tokens.
///
/// A token is only ever accepted by the operation matching its type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims: `sub`, `iat`, `exp`, `jti`, `type`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Unique token id, fresh per issuance
    pub jti: String,
    #[serde(rename = "type")]
    pub token_type: TokenType,
}

impl Claims {
    /// Seconds until this token expires, clamped at zero.
    pub fn remaining_lifetime_secs(&self) -> u64 {
        (self.exp - Utc::now().timestamp()).max(0) as u64
    }
}

/// Access + refresh token pair returned by login.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
}

/// Token codec and issuer.
pub struct Jwt {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    access_ttl: Duration,
    refresh_ttl: Duration,
    leeway_secs: u64,
}

impl Jwt {
    pub fn new(
        secret: &str,
        algorithm: &str,
        access_minutes: i64,
        refresh_days: i64,
        leeway_secs: u64,
    ) -> Result<Self> {
        let algorithm = Algorithm::from_str(algorithm)
            .map_err(|_| AuthError::Internal(format!("Unknown JWT algorithm: {}", algorithm)))?;

        // The signing secret is symmetric; only the HMAC family is valid here.
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(AuthError::Internal(format!(
                "Unsupported JWT algorithm: {:?}",
                algorithm
            )));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            access_ttl: Duration::minutes(access_minutes),
            refresh_ttl: Duration::days(refresh_days),
            leeway_secs,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            &config.jwt_secret,
            &config.jwt_algorithm,
            config.access_token_expire_minutes,
            config.refresh_token_expire_days,
            config.token_leeway_secs,
        )
    }

    /// Issue a short-lived access token for `subject`.
    pub fn issue_access_token(&self, subject: &str) -> Result<String> {
        self.issue(subject, TokenType::Access, self.access_ttl)
    }

    /// Issue a long-lived refresh token for `subject`.
    pub fn issue_refresh_token(&self, subject: &str) -> Result<String> {
        self.issue(subject, TokenType::Refresh, self.refresh_ttl)
    }

    /// Issue an access + refresh pair in one call.
    pub fn issue_token_pair(&self, subject: &str) -> Result<TokenPair> {
        Ok(TokenPair {
            access_token: self.issue_access_token(subject)?,
            refresh_token: self.issue_refresh_token(subject)?,
            token_type: "bearer".to_string(),
        })
    }

    fn issue(&self, subject: &str, token_type: TokenType, ttl: Duration) -> Result<String> {
        if subject.is_empty() {
            return Err(AuthError::Internal(
                "Token subject must not be empty".to_string(),
            ));
        }

        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
            token_type,
        };

        encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|_| AuthError::Internal("Failed to encode token".to_string()))
    }

    /// Decode and verify a token string.
    ///
    /// The signature is verified before any claim is trusted. Expiry is
    /// evaluated against the clock at call time with the configured leeway;
    /// an expired-but-authentic token maps to `TokenExpired`, every other
    /// failure collapses into `InvalidToken`.
    pub fn decode(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }
}
