/// Session orchestration: register, login, refresh, logout, verify-email,
/// plus bearer-token authentication for protected resources.
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::db::UserStore;
use crate::error::{AuthError, Result};
use crate::models::{NewUser, User, UserChanges};
use crate::security::token_revocation::RevocationStore;
use crate::security::{hash_password, verify_password, Claims, Jwt, TokenPair, TokenType};

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    revocations: Arc<dyn RevocationStore>,
    jwt: Arc<Jwt>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        revocations: Arc<dyn RevocationStore>,
        jwt: Arc<Jwt>,
    ) -> Self {
        Self {
            users,
            revocations,
            jwt,
        }
    }

    /// Register a new user.
    ///
    /// Uniqueness pre-checks give precise conflict errors; the store's own
    /// constraints settle any race between concurrent registrations.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<User> {
        if self.users.find_by_username(username).await?.is_some() {
            return Err(AuthError::UsernameTaken);
        }
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash_password(password)?;
        let user = self
            .users
            .create(NewUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
                verification_token: Uuid::new_v4().to_string(),
            })
            .await?;

        tracing::info!("User registered: {}", user.username);
        Ok(user)
    }

    /// Authenticate credentials and mint an access + refresh token pair.
    ///
    /// Unknown username and wrong password take the same failure path so the
    /// response cannot be used to enumerate accounts.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair> {
        let user = self.users.find_by_username(username).await?;

        let user = match user {
            Some(user) => user,
            None => return Err(AuthError::InvalidCredentials),
        };
        verify_password(password, &user.password_hash)?;

        let pair = self.jwt.issue_token_pair(&user.username)?;
        tracing::info!("User logged in: {}", user.username);
        Ok(pair)
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// The refresh token itself is not rotated; it stays usable until its own
    /// expiry or an explicit logout.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String> {
        let (user, _claims) = self.authenticate(refresh_token, TokenType::Refresh).await?;

        let access_token = self.jwt.issue_access_token(&user.username)?;
        tracing::info!("Token refreshed for user: {}", user.username);
        Ok(access_token)
    }

    /// Revoke the current access token and, when supplied, a refresh token.
    ///
    /// Idempotent: revoking an already-revoked id is a no-op success, and an
    /// expired or undecodable refresh token is skipped rather than rejected.
    pub async fn logout(&self, access_claims: &Claims, refresh_token: Option<&str>) -> Result<()> {
        self.revocations
            .revoke(
                &access_claims.jti,
                Duration::from_secs(access_claims.remaining_lifetime_secs()),
            )
            .await?;

        if let Some(refresh_token) = refresh_token {
            match self.jwt.decode(refresh_token) {
                Ok(claims) if claims.token_type == TokenType::Refresh => {
                    self.revocations
                        .revoke(
                            &claims.jti,
                            Duration::from_secs(claims.remaining_lifetime_secs()),
                        )
                        .await?;
                }
                Ok(_) | Err(AuthError::TokenExpired) => {
                    // Already dead or not a refresh token; nothing to revoke.
                }
                Err(_) => {
                    tracing::warn!("Undecodable refresh token supplied at logout, ignoring");
                }
            }
        }

        tracing::info!("User logged out: {}", access_claims.sub);
        Ok(())
    }

    /// Mark the user owning `token` as verified.
    ///
    /// The verification token is matched by stored value, not decoded; it
    /// stays valid after success, so repeat calls succeed.
    pub async fn verify_email(&self, token: &str) -> Result<User> {
        let user = self
            .users
            .find_by_verification_token(token)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        let updated = self
            .users
            .update(
                user.id,
                UserChanges {
                    is_verified: Some(true),
                    ..Default::default()
                },
            )
            .await?;

        tracing::info!("Email verified for user: {}", updated.username);
        Ok(updated)
    }

    /// Apply a partial profile update for an authenticated user.
    pub async fn update_profile(&self, user: &User, changes: UserChanges) -> Result<User> {
        if let Some(new_username) = &changes.username {
            if new_username != &user.username
                && self.users.find_by_username(new_username).await?.is_some()
            {
                return Err(AuthError::UsernameTaken);
            }
        }
        if let Some(new_email) = &changes.email {
            if new_email != &user.email && self.users.find_by_email(new_email).await?.is_some() {
                return Err(AuthError::EmailTaken);
            }
        }

        self.users.update(user.id, changes).await
    }

    /// Resolve a presented token to an authenticated user.
    ///
    /// Checks run in a fixed order: signature, expiry, type, revocation,
    /// subject lookup. A token of the wrong type and an unknown subject both
    /// collapse into `InvalidToken`, indistinguishable from a bad signature.
    pub async fn authenticate(
        &self,
        token: &str,
        expected_type: TokenType,
    ) -> Result<(User, Claims)> {
        let claims = self.jwt.decode(token)?;

        if claims.token_type != expected_type {
            return Err(AuthError::InvalidToken);
        }

        if self.revocations.is_revoked(&claims.jti).await? {
            return Err(AuthError::TokenRevoked);
        }

        let user = self
            .users
            .find_by_username(&claims.sub)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        Ok((user, claims))
    }
}
