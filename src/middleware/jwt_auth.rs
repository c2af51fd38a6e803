/// Bearer-token authentication extractor
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::AuthError;
use crate::models::User;
use crate::security::{Claims, TokenType};
use crate::AppState;

/// Authenticated session extracted from the `Authorization` header.
///
/// Carries both the resolved user and the validated claims; handlers that
/// revoke the presented token need its `jti` and expiry.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub claims: Claims,
}

/// Pull the bearer token out of the request headers.
pub fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let auth_header = parts
        .headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::InvalidToken)?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidToken)
}

#[async_trait]
impl FromRequestParts<AppState> for AuthSession {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.to_string();
        let (user, claims) = state.auth.authenticate(&token, TokenType::Access).await?;
        Ok(AuthSession { user, claims })
    }
}
