/// Authentication handlers
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::error::AuthError;
use crate::middleware::AuthSession;
use crate::models::{
    AccessTokenResponse, LoginRequest, LogoutRequest, RefreshTokenRequest, RegisterRequest,
    RegisterResponse, StatusResponse, VerifyEmailParams,
};
use crate::security::TokenPair;
use crate::AppState;

/// `POST /auth/register`
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AuthError> {
    payload
        .validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let user = state
        .auth
        .register(&payload.username, &payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            msg: "User registered successfully".to_string(),
            id: user.id,
        }),
    ))
}

/// `POST /auth/login`
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenPair>, AuthError> {
    let pair = state.auth.login(&payload.username, &payload.password).await?;
    Ok(Json(pair))
}

/// `POST /auth/refresh-token`
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<Json<AccessTokenResponse>, AuthError> {
    let access_token = state.auth.refresh(&payload.refresh_token).await?;
    Ok(Json(AccessTokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// `POST /auth/logout`
///
/// Revokes the presented access token; a refresh token in the body is
/// revoked as well. The body is optional.
pub async fn logout(
    State(state): State<AppState>,
    session: AuthSession,
    payload: Option<Json<LogoutRequest>>,
) -> Result<Json<StatusResponse>, AuthError> {
    let refresh_token = payload.as_ref().and_then(|p| p.refresh_token.as_deref());

    state.auth.logout(&session.claims, refresh_token).await?;

    Ok(Json(StatusResponse {
        success: true,
        message: "Logged out successfully".to_string(),
    }))
}

/// `POST /auth/verify-email?token=...`
pub async fn verify_email(
    State(state): State<AppState>,
    Query(params): Query<VerifyEmailParams>,
) -> Result<Json<StatusResponse>, AuthError> {
    state.auth.verify_email(&params.token).await?;

    Ok(Json(StatusResponse {
        success: true,
        message: "Email verified successfully".to_string(),
    }))
}
