/// Profile handlers (protected resources)
use axum::{extract::State, Json};
use validator::Validate;

use crate::error::AuthError;
use crate::middleware::AuthSession;
use crate::models::{UpdateProfileRequest, UserChanges, UserOut};
use crate::AppState;

/// `GET /users/profile`
pub async fn read_profile(session: AuthSession) -> Json<UserOut> {
    Json(session.user.into())
}

/// `PUT /users/profile`
pub async fn update_profile(
    State(state): State<AppState>,
    session: AuthSession,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserOut>, AuthError> {
    payload
        .validate()
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    let changes = UserChanges {
        username: payload.username,
        email: payload.email,
        is_verified: None,
        full_name: payload.full_name,
        phone_number: payload.phone_number,
    };

    let updated = state.auth.update_profile(&session.user, changes).await?;
    Ok(Json(updated.into()))
}
