/// Test fixtures and helpers
use std::sync::Arc;

use crate::db::InMemoryUserStore;
use crate::models::User;
use crate::security::{InMemoryRevocationStore, Jwt};
use crate::services::AuthService;

pub const TEST_USERNAME: &str = "alice";
pub const TEST_EMAIL: &str = "alice@x.com";
pub const TEST_PASSWORD: &str = "Str0ng!Pass";

pub const TEST_USERNAME_2: &str = "bob";
pub const TEST_EMAIL_2: &str = "bob@x.com";

/// Build a service over in-memory stores with default token lifetimes.
pub fn test_service() -> AuthService {
    service_with_jwt(Jwt::new("test-secret", "HS256", 30, 7, 0).unwrap())
}

/// Build a service with a custom codec, e.g. backdated lifetimes.
pub fn service_with_jwt(jwt: Jwt) -> AuthService {
    AuthService::new(
        Arc::new(InMemoryUserStore::new()),
        Arc::new(InMemoryRevocationStore::new()),
        Arc::new(jwt),
    )
}

/// Register the standard test user and return it.
pub async fn register_test_user(service: &AuthService) -> User {
    service
        .register(TEST_USERNAME, TEST_EMAIL, TEST_PASSWORD)
        .await
        .expect("registration should succeed")
}
