/// In-memory user store for tests
///
/// Holds users behind a single async `RwLock`; `create` performs its
/// uniqueness check and insert under one write guard, mirroring the
/// check-then-create atomicity the Postgres store gets from its unique
/// constraints.
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::UserStore;
use crate::error::{AuthError, Result};
use crate::models::{NewUser, User, UserChanges};

#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_verification_token(&self, token: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.verification_token.as_deref() == Some(token))
            .cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.username == new_user.username) {
            return Err(AuthError::UsernameTaken);
        }
        if users.values().any(|u| u.email == new_user.email) {
            return Err(AuthError::EmailTaken);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            is_active: true,
            is_verified: false,
            verification_token: Some(new_user.verification_token),
            full_name: None,
            phone_number: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user_id: Uuid, changes: UserChanges) -> Result<User> {
        let mut users = self.users.write().await;

        if let Some(new_username) = &changes.username {
            if users
                .values()
                .any(|u| u.id != user_id && &u.username == new_username)
            {
                return Err(AuthError::UsernameTaken);
            }
        }
        if let Some(new_email) = &changes.email {
            if users
                .values()
                .any(|u| u.id != user_id && &u.email == new_email)
            {
                return Err(AuthError::EmailTaken);
            }
        }

        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| AuthError::Database("User not found".to_string()))?;

        if let Some(username) = changes.username {
            user.username = username;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(is_verified) = changes.is_verified {
            user.is_verified = is_verified;
        }
        if let Some(full_name) = changes.full_name {
            user.full_name = Some(full_name);
        }
        if let Some(phone_number) = changes.phone_number {
            user.phone_number = Some(phone_number);
        }
        user.updated_at = Utc::now();

        Ok(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            verification_token: Uuid::new_v4().to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let store = InMemoryUserStore::new();
        let created = store.create(new_user("alice", "alice@x.com")).await.unwrap();

        let found = store.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert!(store.find_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let store = InMemoryUserStore::new();
        store.create(new_user("alice", "alice@x.com")).await.unwrap();

        let result = store.create(new_user("alice", "other@x.com")).await;
        assert!(matches!(result, Err(AuthError::UsernameTaken)));

        let result = store.create(new_user("alice2", "alice@x.com")).await;
        assert!(matches!(result, Err(AuthError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_update_marks_verified() {
        let store = InMemoryUserStore::new();
        let user = store.create(new_user("alice", "alice@x.com")).await.unwrap();
        assert!(!user.is_verified);

        let changes = UserChanges {
            is_verified: Some(true),
            ..Default::default()
        };
        let updated = store.update(user.id, changes).await.unwrap();
        assert!(updated.is_verified);
    }
}
