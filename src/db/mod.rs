/// User storage collaborator
///
/// The auth core only needs a narrow find/create/update capability set, so
/// storage sits behind [`UserStore`]. Production uses the Postgres
/// implementation; tests use the in-memory one. Uniqueness races between
/// concurrent registrations are settled by the store itself (Postgres unique
/// constraints, or the single write lock in memory), not by the caller.
use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{NewUser, User, UserChanges};

pub mod memory;
pub mod user_repo;

pub use memory::InMemoryUserStore;
pub use user_repo::PgUserStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_by_verification_token(&self, token: &str) -> Result<Option<User>>;

    /// Insert a new user; fails with `UsernameTaken` / `EmailTaken` when a
    /// uniqueness constraint is violated, including when two registrations
    /// race past the caller's pre-checks.
    async fn create(&self, new_user: NewUser) -> Result<User>;

    /// Apply a partial field update and return the updated row.
    async fn update(&self, user_id: Uuid, changes: UserChanges) -> Result<User>;
}
