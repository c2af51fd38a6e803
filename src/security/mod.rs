/// Security module for authentication
/// Provides password hashing, JWT token management and token revocation.
pub mod jwt;
pub mod password;
pub mod token_revocation;

pub use jwt::{Claims, Jwt, TokenPair, TokenType};
pub use password::{hash_password, verify_password};
pub use token_revocation::{
    InMemoryRevocationStore, RedisRevocationStore, RevocationStore,
};
