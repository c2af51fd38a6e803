pub mod auth;
pub mod users;

pub use auth::{login, logout, refresh_token, register, verify_email};
pub use users::{read_profile, update_profile};
