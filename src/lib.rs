// Authentication service library

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod security;
pub mod services;

#[cfg(test)]
mod tests;

pub use error::{AuthError, Result};
pub use routes::app_router;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub auth: services::AuthService,
}
