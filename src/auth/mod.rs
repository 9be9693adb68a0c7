//! # Auth Module
//!
//! Google sign-in for the site:
//! - OAuth2 authorization-code flow with a per-attempt state token
//! - Server-side session establishment
//! - `require_auth` gate for protected routes

pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod session;

#[cfg(test)]
mod tests;

pub use middleware::require_auth;
pub use routes::auth_routes;
