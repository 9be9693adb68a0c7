//! # Pages Module
//!
//! Server-rendered HTML: the home and about pages, the shared layout and
//! navigation, and the error page used by `ApiError`.

pub mod handlers;
pub mod routes;
pub mod views;


pub use routes::pages_routes;
