//! # Upload Module
//!
//! Image upload pipeline:
//! - Multipart parsing with extension and size validation
//! - Forwarding to the image transformer
//! - Re-rendering the home page with the original and processed image

pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod validators;


pub use routes::upload_routes;
