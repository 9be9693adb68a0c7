// src/services/mod.rs
//
// Clients for the external services plus the user store

pub mod google;
pub mod huggingface;
pub mod users;

// Re-export commonly used types for convenience
pub use google::{GoogleOAuthClient, IdentityProvider};
pub use huggingface::{HuggingFaceClient, ImageTransformer};
pub use users::UserService;
