//! Failures of an upload request

use axum::http::StatusCode;
use thiserror::Error;

use crate::services::huggingface::TransformError;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Failed to get file from form")]
    MissingFile,

    #[error("Invalid file type. Only JPG, JPEG, and PNG are allowed")]
    UnsupportedType(String),

    #[error("File size exceeds 5MB limit")]
    TooLarge,

    #[error("Invalid upload form: {0}")]
    InvalidForm(String),

    #[error("Failed to process image: {0}")]
    TransformFailed(#[from] TransformError),
}

impl UploadError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            UploadError::MissingFile
            | UploadError::UnsupportedType(_)
            | UploadError::TooLarge
            | UploadError::InvalidForm(_) => StatusCode::BAD_REQUEST,
            UploadError::TransformFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
