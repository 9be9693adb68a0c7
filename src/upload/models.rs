//! Upload data models

use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::errors::UploadError;
use super::validators::{validate_file_size, validate_file_type};

/// A file taken from the upload form that passed validation
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub display_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    pub fn new(file_name: String, display_name: String, bytes: Vec<u8>) -> Result<Self, UploadError> {
        validate_file_type(&file_name)?;
        validate_file_size(bytes.len())?;
        Ok(Self {
            file_name,
            display_name,
            bytes,
        })
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.bytes)
    }
}

/// Result of a successful upload, ready for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub file_name: String,
    pub display_name: String,
    pub original_base64: String,
    pub processed_base64: String,
}
