// src/upload/handlers.rs

use axum::{
    extract::{multipart::Field, Extension, Multipart},
    http::StatusCode,
    response::Html,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;
use tracing::{error, info, warn};

use super::errors::UploadError;
use super::models::{UploadOutcome, UploadedImage};
use super::validators::{validate_file_size, validate_file_type};
use crate::common::AppState;
use crate::pages::views::{self, PageView};
use crate::services::ImageTransformer;

const FILE_FIELD: &str = "file";
const NAME_FIELD: &str = "name";

/// POST /upload - Validate an image, transform it and show the result
///
/// Failures re-render the home page with the error message and the
/// matching status code.
pub async fn upload_image(
    Extension(state): Extension<Arc<AppState>>,
    multipart: Multipart,
) -> (StatusCode, Html<String>) {
    let upload = match read_upload_form(multipart).await {
        Ok(upload) => upload,
        Err(e) => return failure_response(e, None),
    };
    let display_name = upload.display_name.clone();

    match process_upload(state.transformer.as_ref(), upload).await {
        Ok(outcome) => {
            info!(file_name = %outcome.file_name, "✅ Upload complete");
            (
                StatusCode::OK,
                Html(views::render_index(&success_view(&outcome))),
            )
        }
        Err(e) => failure_response(e, Some(display_name)),
    }
}

fn failure_response(e: UploadError, display_name: Option<String>) -> (StatusCode, Html<String>) {
    let status = e.status_code();
    match &e {
        UploadError::TransformFailed(cause) => {
            error!(error = %e, upstream_status = ?cause.status(), "❌ Image transformation failed");
        }
        _ => warn!(error = %e, status = %status, "Upload rejected"),
    }
    (
        status,
        Html(views::render_index(&failure_view(&e.to_string(), display_name))),
    )
}

/// Pulls the `file` and `name` fields out of the form.
///
/// The file's extension is checked before any of its bytes are read and its
/// size is checked while streaming, so bad files never reach the transformer.
pub async fn read_upload_form(mut multipart: Multipart) -> Result<UploadedImage, UploadError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut display_name = String::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some(FILE_FIELD) if file.is_none() => {
                // Browsers send an empty filename when nothing was picked
                let Some(file_name) = field
                    .file_name()
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                else {
                    continue;
                };
                validate_file_type(&file_name)?;
                let bytes = read_limited(field).await?;
                file = Some((file_name, bytes));
            }
            Some(NAME_FIELD) => {
                display_name = field.text().await.map_err(multipart_error)?;
            }
            _ => {}
        }
    }

    let (file_name, bytes) = file.ok_or(UploadError::MissingFile)?;
    UploadedImage::new(file_name, display_name, bytes)
}

async fn read_limited(mut field: Field<'_>) -> Result<Vec<u8>, UploadError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        validate_file_size(bytes.len() + chunk.len())?;
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> UploadError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::TooLarge
    } else {
        UploadError::InvalidForm(e.body_text())
    }
}

/// Sends a validated upload to the transformer.
pub async fn process_upload(
    transformer: &dyn ImageTransformer,
    upload: UploadedImage,
) -> Result<UploadOutcome, UploadError> {
    let original_base64 = upload.to_base64();

    let processed = transformer.transform(&original_base64).await?;

    info!(
        file_name = %upload.file_name,
        original_bytes = upload.bytes.len(),
        processed_bytes = processed.len(),
        "Image processed"
    );

    Ok(UploadOutcome {
        file_name: upload.file_name,
        display_name: upload.display_name,
        original_base64,
        processed_base64: STANDARD.encode(&processed),
    })
}

pub fn success_view(outcome: &UploadOutcome) -> PageView {
    PageView {
        success: Some("File uploaded and processed successfully".to_string()),
        uploaded_name: Some(outcome.display_name.clone()),
        file_name: Some(outcome.original_base64.clone()),
        processed_image: Some(outcome.processed_base64.clone()),
        reset_form: true,
        ..views::base_view("Home", "Welcome to our site", "/")
    }
}

pub fn failure_view(message: &str, display_name: Option<String>) -> PageView {
    PageView {
        error: Some(message.to_string()),
        uploaded_name: display_name,
        reset_form: false,
        ..views::base_view("Home", "Welcome to our site", "/")
    }
}
