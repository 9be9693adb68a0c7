// src/services/huggingface.rs
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::common::config::InferenceConfig;

pub const PROFILE_PICTURE_PROMPT: &str = "Make this image look like a professional profile picture with soft lighting and neutral background.";

#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("API request failed with status code: {status}, body: {body}")]
    Failed { status: u16, body: String },

    #[error("Failed to read API response: {0}")]
    InvalidResponse(String),
}

impl TransformError {
    /// Upstream HTTP status, when the endpoint answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            TransformError::Failed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Turns an uploaded image into a new one.
#[async_trait]
pub trait ImageTransformer: Send + Sync {
    /// Takes the base64 of the source image and returns the raw bytes of the
    /// transformed image.
    async fn transform(&self, image_base64: &str) -> Result<Vec<u8>, TransformError>;
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct InferenceParameters {
    pub guidance_scale: f64,
    pub num_inference_steps: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for InferenceParameters {
    fn default() -> Self {
        Self {
            guidance_scale: 7.5,
            num_inference_steps: 10,
            width: 512,
            height: 512,
        }
    }
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: InferenceInputs<'a>,
}

#[derive(Debug, Serialize)]
struct InferenceInputs<'a> {
    image: &'a str,
    prompt: &'a str,
    parameters: InferenceParameters,
}

/// Client for the instruct-pix2pix model on the Hugging Face inference API
#[derive(Debug, Clone)]
pub struct HuggingFaceClient {
    config: InferenceConfig,
    client: Client,
    parameters: InferenceParameters,
}

impl HuggingFaceClient {
    pub fn new(config: InferenceConfig, client: Client) -> Self {
        Self {
            config,
            client,
            parameters: InferenceParameters::default(),
        }
    }
}

#[async_trait]
impl ImageTransformer for HuggingFaceClient {
    async fn transform(&self, image_base64: &str) -> Result<Vec<u8>, TransformError> {
        let payload = InferenceRequest {
            inputs: InferenceInputs {
                image: image_base64,
                prompt: PROFILE_PICTURE_PROMPT,
                parameters: self.parameters,
            },
        };

        debug!(
            model_url = %self.config.model_url,
            image_len = image_base64.len(),
            "Sending image to inference API"
        );

        let response = self
            .client
            .post(&self.config.model_url)
            .bearer_auth(&self.config.api_key)
            .header("X-Use-Cache", "true")
            .header("X-Wait-For-Model", "true")
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Inference API request failed");
                TransformError::RequestFailed(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransformError::InvalidResponse(e.to_string()))?;

        if status != StatusCode::OK {
            let body = String::from_utf8_lossy(&body).into_owned();
            error!(status = %status, body = %body, "Inference API returned an error");
            return Err(TransformError::Failed {
                status: status.as_u16(),
                body,
            });
        }

        info!(bytes = body.len(), "Inference API returned transformed image");
        Ok(body.to_vec())
    }
}
