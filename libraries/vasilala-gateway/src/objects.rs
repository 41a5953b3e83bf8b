//! Binary object upload.
//!
//! Size and content-type validation happens before any network call; the
//! body is streamed in chunks with fractional progress reported to the
//! caller's callback as each chunk is consumed.

use crate::client::{response_error, transport_error, GatewayClient};
use crate::error::{GatewayError, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use tracing::{debug, info};
use vasilala_core::{ObjectStore, ProgressFn, UploadKind};

/// Upload body chunk size
const CHUNK_BYTES: usize = 64 * 1024;

/// Classify an upload by its content type.
fn kind_for_content_type(content_type: &str) -> Result<UploadKind> {
    if content_type.starts_with("video/") {
        Ok(UploadKind::Video)
    } else if content_type.starts_with("audio/") {
        Ok(UploadKind::Audio)
    } else if content_type.starts_with("image/") {
        Ok(UploadKind::Image)
    } else {
        Err(GatewayError::Validation(format!(
            "unsupported content type '{content_type}'"
        )))
    }
}

#[derive(Debug, serde::Deserialize)]
struct UploadResponse {
    url: String,
}

impl GatewayClient {
    async fn do_upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
        on_progress: Option<ProgressFn>,
    ) -> Result<String> {
        let kind = kind_for_content_type(content_type)?;
        self.upload_limits
            .check(kind, content_type, bytes.len())
            .map_err(|e| GatewayError::Validation(e.to_string()))?;

        let token = self.access_token().await?;
        let url = format!("{}/api/objects/{key}", self.base_url().await);
        let total = bytes.len();

        debug!(key, size = total, content_type, "uploading object");

        // Stream the body chunk by chunk, reporting fractional progress
        let chunks: Vec<Vec<u8>> = bytes.chunks(CHUNK_BYTES).map(<[u8]>::to_vec).collect();
        let mut sent = 0usize;
        let stream = futures_util::stream::iter(chunks.into_iter().map(move |chunk| {
            sent += chunk.len();
            if let Some(callback) = &on_progress {
                callback(sent as f32 / total as f32);
            }
            Ok::<Vec<u8>, std::io::Error>(chunk)
        }));

        let part = Part::stream_with_length(Body::wrap_stream(stream), total as u64)
            .file_name(key.to_string())
            .mime_str(content_type)?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if status.as_u16() == 413 {
            return Err(GatewayError::ServerError {
                status: 413,
                message: "File too large".to_string(),
            });
        }
        if !status.is_success() {
            return Err(response_error(response).await);
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::ParseError(format!("upload response: {e}")))?;

        info!(key, size = total, url = %uploaded.url, "object uploaded");
        Ok(uploaded.url)
    }
}

#[async_trait]
impl ObjectStore for GatewayClient {
    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
        on_progress: Option<ProgressFn>,
    ) -> vasilala_core::Result<String> {
        self.do_upload(key, bytes, content_type, on_progress)
            .await
            .map_err(vasilala_core::CoreError::from)
    }
}
