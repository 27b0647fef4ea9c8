//! Image upload

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::ApiClient;
use crate::error::{ClientError, ClientResult};
use crate::models::{UploadImageRequest, UploadImageResponse};

/// Encode raw image bytes as the data URI the upload endpoint expects
pub fn image_data_uri(bytes: &[u8], mime: &str) -> ClientResult<String> {
    if bytes.is_empty() {
        return Err(ClientError::Validation("Could not read image data".to_string()));
    }
    if !mime.starts_with("image/") {
        return Err(ClientError::Validation(format!(
            "'{}' is not an image type",
            mime
        )));
    }
    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}

/// Guess the MIME type from a file extension
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

impl ApiClient {
    /// `POST /upload-image`; returns the hosted URL
    pub async fn upload_image(&self, bytes: &[u8], mime: &str) -> ClientResult<String> {
        let request = UploadImageRequest {
            image: image_data_uri(bytes, mime)?,
        };
        let response: UploadImageResponse = self.post("/upload-image", &request).await?;
        Ok(response.url)
    }
}
