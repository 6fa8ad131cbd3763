pub mod get;
pub mod upload;

use crate::error::ApiError;
use crate::files::processing::{sanitize_filename, sniff_image, MAX_FILE_SIZE};
use crate::AppState;
use axum::body::Bytes;
use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

/// A validated image pulled out of a multipart body.
pub struct ImageUpload {
    pub filename: String,
    pub mime_type: &'static str,
    pub data: Bytes,
}

fn multipart_error(e: MultipartError) -> ApiError {
    tracing::warn!("Multipart read error: {}", e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::BadRequest(format!(
            "File too large. Maximum size is {} bytes",
            MAX_FILE_SIZE
        ))
    } else {
        ApiError::BadRequest(format!("Failed to read multipart data: {}", e.body_text()))
    }
}

/// Read the first field of `multipart` and check it is an accepted image.
pub async fn read_image_upload(mut multipart: Multipart) -> Result<ImageUpload, ApiError> {
    let field = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
        .ok_or_else(|| ApiError::BadRequest("No file provided".to_string()))?;

    let filename = sanitize_filename(field.file_name().unwrap_or_default());
    let data = field.bytes().await.map_err(multipart_error)?;
    let mime_type = sniff_image(&data).map_err(ApiError::BadRequest)?;

    Ok(ImageUpload {
        filename,
        mime_type,
        data,
    })
}

/// Returns the router for /api/files endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/files", post(upload::upload_file))
        .route("/api/files/{id}", get(get::get_file))
}

#[derive(OpenApi)]
#[openapi(
    paths(get::get_file, upload::upload_file),
    components(schemas(upload::UploadFileResponse, upload::UploadFileRequest))
)]
pub struct ApiDoc;
