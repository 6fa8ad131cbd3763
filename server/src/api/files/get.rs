use crate::api::ErrorResponse;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::files::find_file;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// HTTP-date form used by `Last-Modified`.
fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

#[utoipa::path(
    get,
    path = "/api/files/{id}",
    tag = "files",
    params(
        ("id" = i32, Path, description = "File ID")
    ),
    responses(
        (status = 200, description = "File contents with their stored content type", content_type = "application/octet-stream"),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
pub async fn get_file(
    State(pool): State<Arc<DbPool>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let mut conn = pool.get()?;
    let file = find_file(&mut conn, id)?.ok_or(ApiError::NotFound("File"))?;

    tracing::debug!(file_id = file.id, owner = ?file.owner(), "Serving file");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, file.mime_type),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{}\"", file.filename),
            ),
            (
                header::CACHE_CONTROL,
                "public, max-age=31536000, immutable".to_string(),
            ),
            (header::LAST_MODIFIED, http_date(file.created_at)),
        ],
        file.data,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_http_date() {
        let at = Utc.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(http_date(at), "Tue, 04 Mar 2025 05:06:07 GMT");
    }
}
