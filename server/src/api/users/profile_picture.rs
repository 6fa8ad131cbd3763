use super::UserResponse;
use crate::api::files::read_image_upload;
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::files::{store_file, EntityKind, FileOwner};
use crate::models::User;
use crate::schema::{file_storage, users};
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::prelude::*;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadImageRequest {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[utoipa::path(
    put,
    path = "/api/users/me/profile-picture",
    tag = "users",
    request_body(content_type = "multipart/form-data", content = UploadImageRequest),
    responses(
        (status = 200, description = "Profile picture replaced", body = UserResponse),
        (status = 400, description = "Missing or invalid image", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn upload_profile_picture(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let upload = read_image_upload(multipart).await?;
    let mut conn = pool.get()?;

    let updated = conn.transaction::<_, ApiError, _>(|conn| {
        let file_id = store_file(
            conn,
            FileOwner::new(EntityKind::User, user.id),
            &upload.filename,
            upload.mime_type,
            &upload.data,
        )?;

        let updated: User = diesel::update(users::table.find(user.id))
            .set(users::profile_picture_file_id.eq(file_id))
            .returning(User::as_returning())
            .get_result(conn)?;

        if let Some(previous) = user.profile_picture_file_id {
            diesel::delete(file_storage::table.find(previous)).execute(conn)?;
        }

        Ok(updated)
    })?;

    tracing::info!(user_id = user.id, "Profile picture replaced");

    Ok((StatusCode::OK, Json(UserResponse::from(&updated))))
}
