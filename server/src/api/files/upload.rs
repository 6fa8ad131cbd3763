use super::read_image_upload;
use crate::api::recipes::{ensure_can_modify, find_recipe};
use crate::api::ErrorResponse;
use crate::auth::AuthUser;
use crate::db::DbPool;
use crate::error::ApiError;
use crate::files::{file_url, store_file, EntityKind, FileOwner};
use crate::models::User;
use crate::schema::{banner, recipe_category};
use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use diesel::dsl::exists;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub struct UploadParams {
    /// Kind of row the file belongs to
    pub owner: EntityKind,
    /// Id of the owning row
    pub owner_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadFileResponse {
    pub id: i32,
    pub url: String,
}

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadFileRequest {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

/// Check that `user` may attach files to `owner` and that the row exists.
fn authorize_owner(conn: &mut PgConnection, user: &User, owner: FileOwner) -> Result<(), ApiError> {
    let Some(id) = owner.id else {
        return Err(ApiError::BadRequest("Owner id is required".to_string()));
    };

    match owner.kind {
        EntityKind::User => {
            if id != user.id {
                return Err(ApiError::Forbidden("Cannot upload files for another user"));
            }
        }
        EntityKind::Recipe => {
            let recipe = find_recipe(conn, id)?;
            ensure_can_modify(user, &recipe)?;
        }
        EntityKind::RecipeCategory | EntityKind::Banner if !user.is_admin() => {
            return Err(ApiError::Forbidden("Admin access required"));
        }
        EntityKind::RecipeCategory => {
            let found: bool = diesel::select(exists(recipe_category::table.find(id)))
                .get_result(conn)?;
            if !found {
                return Err(ApiError::NotFound("Category"));
            }
        }
        EntityKind::Banner => {
            let found: bool =
                diesel::select(exists(banner::table.find(id))).get_result(conn)?;
            if !found {
                return Err(ApiError::NotFound("Banner"));
            }
        }
    }
    Ok(())
}

#[utoipa::path(
    post,
    path = "/api/files",
    tag = "files",
    params(UploadParams),
    request_body(content_type = "multipart/form-data", content = UploadFileRequest),
    responses(
        (status = 201, description = "Image stored", body = UploadFileResponse),
        (status = 400, description = "Missing or invalid image", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Not allowed to attach files to this owner", body = ErrorResponse),
        (status = 404, description = "Owner not found", body = ErrorResponse)
    ),
    security(
        ("cookie_auth" = [])
    )
)]
pub async fn upload_file(
    AuthUser(user): AuthUser,
    State(pool): State<Arc<DbPool>>,
    Query(params): Query<UploadParams>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let owner = FileOwner::new(params.owner, params.owner_id);

    // Reject early, but don't hold a pooled connection while the body streams in
    {
        let mut conn = pool.get()?;
        authorize_owner(&mut conn, &user, owner)?;
    }

    let upload = read_image_upload(multipart).await?;

    let mut conn = pool.get()?;
    let id = store_file(
        &mut conn,
        owner,
        &upload.filename,
        upload.mime_type,
        &upload.data,
    )?;

    tracing::info!(user_id = user.id, file_id = id, owner = %owner.kind, "File uploaded");

    Ok((
        StatusCode::CREATED,
        Json(UploadFileResponse {
            id,
            url: file_url(id),
        }),
    ))
}
