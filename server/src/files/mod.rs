//! Blob storage in the `file_storage` table.
//!
//! A stored file points back at the row it belongs to through
//! `(table_name, table_id)`. That pair is not a foreign key, so deleting the
//! owner leaves its files behind unless the deleting code calls
//! [`delete_owned_files`]. Owners are named through [`EntityKind`] so the
//! table names written here always match a real table.

pub mod processing;

use crate::models::{NewStoredFile, StoredFile};
use crate::schema::file_storage;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Recipe,
    RecipeCategory,
    Banner,
}

impl EntityKind {
    pub fn table_name(&self) -> &'static str {
        match self {
            EntityKind::User => "users",
            EntityKind::Recipe => "recipe",
            EntityKind::RecipeCategory => "recipe_category",
            EntityKind::Banner => "banner",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "users" => Ok(EntityKind::User),
            "recipe" => Ok(EntityKind::Recipe),
            "recipe_category" => Ok(EntityKind::RecipeCategory),
            "banner" => Ok(EntityKind::Banner),
            other => Err(format!("Unknown file owner table: {}", other)),
        }
    }
}

/// The row a stored file belongs to. `id` is `None` for files uploaded
/// before their owner row exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileOwner {
    pub kind: EntityKind,
    pub id: Option<i32>,
}

impl FileOwner {
    pub fn new(kind: EntityKind, id: i32) -> Self {
        Self { kind, id: Some(id) }
    }
}

impl StoredFile {
    /// Owner recorded on the row, if the table name is one we know.
    pub fn owner(&self) -> Option<FileOwner> {
        let kind = self.table_name.parse().ok()?;
        Some(FileOwner {
            kind,
            id: self.table_id,
        })
    }
}

/// Public URL a stored file is served from.
pub fn file_url(file_id: i32) -> String {
    format!("/api/files/{}", file_id)
}

pub fn store_file(
    conn: &mut PgConnection,
    owner: FileOwner,
    filename: &str,
    mime_type: &str,
    data: &[u8],
) -> QueryResult<i32> {
    diesel::insert_into(file_storage::table)
        .values(NewStoredFile {
            table_name: owner.kind.table_name(),
            table_id: owner.id,
            filename,
            mime_type,
            data,
        })
        .returning(file_storage::id)
        .get_result(conn)
}

pub fn find_file(conn: &mut PgConnection, file_id: i32) -> QueryResult<Option<StoredFile>> {
    file_storage::table
        .find(file_id)
        .select(StoredFile::as_select())
        .first(conn)
        .optional()
}

/// Remove every file attached to `owner`. Returns the number of rows removed.
pub fn delete_owned_files(conn: &mut PgConnection, owner: FileOwner) -> QueryResult<usize> {
    let Some(owner_id) = owner.id else {
        return Ok(0);
    };

    diesel::delete(
        file_storage::table
            .filter(file_storage::table_name.eq(owner.kind.table_name()))
            .filter(file_storage::table_id.eq(owner_id)),
    )
    .execute(conn)
}
