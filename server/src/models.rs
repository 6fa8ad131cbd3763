use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Account role stored in `users.role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub reset_password_token_hash: Option<String>,
    pub reset_password_expires_at: Option<DateTime<Utc>>,
    pub profile_picture_file_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Unknown role strings are treated as the least privileged role; the
    /// column CHECK constraint keeps them out in practice.
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or(Role::User)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Role::Admin
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
}

#[derive(Queryable, Selectable, Identifiable, Debug)]
#[diesel(table_name = crate::schema::recipe)]
#[diesel(primary_key(recipe_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Recipe {
    pub recipe_id: i32,
    pub user_id: i32,
    pub category_id: Option<i32>,
    pub sub_category_id: Option<i32>,
    pub title: String,
    pub description: Option<String>,
    pub prep_time_minutes: Option<i32>,
    pub cook_time_minutes: Option<i32>,
    pub servings: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe)]
pub struct NewRecipe<'a> {
    pub user_id: i32,
    pub category_id: Option<i32>,
    pub sub_category_id: Option<i32>,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub prep_time_minutes: Option<i32>,
    pub cook_time_minutes: Option<i32>,
    pub servings: Option<i32>,
}

/// Partial update for `recipe`. `None` leaves a column untouched.
#[derive(AsChangeset, Default)]
#[diesel(table_name = crate::schema::recipe)]
pub struct RecipeChanges<'a> {
    pub category_id: Option<Option<i32>>,
    pub sub_category_id: Option<Option<i32>>,
    pub title: Option<&'a str>,
    pub description: Option<Option<&'a str>>,
    pub prep_time_minutes: Option<Option<i32>>,
    pub cook_time_minutes: Option<Option<i32>>,
    pub servings: Option<Option<i32>>,
}

#[derive(Queryable, Selectable, Debug, Clone, Serialize, ToSchema)]
#[diesel(table_name = crate::schema::ingredient)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Ingredient {
    pub ingredient_id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::ingredient)]
pub struct NewIngredient<'a> {
    pub name: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_ingredient)]
pub struct NewRecipeIngredient<'a> {
    pub recipe_id: i32,
    pub ingredient_id: i32,
    pub quantity: Option<&'a str>,
    pub unit: Option<&'a str>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_instruction)]
pub struct NewRecipeInstruction<'a> {
    pub recipe_id: i32,
    pub step_number: i32,
    pub instruction_text: &'a str,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::recipe_category)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RecipeCategory {
    pub category_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::recipe_category)]
pub struct NewRecipeCategory<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub image_url: Option<&'a str>,
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::recipe_sub_category)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RecipeSubCategory {
    pub sub_category_id: i32,
    pub category_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::recipe_sub_category)]
pub struct NewRecipeSubCategory<'a> {
    pub category_id: i32,
    pub name: &'a str,
    pub description: Option<&'a str>,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::comment)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Comment {
    pub comment_id: i32,
    pub recipe_id: i32,
    pub user_id: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::comment)]
pub struct NewComment<'a> {
    pub recipe_id: i32,
    pub user_id: i32,
    pub content: &'a str,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::likes)]
pub struct NewLike {
    pub user_id: i32,
    pub recipe_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::followers)]
pub struct NewFollower {
    pub user_id: i32,
    pub follower_user_id: i32,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::save_recipe)]
pub struct NewSaveRecipe {
    pub user_id: i32,
    pub recipe_id: i32,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::banner)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Banner {
    pub banner_id: i32,
    pub title: String,
    pub image_url: String,
    pub keywords: Vec<Option<String>>,
    pub is_hero: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::banner)]
pub struct NewBanner<'a> {
    pub title: &'a str,
    pub image_url: &'a str,
    pub keywords: &'a [Option<String>],
    pub is_hero: bool,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::file_storage)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StoredFile {
    pub id: i32,
    pub table_name: String,
    pub table_id: Option<i32>,
    pub filename: String,
    pub mime_type: String,
    pub data: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::file_storage)]
pub struct NewStoredFile<'a> {
    pub table_name: &'a str,
    pub table_id: Option<i32>,
    pub filename: &'a str,
    pub mime_type: &'a str,
    pub data: &'a [u8],
}
