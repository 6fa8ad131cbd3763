//! Constraint behaviour against a real PostgreSQL database.
//!
//! Run with `TEST_DATABASE_URL=postgres://... cargo test -- --ignored`.
//! Each test works inside a transaction that is never committed.

mod common;

use common::{db_lock, insert_recipe, insert_user, test_connection};
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::Bool;
use recipebox_server::api::banners::hero::promote_to_hero;
use recipebox_server::api::recipes::{
    replace_ingredient_lines, replace_instructions, upsert_ingredient, ValidatedLine,
};
use recipebox_server::db::{revert_migrations, run_migrations};
use recipebox_server::error::ApiError;
use recipebox_server::files::{delete_owned_files, store_file, EntityKind, FileOwner};
use recipebox_server::models::{
    Banner, NewBanner, NewComment, NewFollower, NewIngredient, NewLike, NewRecipeCategory,
    NewRecipeSubCategory, NewSaveRecipe,
};
use recipebox_server::schema::{
    banner, comment, file_storage, followers, ingredient, likes, recipe, recipe_category,
    recipe_ingredient, recipe_instruction, recipe_sub_category, save_recipe, users,
};

fn table_exists(conn: &mut PgConnection, table: &str) -> bool {
    diesel::select(sql::<Bool>(&format!(
        "to_regclass('public.{}') IS NOT NULL",
        table
    )))
    .get_result(conn)
    .unwrap()
}

fn function_exists(conn: &mut PgConnection, name: &str) -> bool {
    diesel::select(sql::<Bool>(&format!(
        "EXISTS (SELECT 1 FROM pg_proc WHERE proname = '{}')",
        name
    )))
    .get_result(conn)
    .unwrap()
}

const INDEXES: [&str; 5] = [
    "idx_users_email",
    "idx_ingredient_name",
    "idx_banner_single_hero",
    "idx_comment_recipe",
    "idx_file_storage_owner",
];

const FUNCTIONS: [&str; 2] = ["diesel_manage_updated_at", "diesel_set_updated_at"];

fn line(name: &str) -> ValidatedLine<'_> {
    ValidatedLine {
        name,
        quantity: Some("200"),
        unit: Some("g"),
    }
}

fn is_unique_violation(err: &DieselError) -> bool {
    matches!(
        err,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

fn insert_banner(conn: &mut PgConnection, title: &str, is_hero: bool) -> QueryResult<Banner> {
    diesel::insert_into(banner::table)
        .values(NewBanner {
            title,
            image_url: "/api/files/1",
            keywords: &[Some("summer".to_string())],
            is_hero,
        })
        .returning(Banner::as_returning())
        .get_result(conn)
}

#[test]
#[ignore]
fn migrations_revert_and_reapply_cleanly() {
    let _guard = db_lock();
    let mut conn = test_connection();

    let tables = [
        "users",
        "recipe",
        "ingredient",
        "recipe_category",
        "recipe_sub_category",
        "recipe_instruction",
        "recipe_ingredient",
        "comment",
        "likes",
        "followers",
        "save_recipe",
        "banner",
        "file_storage",
    ];
    for table in tables {
        assert!(table_exists(&mut conn, table), "{} missing after up", table);
    }
    for index in INDEXES {
        assert!(table_exists(&mut conn, index), "{} missing after up", index);
    }
    for function in FUNCTIONS {
        assert!(function_exists(&mut conn, function), "{} missing after up", function);
    }

    revert_migrations(&mut conn).unwrap();
    for table in tables {
        assert!(!table_exists(&mut conn, table), "{} left after down", table);
    }
    for index in INDEXES {
        assert!(!table_exists(&mut conn, index), "{} left after down", index);
    }
    for function in FUNCTIONS {
        assert!(!function_exists(&mut conn, function), "{} left after down", function);
    }

    let applied = run_migrations(&mut conn).unwrap();
    assert!(!applied.is_empty());
    for table in tables {
        assert!(table_exists(&mut conn, table), "{} missing after re-up", table);
    }
    for index in INDEXES {
        assert!(table_exists(&mut conn, index), "{} missing after re-up", index);
    }
    for function in FUNCTIONS {
        assert!(function_exists(&mut conn, function), "{} missing after re-up", function);
    }
}

#[test]
#[ignore]
fn only_one_hero_banner() {
    let _guard = db_lock();
    let mut conn = test_connection();
    conn.begin_test_transaction().unwrap();

    insert_banner(&mut conn, "First", true).unwrap();
    let err = insert_banner(&mut conn, "Second", true).unwrap_err();

    assert!(is_unique_violation(&err));
    assert_eq!(
        ApiError::from(err).to_string(),
        "Another banner is already the hero"
    );
}

#[test]
#[ignore]
fn promoting_a_banner_moves_the_hero() {
    let _guard = db_lock();
    let mut conn = test_connection();
    conn.begin_test_transaction().unwrap();

    let first = insert_banner(&mut conn, "First", true).unwrap();
    let second = insert_banner(&mut conn, "Second", false).unwrap();

    let hero = promote_to_hero(&mut conn, second.banner_id).unwrap();
    assert!(hero.is_hero);

    let heroes: Vec<i32> = banner::table
        .filter(banner::is_hero.eq(true))
        .select(banner::banner_id)
        .load(&mut conn)
        .unwrap();
    assert_eq!(heroes, vec![second.banner_id]);
    assert_ne!(first.banner_id, second.banner_id);
}

#[test]
#[ignore]
fn duplicate_like_is_rejected() {
    let _guard = db_lock();
    let mut conn = test_connection();
    conn.begin_test_transaction().unwrap();

    let user = insert_user(&mut conn, "Ada", "ada@example.com");
    let recipe = insert_recipe(&mut conn, user.id, "Pancakes");
    let like = NewLike {
        user_id: user.id,
        recipe_id: recipe.recipe_id,
    };

    diesel::insert_into(likes::table)
        .values(&like)
        .execute(&mut conn)
        .unwrap();
    let err = diesel::insert_into(likes::table)
        .values(&like)
        .execute(&mut conn)
        .unwrap_err();

    assert!(is_unique_violation(&err));
    assert_eq!(ApiError::from(err).to_string(), "Recipe already liked");
}

#[test]
#[ignore]
fn email_is_unique_regardless_of_case() {
    let _guard = db_lock();
    let mut conn = test_connection();
    conn.begin_test_transaction().unwrap();

    insert_user(&mut conn, "Ada", "ada@example.com");
    let err = diesel::insert_into(recipebox_server::schema::users::table)
        .values(recipebox_server::models::NewUser {
            name: "Imposter",
            email: "ADA@example.com",
            password_hash: "x",
            role: "user",
        })
        .execute(&mut conn)
        .unwrap_err();

    assert!(is_unique_violation(&err));
}

#[test]
#[ignore]
fn deleting_a_user_cascades() {
    let _guard = db_lock();
    let mut conn = test_connection();
    conn.begin_test_transaction().unwrap();

    let author = insert_user(&mut conn, "Author", "author@example.com");
    let fan = insert_user(&mut conn, "Fan", "fan@example.com");
    let reader = insert_user(&mut conn, "Reader", "reader@example.com");
    let recipe = insert_recipe(&mut conn, author.id, "Soup");

    diesel::insert_into(comment::table)
        .values(NewComment {
            recipe_id: recipe.recipe_id,
            user_id: fan.id,
            content: "Tasty",
        })
        .execute(&mut conn)
        .unwrap();
    diesel::insert_into(likes::table)
        .values(NewLike {
            user_id: fan.id,
            recipe_id: recipe.recipe_id,
        })
        .execute(&mut conn)
        .unwrap();
    diesel::insert_into(followers::table)
        .values(NewFollower {
            user_id: author.id,
            follower_user_id: fan.id,
        })
        .execute(&mut conn)
        .unwrap();
    diesel::insert_into(followers::table)
        .values(NewFollower {
            user_id: author.id,
            follower_user_id: reader.id,
        })
        .execute(&mut conn)
        .unwrap();
    diesel::insert_into(save_recipe::table)
        .values(NewSaveRecipe {
            user_id: fan.id,
            recipe_id: recipe.recipe_id,
        })
        .execute(&mut conn)
        .unwrap();

    diesel::delete(users::table.find(fan.id))
        .execute(&mut conn)
        .unwrap();

    let count = |conn: &mut PgConnection, query: &str| -> i64 {
        diesel::select(sql::<diesel::sql_types::BigInt>(query))
            .get_result(conn)
            .unwrap()
    };
    let fan_id = fan.id;
    assert_eq!(
        count(&mut conn, &format!("(SELECT COUNT(*) FROM comment WHERE user_id = {})", fan_id)),
        0
    );
    assert_eq!(
        count(&mut conn, &format!("(SELECT COUNT(*) FROM likes WHERE user_id = {})", fan_id)),
        0
    );
    assert_eq!(
        count(
            &mut conn,
            &format!("(SELECT COUNT(*) FROM followers WHERE follower_user_id = {})", fan_id)
        ),
        0
    );
    assert_eq!(
        count(&mut conn, &format!("(SELECT COUNT(*) FROM save_recipe WHERE user_id = {})", fan_id)),
        0
    );

    // The author's recipe is untouched
    assert_eq!(
        count(
            &mut conn,
            &format!("(SELECT COUNT(*) FROM recipe WHERE recipe_id = {})", recipe.recipe_id)
        ),
        1
    );

    // Deleting the followed side removes its follower rows and its recipes
    diesel::delete(users::table.find(author.id))
        .execute(&mut conn)
        .unwrap();
    let author_id = author.id;
    assert_eq!(
        count(&mut conn, &format!("(SELECT COUNT(*) FROM followers WHERE user_id = {})", author_id)),
        0
    );
    assert_eq!(
        count(&mut conn, &format!("(SELECT COUNT(*) FROM recipe WHERE user_id = {})", author_id)),
        0
    );
    let reader_left: i64 = users::table
        .filter(users::id.eq(reader.id))
        .count()
        .get_result(&mut conn)
        .unwrap();
    assert_eq!(reader_left, 1);
}

#[test]
#[ignore]
fn deleting_a_recipe_removes_its_lines_but_not_the_catalog() {
    let _guard = db_lock();
    let mut conn = test_connection();
    conn.begin_test_transaction().unwrap();

    let user = insert_user(&mut conn, "Ada", "ada@example.com");
    let bread = insert_recipe(&mut conn, user.id, "Bread");
    replace_ingredient_lines(&mut conn, bread.recipe_id, &[line("Flour"), line("Yeast")]).unwrap();
    replace_instructions(&mut conn, bread.recipe_id, &["Knead", "Bake"]).unwrap();

    diesel::delete(recipe::table.find(bread.recipe_id))
        .execute(&mut conn)
        .unwrap();

    let lines: i64 = recipe_ingredient::table
        .filter(recipe_ingredient::recipe_id.eq(bread.recipe_id))
        .count()
        .get_result(&mut conn)
        .unwrap();
    let steps: i64 = recipe_instruction::table
        .filter(recipe_instruction::recipe_id.eq(bread.recipe_id))
        .count()
        .get_result(&mut conn)
        .unwrap();
    assert_eq!((lines, steps), (0, 0));

    let catalog: i64 = ingredient::table
        .filter(ingredient::name.eq_any(["Flour", "Yeast"]))
        .count()
        .get_result(&mut conn)
        .unwrap();
    assert_eq!(catalog, 2);
}

#[test]
#[ignore]
fn ingredient_names_are_shared_regardless_of_case() {
    let _guard = db_lock();
    let mut conn = test_connection();
    conn.begin_test_transaction().unwrap();

    let user = insert_user(&mut conn, "Ada", "ada@example.com");
    let bread = insert_recipe(&mut conn, user.id, "Bread");
    let cake = insert_recipe(&mut conn, user.id, "Cake");
    replace_ingredient_lines(&mut conn, bread.recipe_id, &[line("Flour")]).unwrap();
    replace_ingredient_lines(&mut conn, cake.recipe_id, &[line("flour")]).unwrap();

    let ids: Vec<i32> = recipe_ingredient::table
        .filter(recipe_ingredient::recipe_id.eq_any([bread.recipe_id, cake.recipe_id]))
        .select(recipe_ingredient::ingredient_id)
        .load(&mut conn)
        .unwrap();
    assert_eq!(ids.len(), 2);
    assert_eq!(ids[0], ids[1]);

    // The first spelling is kept
    let name: String = ingredient::table
        .find(ids[0])
        .select(ingredient::name)
        .first(&mut conn)
        .unwrap();
    assert_eq!(name, "Flour");
    assert_eq!(upsert_ingredient(&mut conn, "FLOUR").unwrap(), ids[0]);

    let err = diesel::insert_into(ingredient::table)
        .values(NewIngredient { name: "FLOUR" })
        .execute(&mut conn)
        .unwrap_err();
    assert!(is_unique_violation(&err));
    assert_eq!(ApiError::from(err).to_string(), "Ingredient already exists");
}

#[test]
#[ignore]
fn self_follow_is_rejected_by_the_table() {
    let _guard = db_lock();
    let mut conn = test_connection();
    conn.begin_test_transaction().unwrap();

    let user = insert_user(&mut conn, "Narcissus", "n@example.com");
    let err = diesel::insert_into(followers::table)
        .values(NewFollower {
            user_id: user.id,
            follower_user_id: user.id,
        })
        .execute(&mut conn)
        .unwrap_err();

    assert!(matches!(
        err,
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _)
    ));
}

#[test]
#[ignore]
fn deleting_a_category_removes_its_sub_categories() {
    let _guard = db_lock();
    let mut conn = test_connection();
    conn.begin_test_transaction().unwrap();

    let category_id: i32 = diesel::insert_into(recipe_category::table)
        .values(NewRecipeCategory {
            name: "Desserts",
            description: None,
            image_url: None,
        })
        .returning(recipe_category::category_id)
        .get_result(&mut conn)
        .unwrap();
    diesel::insert_into(recipe_sub_category::table)
        .values(NewRecipeSubCategory {
            category_id,
            name: "Cakes",
            description: None,
        })
        .execute(&mut conn)
        .unwrap();

    diesel::delete(recipe_category::table.find(category_id))
        .execute(&mut conn)
        .unwrap();

    let remaining: i64 = recipe_sub_category::table
        .filter(recipe_sub_category::category_id.eq(category_id))
        .count()
        .get_result(&mut conn)
        .unwrap();
    assert_eq!(remaining, 0);
}

#[test]
#[ignore]
fn owned_files_are_removed_explicitly() {
    let _guard = db_lock();
    let mut conn = test_connection();
    conn.begin_test_transaction().unwrap();

    let user = insert_user(&mut conn, "Ada", "ada@example.com");
    let recipe = insert_recipe(&mut conn, user.id, "Bread");
    let owner = FileOwner::new(EntityKind::Recipe, recipe.recipe_id);
    store_file(&mut conn, owner, "loaf.png", "image/png", b"png").unwrap();
    let other = store_file(
        &mut conn,
        FileOwner::new(EntityKind::User, user.id),
        "me.png",
        "image/png",
        b"png",
    )
    .unwrap();

    assert_eq!(delete_owned_files(&mut conn, owner).unwrap(), 1);

    let left: Vec<i32> = file_storage::table
        .filter(file_storage::id.eq(other))
        .select(file_storage::id)
        .load(&mut conn)
        .unwrap();
    assert_eq!(left, vec![other]);
}
