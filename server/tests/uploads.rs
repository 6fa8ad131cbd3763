//! Upload handling against a real PostgreSQL database.
//!
//! Run with `TEST_DATABASE_URL=postgres://... cargo test -- --ignored`.

mod common;

use axum::body::{Body, Bytes};
use axum::http::{header, Request, StatusCode};
use common::{db_lock, insert_user, test_connection, TEST_SECRET};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use recipebox_server::auth::issue_token;
use recipebox_server::config::Config;
use recipebox_server::files::{delete_owned_files, EntityKind, FileOwner};
use recipebox_server::schema::users;
use recipebox_server::{app, AppState};
use std::env;
use std::time::Duration;
use time::OffsetDateTime;
use tokio_stream::wrappers::ReceiverStream;
use tower::ServiceExt;

const EMAIL: &str = "slow-uploader@example.com";
const BOUNDARY: &str = "recipebox-boundary";
const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

/// State backed by a single-connection pool, so a request that keeps its
/// connection blocks every other request.
fn single_connection_state() -> AppState {
    let url = env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set");
    let pool = Pool::builder()
        .max_size(1)
        .connection_timeout(Duration::from_secs(2))
        .build(ConnectionManager::<PgConnection>::new(url.clone()))
        .expect("build pool");

    AppState::new(
        pool,
        Config {
            database_url: url,
            bind_addr: "127.0.0.1:0".to_string(),
            jwt_secret: Some(TEST_SECRET.to_string()),
            public_url: "http://localhost:3000".to_string(),
        },
    )
}

#[tokio::test(flavor = "multi_thread")]
#[ignore]
async fn pending_upload_does_not_hold_a_pooled_connection() {
    let _guard = db_lock();
    let mut conn = test_connection();
    diesel::delete(users::table.filter(users::email.eq(EMAIL)))
        .execute(&mut conn)
        .unwrap();
    let user = insert_user(&mut conn, "Uploader", EMAIL);
    let issued = issue_token(&user, Some(TEST_SECRET), OffsetDateTime::now_utc()).unwrap();

    let app = app(single_connection_state());

    let (tx, rx) = tokio::sync::mpsc::channel::<Result<Bytes, std::io::Error>>(4);
    tx.send(Ok(Bytes::from(format!(
        "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"pic.png\"\r\n\
         Content-Type: image/png\r\n\r\n",
        BOUNDARY
    ))))
    .await
    .unwrap();

    let request = Request::post(format!("/api/files?owner=user&owner_id={}", user.id))
        .header(header::COOKIE, format!("token={}", issued.token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from_stream(ReceiverStream::new(rx)))
        .unwrap();
    let upload = tokio::spawn(app.clone().oneshot(request));

    // Let the upload get past authorization and park on the unfinished body
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(!upload.is_finished());

    let listed = tokio::time::timeout(
        Duration::from_secs(5),
        app.clone()
            .oneshot(Request::get("/api/categories").body(Body::empty()).unwrap()),
    )
    .await
    .expect("categories request starved while the upload was pending")
    .unwrap();
    assert_eq!(listed.status(), StatusCode::OK);

    tx.send(Ok(Bytes::from_static(PNG_SIGNATURE))).await.unwrap();
    tx.send(Ok(Bytes::from(format!("\r\n--{}--\r\n", BOUNDARY))))
        .await
        .unwrap();
    drop(tx);

    let response = upload.await.unwrap().unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    delete_owned_files(&mut conn, FileOwner::new(EntityKind::User, user.id)).unwrap();
    diesel::delete(users::table.find(user.id))
        .execute(&mut conn)
        .unwrap();
}
