mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use bookstore_admin::models::book;
use common::{MultipartBody, body_json, dune_form, files_under, get, seed_references, setup_test_app};
use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait, Statement};
use tower::util::ServiceExt; // for `oneshot`

#[tokio::test]
async fn test_delete_unknown_book_returns_not_found() {
    let t = setup_test_app().await;
    let refs = seed_references(&t.db).await;
    t.app
        .clone()
        .oneshot(dune_form(&refs).into_request("/manage/book/create"))
        .await
        .unwrap();
    let before = book::Entity::find().all(&t.db).await.unwrap();

    let req = Request::builder()
        .uri("/manage/book/delete/999")
        .method("POST")
        .body(Body::empty())
        .unwrap();
    let response = t.app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let after = book::Entity::find().all(&t.db).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_delete_already_deleted_book_succeeds() {
    let t = setup_test_app().await;
    let refs = seed_references(&t.db).await;
    t.app
        .clone()
        .oneshot(dune_form(&refs).into_request("/manage/book/create"))
        .await
        .unwrap();
    let dune = book::Entity::find().one(&t.db).await.unwrap().unwrap();

    // The delete lookup ignores the soft-delete status
    for _ in 0..2 {
        let response = t
            .app
            .clone()
            .oneshot(get(&format!("/manage/book/delete/{}", dune.id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(book::Entity::find().count(&t.db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_edit_form_not_found() {
    let t = setup_test_app().await;
    let refs = seed_references(&t.db).await;

    let response = t.app.clone().oneshot(get("/manage/book/edit/999")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["view"], "Error");

    // Deleted books cannot be edited either
    t.app
        .clone()
        .oneshot(dune_form(&refs).into_request("/manage/book/create"))
        .await
        .unwrap();
    let dune = book::Entity::find().one(&t.db).await.unwrap().unwrap();
    t.app
        .clone()
        .oneshot(get(&format!("/manage/book/delete/{}", dune.id)))
        .await
        .unwrap();

    let response = t
        .app
        .clone()
        .oneshot(get(&format!("/manage/book/edit/{}", dune.id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_edit_submit_echoes_without_persisting() {
    let t = setup_test_app().await;
    let refs = seed_references(&t.db).await;

    let form = dune_form(&refs).text("tag_ids", "77");
    let response = t
        .app
        .clone()
        .oneshot(form.into_request("/manage/book/edit"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["name"], "Dune");
    assert_eq!(json["tag_ids"], serde_json::json!(["77"]));
    assert_eq!(json["poster_file"]["file_name"], "dune.jpg");
    assert_eq!(json["poster_file"]["size"], 500 * 1024);

    assert_eq!(book::Entity::find().count(&t.db).await.unwrap(), 0);
    assert!(files_under(t.uploads.path()).is_empty());
}

#[tokio::test]
async fn test_failed_insert_leaves_no_rows_and_no_files() {
    let t = setup_test_app().await;
    let refs = seed_references(&t.db).await;

    // Image rows can no longer be written, the book row itself still can
    t.db.execute(Statement::from_string(
        t.db.get_database_backend(),
        "DROP TABLE book_images".to_owned(),
    ))
    .await
    .unwrap();

    let form = dune_form(&refs).file("image_files", "g.jpg", "image/jpeg", &[0u8; 64]);
    let response = t
        .app
        .clone()
        .oneshot(form.into_request("/manage/book/create"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = body_json(response).await;
    assert_eq!(json["error"], "Internal server error");

    assert_eq!(book::Entity::find().count(&t.db).await.unwrap(), 0);
    assert!(files_under(t.uploads.path()).is_empty());
}

#[tokio::test]
async fn test_create_without_multipart_is_bad_request() {
    let t = setup_test_app().await;

    let req = Request::builder()
        .uri("/manage/book/create")
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"name":"Dune"}"#))
        .unwrap();
    let response = t.app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_form_fields_are_ignored() {
    let t = setup_test_app().await;
    let refs = seed_references(&t.db).await;

    let form = dune_form(&refs)
        .text("bookImageIds", "3")
        .file("attachment", "x.bin", "application/octet-stream", &[1u8; 8]);
    let response = t
        .app
        .clone()
        .oneshot(form.into_request("/manage/book/create"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(files_under(t.uploads.path()).len(), 2);

    let nameless = MultipartBody::new().text("desc", "No name");
    let response = t
        .app
        .clone()
        .oneshot(nameless.into_request("/manage/book/create"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_health_check() {
    let t = setup_test_app().await;

    let response = t.app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}
