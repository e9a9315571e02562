#[macro_use]
mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use common::{bearer, MemoryStore};
use serde_json::{json, Value};

#[actix_web::test]
async fn comments_are_scoped_to_their_post() {
    let store = MemoryStore::default();
    let alice = store.add_user("alice");
    let first = store.add_post(&alice, "first");
    let second = store.add_post(&alice, "second");
    let app = app!(store);

    for (post, text) in [(&first, "on first"), (&second, "on second"), (&first, "again")] {
        let req = test::TestRequest::post()
            .uri(&format!("/api/v1/posts/{}/comments/", post.id))
            .insert_header(bearer(&alice))
            .set_json(json!({ "text": text, "post": 12345 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["post"], post.id);
        assert_eq!(body["author"], "alice");
    }

    let listed: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/posts/{}/comments/", first.id))
            .to_request(),
    )
    .await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|c| c["post"] == first.id));
    assert_eq!(listed[0]["text"], "on first");
    assert_eq!(listed[1]["text"], "again");
}

#[actix_web::test]
async fn comment_is_not_reachable_through_another_post() {
    let store = MemoryStore::default();
    let alice = store.add_user("alice");
    let first = store.add_post(&alice, "first");
    let second = store.add_post(&alice, "second");
    let app = app!(store);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/posts/{}/comments/", first.id))
        .insert_header(bearer(&alice))
        .set_json(json!({ "text": "hello" }))
        .to_request();
    let comment: Value = test::call_and_read_body_json(&app, req).await;

    let ok = format!("/api/v1/posts/{}/comments/{}/", first.id, comment["id"]);
    let resp = test::call_service(&app, test::TestRequest::get().uri(&ok).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let wrong = format!("/api/v1/posts/{}/comments/{}/", second.id, comment["id"]);
    let resp = test::call_service(&app, test::TestRequest::get().uri(&wrong).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri(&wrong)
        .insert_header(bearer(&alice))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(store.comments().len(), 1);
}

#[actix_web::test]
async fn unknown_parent_post_is_not_found() {
    let store = MemoryStore::default();
    let alice = store.add_user("alice");
    let app = app!(store);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/posts/404/comments/")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/api/v1/posts/404/comments/")
        .insert_header(bearer(&alice))
        .set_json(json!({ "text": "orphan" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(store.comments().is_empty());
}

#[actix_web::test]
async fn only_the_comment_author_may_modify_it() {
    let store = MemoryStore::default();
    let alice = store.add_user("alice");
    let bob = store.add_user("bob");
    // Bob comments on Alice's post; the post author has no say over the comment.
    let post = store.add_post(&alice, "alice's post");
    let app = app!(store);

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/posts/{}/comments/", post.id))
        .insert_header(bearer(&bob))
        .set_json(json!({ "text": "bob was here" }))
        .to_request();
    let comment: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/api/v1/posts/{}/comments/{}/", post.id, comment["id"]);

    let req = test::TestRequest::patch()
        .uri(&uri)
        .insert_header(bearer(&alice))
        .set_json(json!({ "text": "edited by alice" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(bearer(&alice))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(store.comments()[0].text, "bob was here");

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(bearer(&alice))
        .set_json(json!({ "text": 5 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/posts/{}/comments/999/", post.id))
        .insert_header(bearer(&bob))
        .set_json(json!({ "text": 5 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::put()
        .uri(&uri)
        .insert_header(bearer(&bob))
        .set_json(json!({ "text": "bob edited" }))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["text"], "bob edited");

    let req = test::TestRequest::delete()
        .uri(&uri)
        .insert_header(bearer(&bob))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(store.comments().is_empty());
}

#[actix_web::test]
async fn anonymous_and_blank_comments_are_rejected() {
    let store = MemoryStore::default();
    let alice = store.add_user("alice");
    let post = store.add_post(&alice, "post");
    let app = app!(store);
    let uri = format!("/api/v1/posts/{}/comments/", post.id);

    let req = test::TestRequest::post()
        .uri(&uri)
        .set_json(json!({ "text": "anon" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(bearer(&alice))
        .set_json(json!({ "text": "" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(store.comments().is_empty());
}
