mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use blog_api::database::models::post::NewPost;
use blog_api::database::models::{Post, User};
use blog_api::database::store::BlogStore;
use blog_api::database::MemoryStore;

use common::{bearer, get, get_auth, post_form, send, test_app};

async fn seed(store: &Arc<MemoryStore>) -> (User, Post) {
    let author = store.create_user("kim", true, false).await.unwrap();
    let post = store
        .create_post(NewPost {
            title: "First post".to_string(),
            hook_text: String::new(),
            content: "content".to_string(),
            head_image: None,
            file_upload: None,
            author_id: author.id,
            category_id: None,
        })
        .await
        .unwrap();
    (author, post)
}

#[tokio::test]
async fn unauthenticated_comment_post_is_forbidden() {
    let (app, store) = seed_app().await;

    let (status, _, body) = send(
        &app,
        post_form("/blog/1/new_comment/", None, "content=first%21"),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
    assert!(store.comments_for_post(1).await.unwrap().is_empty());
}

#[tokio::test]
async fn get_on_new_comment_redirects_to_detail_without_creating() {
    let (app, store) = seed_app().await;
    let lee = store.create_user("lee", false, false).await.unwrap();

    let (status, location, _) = send(&app, get_auth("/blog/1/new_comment/", &bearer(&lee))).await;
    assert!(status.is_redirection());
    assert_eq!(location.as_deref(), Some("/blog/1/"));
    assert!(store.comments_for_post(1).await.unwrap().is_empty());

    // Same redirect for anonymous readers
    let (status, location, _) = send(&app, get("/blog/1/new_comment/")).await;
    assert!(status.is_redirection());
    assert_eq!(location.as_deref(), Some("/blog/1/"));
}

#[tokio::test]
async fn authenticated_comment_lands_on_its_anchor() {
    let (app, store) = seed_app().await;
    let lee = store.create_user("lee", false, false).await.unwrap();

    let (status, location, _) = send(
        &app,
        post_form(
            "/blog/1/new_comment/",
            Some(&bearer(&lee)),
            "content=great+read",
        ),
    )
    .await;

    assert!(status.is_redirection());
    assert_eq!(location.as_deref(), Some("/blog/1/#comment-1"));

    let comments = store.comments_for_post(1).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].content, "great read");
    assert_eq!(comments[0].author_id, lee.id);
}

#[tokio::test]
async fn commenting_on_a_missing_post_is_404() {
    let (app, store) = test_app();
    let lee = store.create_user("lee", false, false).await.unwrap();

    let (status, _, _) = send(
        &app,
        post_form("/blog/9/new_comment/", Some(&bearer(&lee)), "content=hi"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn only_the_comment_author_may_update_it() {
    let (app, store) = seed_app().await;
    let lee = store.create_user("lee", false, false).await.unwrap();
    let park = store.create_user("park", false, false).await.unwrap();
    store.create_comment(1, lee.id, "original").await.unwrap();

    let (status, _, _) = send(
        &app,
        post_form(
            "/blog/update_comment/1/",
            Some(&bearer(&park)),
            "content=hijacked",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, _) = send(
        &app,
        post_form("/blog/update_comment/1/", None, "content=hijacked"),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let comment = store.comment_by_id(1).await.unwrap().unwrap();
    assert_eq!(comment.content, "original");
}

#[tokio::test]
async fn author_comment_update_persists_and_redirects_to_the_anchor() {
    let (app, store) = seed_app().await;
    let lee = store.create_user("lee", false, false).await.unwrap();
    store.create_comment(1, lee.id, "original").await.unwrap();

    let (status, location, _) = send(
        &app,
        post_form(
            "/blog/update_comment/1/",
            Some(&bearer(&lee)),
            "content=edited",
        ),
    )
    .await;

    assert!(status.is_redirection());
    assert_eq!(location.as_deref(), Some("/blog/1/#comment-1"));
    let comment = store.comment_by_id(1).await.unwrap().unwrap();
    assert_eq!(comment.content, "edited");
}

#[tokio::test]
async fn comment_update_form_prefills_existing_content() {
    let (app, store) = seed_app().await;
    let lee = store.create_user("lee", false, false).await.unwrap();
    store.create_comment(1, lee.id, "original").await.unwrap();

    let (status, _, body) = send(&app, get_auth("/blog/update_comment/1/", &bearer(&lee))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["form"]["content"], "original");
    assert_eq!(body["data"]["post_id"], 1);
}

/// App plus a seeded author and post
async fn seed_app() -> (axum::Router, Arc<MemoryStore>) {
    let (app, store) = test_app();
    seed(&store).await;
    (app, store)
}
