mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use blog_api::database::models::post::NewPost;
use blog_api::database::models::{Post, User};
use blog_api::database::store::BlogStore;
use blog_api::database::MemoryStore;

use common::{bearer, get, get_auth, post_form, send, test_app};

async fn seed_post(store: &Arc<MemoryStore>, author_id: i64, title: &str) -> Post {
    store
        .create_post(NewPost {
            title: title.to_string(),
            hook_text: String::new(),
            content: format!("{} content", title),
            head_image: None,
            file_upload: None,
            author_id,
            category_id: None,
        })
        .await
        .unwrap()
}

async fn staff_user(store: &Arc<MemoryStore>) -> User {
    store.create_user("kim", true, false).await.unwrap()
}

#[tokio::test]
async fn anonymous_create_form_redirects_to_the_list() {
    let (app, _store) = test_app();

    let (status, location, _) = send(&app, get("/blog/create_post/")).await;
    assert!(status.is_redirection());
    assert_eq!(location.as_deref(), Some("/blog/"));
}

#[tokio::test]
async fn regular_user_create_attempt_redirects_without_persisting() {
    let (app, store) = test_app();
    let plain = store.create_user("lee", false, false).await.unwrap();

    let (status, location, _) = send(
        &app,
        post_form(
            "/blog/create_post/",
            Some(&bearer(&plain)),
            "title=Sneaky&content=nope",
        ),
    )
    .await;

    // Rejected creates redirect; they are not surfaced as errors
    assert!(status.is_redirection());
    assert_eq!(location.as_deref(), Some("/blog/"));
    assert_eq!(store.count_posts().await.unwrap(), 0);
}

#[tokio::test]
async fn staff_create_persists_with_requester_as_author() {
    let (app, store) = test_app();
    let staff = staff_user(&store).await;

    let (status, location, _) = send(
        &app,
        post_form(
            "/blog/create_post/",
            Some(&bearer(&staff)),
            "title=First&hook_text=teaser&content=Hello",
        ),
    )
    .await;

    assert!(status.is_redirection());
    assert_eq!(location.as_deref(), Some("/blog/1/"));

    let post = store.post_by_id(1).await.unwrap().unwrap();
    assert_eq!(post.title, "First");
    assert_eq!(post.author_id, staff.id);
}

#[tokio::test]
async fn superuser_may_also_create() {
    let (app, store) = test_app();
    let root = store.create_user("root", false, true).await.unwrap();

    let (status, _, _) = send(
        &app,
        post_form(
            "/blog/create_post/",
            Some(&bearer(&root)),
            "title=Ok&content=fine",
        ),
    )
    .await;
    assert!(status.is_redirection());
    assert_eq!(store.count_posts().await.unwrap(), 1);
}

#[tokio::test]
async fn create_parses_and_deduplicates_the_tag_string() {
    let (app, store) = test_app();
    let staff = staff_user(&store).await;

    // "go; rust,  go" - mixed separators, stray whitespace, one duplicate
    let (status, _, _) = send(
        &app,
        post_form(
            "/blog/create_post/",
            Some(&bearer(&staff)),
            "title=Tagged&content=body&tags_str=go%3B+rust%2C++go",
        ),
    )
    .await;
    assert!(status.is_redirection());

    let tags = store.tags_for_post(1).await.unwrap();
    let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["go", "rust"]);
    assert!(tags.iter().all(|t| !t.slug.is_empty()));
}

#[tokio::test]
async fn non_author_update_is_forbidden_even_for_superusers() {
    let (app, store) = test_app();
    let author = staff_user(&store).await;
    let other = store.create_user("root", true, true).await.unwrap();
    seed_post(&store, author.id, "Original").await;

    let (status, _, body) = send(
        &app,
        post_form(
            "/blog/update_post/1/",
            Some(&bearer(&other)),
            "title=Hijacked&content=changed",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
    let post = store.post_by_id(1).await.unwrap().unwrap();
    assert_eq!(post.title, "Original");
}

#[tokio::test]
async fn anonymous_update_is_forbidden() {
    let (app, store) = test_app();
    let author = staff_user(&store).await;
    seed_post(&store, author.id, "Original").await;

    let (status, _, _) = send(
        &app,
        post_form("/blog/update_post/1/", None, "title=Nope&content=nope"),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn author_update_changes_fields_but_never_the_author() {
    let (app, store) = test_app();
    let author = staff_user(&store).await;
    seed_post(&store, author.id, "Original").await;

    let (status, location, _) = send(
        &app,
        post_form(
            "/blog/update_post/1/",
            Some(&bearer(&author)),
            "title=Edited&hook_text=new+teaser&content=new+body",
        ),
    )
    .await;

    assert!(status.is_redirection());
    assert_eq!(location.as_deref(), Some("/blog/1/"));

    let post = store.post_by_id(1).await.unwrap().unwrap();
    assert_eq!(post.title, "Edited");
    assert_eq!(post.hook_text, "new teaser");
    assert_eq!(post.author_id, author.id);
}

#[tokio::test]
async fn updating_tags_twice_keeps_only_the_second_set() {
    let (app, store) = test_app();
    let author = staff_user(&store).await;
    seed_post(&store, author.id, "Original").await;

    send(
        &app,
        post_form(
            "/blog/update_post/1/",
            Some(&bearer(&author)),
            "title=Original&content=body&tags_str=go%3B+rust",
        ),
    )
    .await;
    send(
        &app,
        post_form(
            "/blog/update_post/1/",
            Some(&bearer(&author)),
            "title=Original&content=body&tags_str=python",
        ),
    )
    .await;

    let tags = store.tags_for_post(1).await.unwrap();
    let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["python"]);
}

#[tokio::test]
async fn update_form_prefills_fields_and_tag_string() {
    let (app, store) = test_app();
    let author = staff_user(&store).await;
    let post = seed_post(&store, author.id, "Original").await;
    store
        .replace_post_tags(post.id, &["go".to_string(), "rust".to_string()])
        .await
        .unwrap();

    let (status, _, body) = send(&app, get_auth("/blog/update_post/1/", &bearer(&author))).await;
    assert_eq!(status, StatusCode::OK);
    let form = &body["data"]["form"];
    assert_eq!(form["title"], "Original");
    assert_eq!(form["tags_str"], "go; rust");
}

#[tokio::test]
async fn updating_a_missing_post_is_404() {
    let (app, store) = test_app();
    let author = staff_user(&store).await;

    let (status, _, _) = send(
        &app,
        post_form(
            "/blog/update_post/9/",
            Some(&bearer(&author)),
            "title=x&content=y",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_bearer_token_is_rejected() {
    let (app, _store) = test_app();

    let (status, _, body) = send(
        &app,
        post_form(
            "/blog/create_post/",
            Some("Bearer garbage"),
            "title=x&content=y",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}
