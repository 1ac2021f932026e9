//! Storage Tests
//!
//! Covers how the services behave when the device store fails or holds
//! documents they cannot read, and persistence across reopening a file store.

mod common;

use common::{app, DEFAULT_PASSWORD};
use spinsocial::app::error::ErrorKind;
use spinsocial::app::users::NewUser;
use spinsocial::config::{AppConfig, StoreBackend};
use spinsocial::infra::store::KeyValueStore;
use spinsocial::AppState;

#[tokio::test]
async fn unreachable_store_is_reported_not_fatal() {
    let app = app();
    let session = app.create_user_and_login("store_down").await;
    app.backend.go_down();

    let err = app.state.users().list_users().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StorageUnavailable);

    let err = app
        .state
        .engagement()
        .toggle_like(&session, "p1")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::StorageUnavailable);

    app.backend.heal();
    assert_eq!(app.stored_users().await.len(), 1);
}

#[tokio::test]
async fn malformed_users_document_fails_login() {
    let app = app();
    app.backend
        .set("users", "{not json".to_string())
        .await
        .unwrap();

    let err = app
        .state
        .auth()
        .login("anyone", DEFAULT_PASSWORD)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDocument);
    assert_eq!(app.raw_text("users").await.as_deref(), Some("{not json"));
}

#[tokio::test]
async fn malformed_likes_leave_other_posts_working() {
    let app = app();
    let session = app.create_user_and_login("store_garbage").await;
    app.seed("post_likes_bad", serde_json::json!("nonsense")).await;
    let engagement = app.state.engagement();

    let err = engagement.toggle_like(&session, "bad").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedDocument);

    let status = engagement.toggle_like(&session, "good").await.unwrap();
    assert!(status.liked);
}

#[tokio::test]
async fn file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig {
        store_backend: StoreBackend::File,
        store_path: dir.path().to_path_buf(),
        ..AppConfig::default()
    };

    let state = AppState::open(&config).await.unwrap();
    let user = state
        .users()
        .register(NewUser {
            username: "persisted".to_string(),
            handle: "@persisted".to_string(),
            email: "persisted@example.com".to_string(),
            password: DEFAULT_PASSWORD.to_string(),
        })
        .await
        .unwrap();
    state.auth().login("persisted", DEFAULT_PASSWORD).await.unwrap();
    drop(state);

    let reopened = AppState::open(&config).await.unwrap();
    let session = reopened.auth().current_session().await.unwrap().unwrap();
    assert_eq!(session.user, user);
    assert_eq!(reopened.users().list_users().await.unwrap(), vec![user]);
}
