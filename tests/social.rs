//! Social Graph Tests
//!
//! Covers the one-directional friend lists.

mod common;

use common::app;
use serde_json::json;
use spinsocial::app::error::ErrorKind;
use spinsocial::app::social::filter_friends;

#[tokio::test]
async fn add_friend_is_one_directional() {
    let app = app();
    let friend = app.create_user("buddy").await;
    let session = app.create_user_and_login("me_social").await;
    let social = app.state.social();

    assert!(social.add_friend(&session, &friend.id).await.unwrap());

    let stored = app.raw(&format!("friends_{}", session.user_id())).await.unwrap();
    assert_eq!(
        stored,
        json!([{"id": friend.id, "username": "buddy", "handle": "@buddy", "profileImage": null}])
    );
    assert!(social.list_friends(&friend.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn adding_twice_keeps_one_entry() {
    let app = app();
    let friend = app.create_user("buddy_twice").await;
    let session = app.create_user_and_login("me_twice").await;
    let social = app.state.social();

    assert!(social.add_friend(&session, &friend.id).await.unwrap());
    assert!(!social.add_friend(&session, &friend.id).await.unwrap());
    assert_eq!(social.list_friends(session.user_id()).await.unwrap().len(), 1);
}

#[tokio::test]
async fn cannot_befriend_self_or_unknown() {
    let app = app();
    let session = app.create_user_and_login("me_alone").await;
    let social = app.state.social();

    let err = social.add_friend(&session, session.user_id()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValidationFailed);

    let err = social.add_friend(&session, "ghost").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.message(), "User not found");

    assert!(app.raw(&format!("friends_{}", session.user_id())).await.is_none());
}

#[tokio::test]
async fn remove_friend() {
    let app = app();
    let friend = app.create_user("buddy_gone").await;
    let session = app.create_user_and_login("me_remove").await;
    let social = app.state.social();
    social.add_friend(&session, &friend.id).await.unwrap();

    assert!(social.remove_friend(&session, &friend.id).await.unwrap());
    assert!(!social.remove_friend(&session, &friend.id).await.unwrap());
    assert!(social.list_friends(session.user_id()).await.unwrap().is_empty());
}

#[tokio::test]
async fn stored_friends_can_be_filtered() {
    let app = app();
    let a = app.create_user("alpha").await;
    let b = app.create_user("beta").await;
    let session = app.create_user_and_login("me_filter").await;
    let social = app.state.social();
    social.add_friend(&session, &a.id).await.unwrap();
    social.add_friend(&session, &b.id).await.unwrap();

    let friends = social.list_friends(session.user_id()).await.unwrap();
    let hits = filter_friends(&friends, "ALP");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, a.id);
}
