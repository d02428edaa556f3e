// Integration tests for the photo store and its ownership policy.
// Run with: cargo test --test store_test

mod common;

use common::{fresh_pool, seed_photo, seed_user};
use photogram::db::DbPool;
use photogram::entities::{comment, like, photo};
use photogram::errors::{StoreError, ValidationErrors, ValidationKind};
use photogram::services::photos::PhotoChanges;
use photogram::services::users::NewUser;
use photogram::services::{comments, feed, likes, photos, policy, users};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

fn expect_validation(err: StoreError) -> ValidationErrors {
    match err {
        StoreError::Validation(errors) => errors,
        other => panic!("expected a validation error, got {:?}", other),
    }
}

async fn comment_count(db: &DbPool, photo_id: i64) -> u64 {
    comment::Entity::find()
        .filter(comment::Column::PhotoId.eq(photo_id))
        .count(db)
        .await
        .unwrap()
}

async fn like_count(db: &DbPool, photo_id: i64) -> u64 {
    like::Entity::find()
        .filter(like::Column::PhotoId.eq(photo_id))
        .count(db)
        .await
        .unwrap()
}

#[actix_web::test]
async fn test_create_user_rejects_blank_and_duplicate_fields() {
    let db = fresh_pool().await;
    seed_user(&db, "alice").await;

    let err = users::create_user(
        &db,
        NewUser {
            email: "alice@m.com".to_string(),
            username: "alice".to_string(),
            password_hash: "x".to_string(),
        },
    )
    .await
    .unwrap_err();
    let errors = expect_validation(err);
    assert!(errors.has("email", ValidationKind::Taken));
    assert!(errors.has("username", ValidationKind::Taken));

    let err = users::create_user(
        &db,
        NewUser {
            email: "not-an-email".to_string(),
            username: "  ".to_string(),
            password_hash: "x".to_string(),
        },
    )
    .await
    .unwrap_err();
    let errors = expect_validation(err);
    assert!(errors.has("email", ValidationKind::Invalid));
    assert!(errors.has("username", ValidationKind::Blank));

    assert_eq!(users::list_users(&db).await.unwrap().len(), 1);
}

#[actix_web::test]
async fn test_find_user_reports_missing_id() {
    let db = fresh_pool().await;
    let alice = seed_user(&db, "alice").await;

    let found = users::find_user(&db, alice.id).await.unwrap();
    assert_eq!(found.username, "alice");
    assert_eq!(found.email, "alice@m.com");

    match users::find_user(&db, alice.id + 100).await {
        Err(StoreError::NotFound { resource, .. }) => assert_eq!(resource, "user"),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[actix_web::test]
async fn test_create_photo_requires_owner_and_image() {
    let db = fresh_pool().await;

    let err = photos::create_photo(&db, 999, "   ", None).await.unwrap_err();
    let errors = expect_validation(err);
    assert!(errors.has("user", ValidationKind::Missing));
    assert!(errors.has("image", ValidationKind::Blank));

    assert_eq!(photo::Entity::find().count(&db).await.unwrap(), 0);
}

#[actix_web::test]
async fn test_create_comment_requires_author_photo_and_body() {
    let db = fresh_pool().await;
    let alice = seed_user(&db, "alice").await;
    let photo = seed_photo(&db, &alice, "https://img.example.com/a.jpg").await;

    let err = comments::create_comment(&db, alice.id, photo.id, "  ")
        .await
        .unwrap_err();
    assert!(expect_validation(err).has("body", ValidationKind::Blank));

    let err = comments::create_comment(&db, alice.id, photo.id + 1, "nice")
        .await
        .unwrap_err();
    assert!(expect_validation(err).has("photo", ValidationKind::Missing));

    let err = comments::create_comment(&db, alice.id + 1, photo.id, "nice")
        .await
        .unwrap_err();
    assert!(expect_validation(err).has("user", ValidationKind::Missing));

    assert_eq!(comment::Entity::find().count(&db).await.unwrap(), 0);

    let created = comments::create_comment(&db, alice.id, photo.id, "nice")
        .await
        .unwrap();
    assert_eq!(created.author.username, "alice");
    assert_eq!(created.body, "nice");
}

#[actix_web::test]
async fn test_like_twice_keeps_single_row_and_unlike_removes_it() {
    let db = fresh_pool().await;
    let owner = seed_user(&db, "owner").await;
    let fan = seed_user(&db, "fan").await;
    let photo = seed_photo(&db, &owner, "https://img.example.com/p.jpg").await;

    let first = likes::create_like(&db, fan.id, photo.id).await.unwrap();

    let err = likes::create_like(&db, fan.id, photo.id).await.unwrap_err();
    assert!(expect_validation(err).has("photo", ValidationKind::Taken));
    assert_eq!(like_count(&db, photo.id).await, 1);

    likes::delete_like(&db, first.id, fan.id).await.unwrap();
    assert_eq!(like_count(&db, photo.id).await, 0);
}

#[actix_web::test]
async fn test_concurrent_duplicate_likes_create_one_row() {
    let db = fresh_pool().await;
    let owner = seed_user(&db, "owner").await;
    let fan = seed_user(&db, "fan").await;
    let photo = seed_photo(&db, &owner, "https://img.example.com/p.jpg").await;

    let (a, b) = futures::join!(
        likes::create_like(&db, fan.id, photo.id),
        likes::create_like(&db, fan.id, photo.id)
    );

    assert_eq!(
        [a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(),
        1,
        "exactly one of two racing likes should succeed"
    );
    assert_eq!(like_count(&db, photo.id).await, 1);
}

#[actix_web::test]
async fn test_like_requires_existing_photo() {
    let db = fresh_pool().await;
    let fan = seed_user(&db, "fan").await;

    let err = likes::create_like(&db, fan.id, 12345).await.unwrap_err();
    assert!(expect_validation(err).has("photo", ValidationKind::Missing));
    assert_eq!(like::Entity::find().count(&db).await.unwrap(), 0);
}

#[actix_web::test]
async fn test_only_liker_can_delete_like() {
    let db = fresh_pool().await;
    let owner = seed_user(&db, "owner").await;
    let fan = seed_user(&db, "fan").await;
    let photo = seed_photo(&db, &owner, "https://img.example.com/p.jpg").await;
    let like = likes::create_like(&db, fan.id, photo.id).await.unwrap();

    match likes::delete_like(&db, like.id, owner.id).await {
        Err(StoreError::Forbidden { resource, id, .. }) => {
            assert_eq!(resource, "like");
            assert_eq!(id, like.id);
        }
        other => panic!("expected Forbidden, got {:?}", other),
    }
    assert_eq!(like_count(&db, photo.id).await, 1);

    match likes::delete_like(&db, like.id + 1, fan.id).await {
        Err(StoreError::NotFound { resource, .. }) => assert_eq!(resource, "like"),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[actix_web::test]
async fn test_delete_photo_by_other_user_is_rejected() {
    let db = fresh_pool().await;
    let a = seed_user(&db, "a").await;
    let b = seed_user(&db, "b").await;
    let photo = seed_photo(&db, &a, "https://img.example.com/a.jpg").await;
    comments::create_comment(&db, b.id, photo.id, "hi").await.unwrap();

    match photos::delete_photo(&db, photo.id, b.id).await {
        Err(StoreError::Forbidden { user_id, resource, .. }) => {
            assert_eq!(user_id, b.id);
            assert_eq!(resource, "photo");
        }
        other => panic!("expected Forbidden, got {:?}", other),
    }

    assert!(photo::Entity::find_by_id(photo.id)
        .one(&db)
        .await
        .unwrap()
        .is_some());
    assert_eq!(comment_count(&db, photo.id).await, 1);
}

#[actix_web::test]
async fn test_delete_photo_cascades_only_to_its_own_dependents() {
    let db = fresh_pool().await;
    let a = seed_user(&db, "a").await;
    let b = seed_user(&db, "b").await;
    let doomed = seed_photo(&db, &a, "https://img.example.com/doomed.jpg").await;
    let kept = seed_photo(&db, &a, "https://img.example.com/kept.jpg").await;

    for photo_id in [doomed.id, kept.id] {
        comments::create_comment(&db, a.id, photo_id, "mine").await.unwrap();
        comments::create_comment(&db, b.id, photo_id, "theirs").await.unwrap();
        likes::create_like(&db, a.id, photo_id).await.unwrap();
        likes::create_like(&db, b.id, photo_id).await.unwrap();
    }

    photos::delete_photo(&db, doomed.id, a.id).await.unwrap();

    assert!(photo::Entity::find_by_id(doomed.id)
        .one(&db)
        .await
        .unwrap()
        .is_none());
    assert_eq!(comment_count(&db, doomed.id).await, 0);
    assert_eq!(like_count(&db, doomed.id).await, 0);

    assert_eq!(comment_count(&db, kept.id).await, 2);
    assert_eq!(like_count(&db, kept.id).await, 2);

    match photos::delete_photo(&db, doomed.id, a.id).await {
        Err(StoreError::NotFound { resource, id }) => {
            assert_eq!(resource, "photo");
            assert_eq!(id, doomed.id);
        }
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[actix_web::test]
async fn test_policy_matches_ownership() {
    let db = fresh_pool().await;
    let a = seed_user(&db, "a").await;
    let b = seed_user(&db, "b").await;
    let photo = seed_photo(&db, &a, "https://img.example.com/a.jpg").await;

    assert!(policy::can_edit(&photo, a.id));
    assert!(policy::can_delete(&photo, a.id));
    assert!(!policy::can_edit(&photo, b.id));
    assert!(!policy::can_delete(&photo, b.id));
}

#[actix_web::test]
async fn test_update_photo_enforces_ownership_and_presence() {
    let db = fresh_pool().await;
    let a = seed_user(&db, "a").await;
    let b = seed_user(&db, "b").await;
    let photo = seed_photo(&db, &a, "https://img.example.com/old.jpg").await;

    let err = photos::update_photo(
        &db,
        photo.id,
        b.id,
        PhotoChanges {
            image: Some("https://img.example.com/hijack.jpg".to_string()),
            caption: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, StoreError::Forbidden { .. }));

    let err = photos::update_photo(
        &db,
        photo.id,
        a.id,
        PhotoChanges {
            image: Some(" ".to_string()),
            caption: None,
        },
    )
    .await
    .unwrap_err();
    assert!(expect_validation(err).has("image", ValidationKind::Blank));

    let updated = photos::update_photo(
        &db,
        photo.id,
        a.id,
        PhotoChanges {
            image: None,
            caption: Some("Golden hour".to_string()),
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.image, "https://img.example.com/old.jpg");
    assert_eq!(updated.caption.as_deref(), Some("Golden hour"));
}

#[actix_web::test]
async fn test_feed_lists_comments_with_authors_in_order() {
    let db = fresh_pool().await;
    let one = seed_user(&db, "1").await;
    let two = seed_user(&db, "2").await;
    let three = seed_user(&db, "Three").await;
    let photo = seed_photo(&db, &three, "https://img.example.com/3.jpg").await;

    comments::create_comment(&db, one.id, photo.id, "comment_1").await.unwrap();
    comments::create_comment(&db, two.id, photo.id, "comment_two").await.unwrap();

    let feed = feed::list_feed(&db, Some(three.id), 1, 20).await.unwrap();
    assert_eq!(feed.len(), 1);

    let item = &feed[0];
    assert_eq!(item.owner.username, "Three");
    let bodies: Vec<(&str, &str)> = item
        .comments
        .iter()
        .map(|c| (c.author.username.as_str(), c.body.as_str()))
        .collect();
    assert_eq!(bodies, vec![("1", "comment_1"), ("2", "comment_two")]);

    let listed = comments::list_comments(&db, photo.id).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].author.username, "1");
    assert_eq!(listed[1].author.username, "2");
}

#[actix_web::test]
async fn test_feed_reports_likes_and_permissions_for_viewer() {
    let db = fresh_pool().await;
    let user_1 = seed_user(&db, "user_1").await;
    let user_2 = seed_user(&db, "user_2").await;
    let older = seed_photo(&db, &user_2, "https://img.example.com/older.jpg").await;
    let newer = seed_photo(&db, &user_2, "https://img.example.com/newer.jpg").await;

    let like = likes::create_like(&db, user_1.id, older.id).await.unwrap();
    likes::create_like(&db, user_2.id, newer.id).await.unwrap();

    let feed = feed::list_feed(&db, Some(user_1.id), 1, 20).await.unwrap();
    let ids: Vec<i64> = feed.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![newer.id, older.id], "newest photo comes first");

    let newer_item = &feed[0];
    assert_eq!(newer_item.like_count, 1);
    assert!(!newer_item.liked_by_viewer);
    assert_eq!(newer_item.viewer_like_id, None);
    assert!(!newer_item.can_edit);
    assert!(!newer_item.can_delete);

    let older_item = &feed[1];
    assert_eq!(older_item.like_count, 1);
    assert!(older_item.liked_by_viewer);
    assert_eq!(older_item.viewer_like_id, Some(like.id));

    let owner_view = feed::find_photo(&db, newer.id, Some(user_2.id)).await.unwrap();
    assert!(owner_view.can_edit);
    assert!(owner_view.can_delete);
    assert!(owner_view.liked_by_viewer);

    let anonymous = feed::list_feed(&db, None, 1, 20).await.unwrap();
    assert!(anonymous.iter().all(|p| !p.liked_by_viewer && !p.can_delete));
}

#[actix_web::test]
async fn test_feed_pagination() {
    let db = fresh_pool().await;
    let owner = seed_user(&db, "owner").await;
    for i in 0..5 {
        seed_photo(&db, &owner, &format!("https://img.example.com/{}.jpg", i)).await;
    }

    let first = feed::list_feed(&db, None, 1, 2).await.unwrap();
    let third = feed::list_feed(&db, None, 3, 2).await.unwrap();
    let beyond = feed::list_feed(&db, None, 4, 2).await.unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(first[0].image, "https://img.example.com/4.jpg");
    assert_eq!(third.len(), 1);
    assert_eq!(third[0].image, "https://img.example.com/0.jpg");
    assert!(beyond.is_empty());
}

#[actix_web::test]
async fn test_fans_are_users_who_liked_the_photo() {
    let db = fresh_pool().await;
    let owner = seed_user(&db, "owner").await;
    let bob = seed_user(&db, "bob").await;
    let amy = seed_user(&db, "amy").await;
    let photo = seed_photo(&db, &owner, "https://img.example.com/p.jpg").await;
    let other = seed_photo(&db, &owner, "https://img.example.com/q.jpg").await;

    likes::create_like(&db, bob.id, photo.id).await.unwrap();
    likes::create_like(&db, amy.id, photo.id).await.unwrap();
    likes::create_like(&db, owner.id, other.id).await.unwrap();

    let fans: Vec<String> = photos::list_fans(&db, photo.id)
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.username)
        .collect();
    assert_eq!(fans, vec!["amy".to_string(), "bob".to_string()]);

    assert!(matches!(
        photos::list_fans(&db, other.id + 100).await,
        Err(StoreError::NotFound { .. })
    ));
}

#[actix_web::test]
async fn test_feed_page_far_past_the_end_is_empty() {
    let db = fresh_pool().await;
    let owner = seed_user(&db, "owner").await;
    seed_photo(&db, &owner, "https://img.example.com/only.jpg").await;

    // page * limit overflows u64
    let overflowing = feed::list_feed(&db, None, u64::MAX, 100).await.unwrap();
    assert!(overflowing.is_empty());

    // offset fits in u64 but not in a signed 64-bit bind parameter
    let unbindable = feed::list_feed(&db, None, u64::MAX / 100, 100).await.unwrap();
    assert!(unbindable.is_empty());

    let huge_limit = feed::list_feed(&db, None, 1, u64::MAX).await.unwrap();
    assert_eq!(huge_limit.len(), 1);
}

#[actix_web::test]
async fn test_racing_signups_report_the_colliding_username() {
    let db = fresh_pool().await;

    let (a, b) = futures::join!(
        users::create_user(
            &db,
            NewUser {
                email: "first@m.com".to_string(),
                username: "sameName".to_string(),
                password_hash: "x".to_string(),
            },
        ),
        users::create_user(
            &db,
            NewUser {
                email: "second@m.com".to_string(),
                username: "sameName".to_string(),
                password_hash: "x".to_string(),
            },
        )
    );

    let (created, failed) = match (a, b) {
        (Ok(user), Err(err)) | (Err(err), Ok(user)) => (user, err),
        other => panic!("expected exactly one signup to succeed, got {:?}", other),
    };
    assert_eq!(created.username, "sameName");

    let errors = expect_validation(failed);
    assert!(errors.has("username", ValidationKind::Taken));
    assert!(
        !errors.has("email", ValidationKind::Taken),
        "the emails differ, so email must not be reported as taken"
    );
    assert_eq!(users::list_users(&db).await.unwrap().len(), 1);
}
