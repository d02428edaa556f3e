//! Read side: photos with their owner, comments, likes and the viewer's
//! permissions attached.

use crate::db::DbPool;
use crate::entities::{comment, like, photo, user};
use crate::errors::StoreError;
use crate::models::{CommentResponse, FeedPhoto, UserSummary};
use crate::services::comments::with_author;
use crate::services::policy;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};
use std::collections::HashMap;

/// One page of the feed, newest photo first. Pages past the last photo,
/// however large the page number, come back empty.
///
/// Runs in a single transaction so a concurrent photo deletion is seen
/// either entirely or not at all.
pub async fn list_feed(
    db: &DbPool,
    viewer_id: Option<i64>,
    page: u64,
    limit: u64,
) -> Result<Vec<FeedPhoto>, StoreError> {
    // The store binds LIMIT/OFFSET as signed 64-bit integers.
    let max_bound = i64::MAX as u64;
    let offset = match page.saturating_sub(1).checked_mul(limit) {
        Some(offset) if offset <= max_bound => offset,
        _ => return Ok(Vec::new()),
    };
    let limit = limit.min(max_bound);

    let txn = db.begin().await?;
    let photos = photo::Entity::find()
        .find_also_related(user::Entity)
        .order_by_desc(photo::Column::CreatedAt)
        .order_by_desc(photo::Column::Id)
        .limit(limit)
        .offset(offset)
        .all(&txn)
        .await?;
    let feed = attach(&txn, photos, viewer_id).await?;
    txn.commit().await?;

    Ok(feed)
}

/// A single photo with the same attachments as a feed entry.
pub async fn find_photo(
    db: &DbPool,
    photo_id: i64,
    viewer_id: Option<i64>,
) -> Result<FeedPhoto, StoreError> {
    let txn = db.begin().await?;
    let photo = photo::Entity::find_by_id(photo_id)
        .find_also_related(user::Entity)
        .one(&txn)
        .await?
        .ok_or_else(|| StoreError::not_found("photo", photo_id))?;
    let mut feed = attach(&txn, vec![photo], viewer_id).await?;
    txn.commit().await?;

    feed.pop()
        .ok_or_else(|| StoreError::not_found("photo", photo_id))
}

async fn attach<C: ConnectionTrait>(
    db: &C,
    photos: Vec<(photo::Model, Option<user::Model>)>,
    viewer_id: Option<i64>,
) -> Result<Vec<FeedPhoto>, StoreError> {
    if photos.is_empty() {
        return Ok(Vec::new());
    }
    let photo_ids: Vec<i64> = photos.iter().map(|(p, _)| p.id).collect();

    let comment_rows = comment::Entity::find()
        .filter(comment::Column::PhotoId.is_in(photo_ids.clone()))
        .find_also_related(user::Entity)
        .order_by_asc(comment::Column::CreatedAt)
        .order_by_asc(comment::Column::Id)
        .all(db)
        .await?;

    let mut comments: HashMap<i64, Vec<CommentResponse>> = HashMap::new();
    for (comment, author) in comment_rows {
        let author = author.ok_or_else(|| StoreError::not_found("user", comment.user_id))?;
        comments
            .entry(comment.photo_id)
            .or_default()
            .push(with_author(comment, &author));
    }

    let likes = like::Entity::find()
        .filter(like::Column::PhotoId.is_in(photo_ids))
        .all(db)
        .await?;

    let mut like_counts: HashMap<i64, i64> = HashMap::new();
    let mut viewer_likes: HashMap<i64, i64> = HashMap::new();
    for like in likes {
        *like_counts.entry(like.photo_id).or_insert(0) += 1;
        if Some(like.user_id) == viewer_id {
            viewer_likes.insert(like.photo_id, like.id);
        }
    }

    photos
        .into_iter()
        .map(|(photo, owner)| {
            let owner = owner.ok_or_else(|| StoreError::not_found("user", photo.user_id))?;
            let viewer_like_id = viewer_likes.get(&photo.id).copied();
            let can_edit = viewer_id.map_or(false, |v| policy::can_edit(&photo, v));
            let can_delete = viewer_id.map_or(false, |v| policy::can_delete(&photo, v));

            Ok(FeedPhoto {
                id: photo.id,
                owner: UserSummary::from(&owner),
                comments: comments.remove(&photo.id).unwrap_or_default(),
                like_count: like_counts.get(&photo.id).copied().unwrap_or(0),
                liked_by_viewer: viewer_like_id.is_some(),
                viewer_like_id,
                can_edit,
                can_delete,
                image: photo.image,
                caption: photo.caption,
                created_at: photo.created_at,
            })
        })
        .collect()
}
