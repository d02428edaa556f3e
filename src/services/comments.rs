use crate::db::DbPool;
use crate::entities::{comment, photo, user};
use crate::errors::{StoreError, ValidationErrors, ValidationKind};
use crate::models::{CommentResponse, UserSummary};
use chrono::Utc;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

pub async fn create_comment(
    db: &DbPool,
    author_id: i64,
    photo_id: i64,
    body: &str,
) -> Result<CommentResponse, StoreError> {
    let mut errors = ValidationErrors::new();
    let author = user::Entity::find_by_id(author_id).one(db).await?;
    if author.is_none() {
        errors.add("user", ValidationKind::Missing);
    }
    if photo::Entity::find_by_id(photo_id).one(db).await?.is_none() {
        errors.add("photo", ValidationKind::Missing);
    }
    errors.require_present("body", body);
    errors.into_result()?;

    let new_comment = comment::ActiveModel {
        photo_id: Set(photo_id),
        user_id: Set(author_id),
        body: Set(body.trim().to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    // A photo deleted since the check above surfaces as a foreign key failure.
    let comment = comment::Entity::insert(new_comment)
        .exec_with_returning(db)
        .await
        .map_err(|e| StoreError::from_insert(e, "body", "photo"))?;

    log::info!("User {} commented on photo {}", author_id, photo_id);

    let author = author.ok_or_else(|| StoreError::not_found("user", author_id))?;
    Ok(with_author(comment, &author))
}

/// Comments of a photo, oldest first.
pub async fn list_comments(db: &DbPool, photo_id: i64) -> Result<Vec<CommentResponse>, StoreError> {
    if photo::Entity::find_by_id(photo_id).one(db).await?.is_none() {
        return Err(StoreError::not_found("photo", photo_id));
    }

    let rows = comment::Entity::find()
        .filter(comment::Column::PhotoId.eq(photo_id))
        .find_also_related(user::Entity)
        .order_by_asc(comment::Column::CreatedAt)
        .order_by_asc(comment::Column::Id)
        .all(db)
        .await?;

    rows.into_iter()
        .map(|(comment, author)| {
            let author = author.ok_or_else(|| StoreError::not_found("user", comment.user_id))?;
            Ok(with_author(comment, &author))
        })
        .collect()
}

pub(crate) fn with_author(comment: comment::Model, author: &user::Model) -> CommentResponse {
    CommentResponse {
        id: comment.id,
        photo_id: comment.photo_id,
        author: UserSummary::from(author),
        body: comment.body,
        created_at: comment.created_at,
    }
}
