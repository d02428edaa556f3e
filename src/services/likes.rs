use crate::db::DbPool;
use crate::entities::{like, photo, user};
use crate::errors::{StoreError, ValidationErrors, ValidationKind};
use crate::services::policy;
use chrono::Utc;
use sea_orm::{EntityTrait, Set};

/// Records that `user_id` likes `photo_id`.
///
/// A second like for the same pair is rejected as `photo: Taken`. The check
/// is the unique index on `(user_id, photo_id)`, so concurrent duplicates
/// still leave exactly one row.
pub async fn create_like(
    db: &DbPool,
    user_id: i64,
    photo_id: i64,
) -> Result<like::Model, StoreError> {
    let mut errors = ValidationErrors::new();
    if user::Entity::find_by_id(user_id).one(db).await?.is_none() {
        errors.add("user", ValidationKind::Missing);
    }
    if photo::Entity::find_by_id(photo_id).one(db).await?.is_none() {
        errors.add("photo", ValidationKind::Missing);
    }
    errors.into_result()?;

    let new_like = like::ActiveModel {
        photo_id: Set(photo_id),
        user_id: Set(user_id),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let like = like::Entity::insert(new_like)
        .exec_with_returning(db)
        .await
        .map_err(|e| StoreError::from_insert(e, "photo", "photo"))?;

    log::info!("User {} liked photo {}", user_id, photo_id);
    Ok(like)
}

/// Removes a like. Only the user who created it may do so.
pub async fn delete_like(db: &DbPool, like_id: i64, user_id: i64) -> Result<(), StoreError> {
    let like = like::Entity::find_by_id(like_id)
        .one(db)
        .await?
        .ok_or_else(|| StoreError::not_found("like", like_id))?;

    if !policy::can_delete_like(&like, user_id) {
        log::warn!(
            "User {} tried to delete like {} owned by user {}",
            user_id,
            like_id,
            like.user_id
        );
        return Err(StoreError::Forbidden {
            user_id,
            resource: "like",
            id: like_id,
        });
    }

    let result = like::Entity::delete_by_id(like_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(StoreError::not_found("like", like_id));
    }

    log::info!("User {} unliked photo {}", user_id, like.photo_id);
    Ok(())
}
