use crate::db::DbPool;
use crate::entities::{comment, like, photo, user};
use crate::errors::{StoreError, ValidationErrors, ValidationKind};
use crate::services::policy;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};

#[derive(Debug, Clone, Default)]
pub struct PhotoChanges {
    pub image: Option<String>,
    pub caption: Option<String>,
}

fn normalize_caption(caption: Option<String>) -> Option<String> {
    caption
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

/// Uploads a photo for `owner_id`. The owner must exist and the image
/// reference must not be blank.
pub async fn create_photo(
    db: &DbPool,
    owner_id: i64,
    image: &str,
    caption: Option<String>,
) -> Result<photo::Model, StoreError> {
    let mut errors = ValidationErrors::new();
    if user::Entity::find_by_id(owner_id).one(db).await?.is_none() {
        errors.add("user", ValidationKind::Missing);
    }
    errors.require_present("image", image);
    errors.into_result()?;

    let now = Utc::now();
    let new_photo = photo::ActiveModel {
        user_id: Set(owner_id),
        image: Set(image.trim().to_string()),
        caption: Set(normalize_caption(caption)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let photo = photo::Entity::insert(new_photo)
        .exec_with_returning(db)
        .await
        .map_err(|e| StoreError::from_insert(e, "image", "user"))?;

    log::info!("User {} uploaded photo {}", owner_id, photo.id);
    Ok(photo)
}

/// Edits a photo on behalf of `user_id`, who must own it.
pub async fn update_photo(
    db: &DbPool,
    photo_id: i64,
    user_id: i64,
    changes: PhotoChanges,
) -> Result<photo::Model, StoreError> {
    let txn = db.begin().await?;

    let photo = photo::Entity::find_by_id(photo_id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or_else(|| StoreError::not_found("photo", photo_id))?;

    if !policy::can_edit(&photo, user_id) {
        log::warn!(
            "User {} tried to edit photo {} owned by user {}",
            user_id,
            photo_id,
            photo.user_id
        );
        return Err(StoreError::Forbidden {
            user_id,
            resource: "photo",
            id: photo_id,
        });
    }

    let mut errors = ValidationErrors::new();
    if let Some(image) = &changes.image {
        errors.require_present("image", image);
    }
    errors.into_result()?;

    let mut active: photo::ActiveModel = photo.into();
    if let Some(image) = changes.image {
        active.image = Set(image.trim().to_string());
    }
    if changes.caption.is_some() {
        active.caption = Set(normalize_caption(changes.caption));
    }
    active.updated_at = Set(Utc::now());

    let photo = active.update(&txn).await?;
    txn.commit().await?;

    log::info!("User {} edited photo {}", user_id, photo_id);
    Ok(photo)
}

/// Deletes a photo together with all of its comments and likes.
///
/// Ownership is checked before anything is removed. The whole cascade runs in
/// one transaction with the photo row locked, so readers never observe a
/// photo without its dependents or dependents without their photo.
pub async fn delete_photo(db: &DbPool, photo_id: i64, user_id: i64) -> Result<(), StoreError> {
    let txn = db.begin().await?;

    let photo = photo::Entity::find_by_id(photo_id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or_else(|| StoreError::not_found("photo", photo_id))?;

    if !policy::can_delete(&photo, user_id) {
        log::warn!(
            "User {} tried to delete photo {} owned by user {}",
            user_id,
            photo_id,
            photo.user_id
        );
        return Err(StoreError::Forbidden {
            user_id,
            resource: "photo",
            id: photo_id,
        });
    }

    let comments = comment::Entity::delete_many()
        .filter(comment::Column::PhotoId.eq(photo_id))
        .exec(&txn)
        .await?;
    let likes = like::Entity::delete_many()
        .filter(like::Column::PhotoId.eq(photo_id))
        .exec(&txn)
        .await?;
    photo::Entity::delete_by_id(photo_id).exec(&txn).await?;

    txn.commit().await?;

    log::info!(
        "User {} deleted photo {} ({} comments, {} likes)",
        user_id,
        photo_id,
        comments.rows_affected,
        likes.rows_affected
    );
    Ok(())
}

/// Users who liked the photo (its fans), by username.
pub async fn list_fans(db: &DbPool, photo_id: i64) -> Result<Vec<user::Model>, StoreError> {
    let photo = photo::Entity::find_by_id(photo_id)
        .one(db)
        .await?
        .ok_or_else(|| StoreError::not_found("photo", photo_id))?;

    let fans = photo
        .find_linked(photo::Fans)
        .order_by_asc(user::Column::Username)
        .all(db)
        .await?;
    Ok(fans)
}
