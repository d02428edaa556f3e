use crate::db::DbPool;
use crate::entities::user;
use crate::errors::{StoreError, ValidationErrors, ValidationKind};
use chrono::Utc;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr};

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
}

/// Registers a user. Email and username must be present and unused.
pub async fn create_user(db: &DbPool, new_user: NewUser) -> Result<user::Model, StoreError> {
    let email = new_user.email.trim().to_string();
    let username = new_user.username.trim().to_string();

    let mut errors = ValidationErrors::new();
    errors.require_present("email", &email);
    errors.require_present("username", &username);

    if !email.is_empty() {
        if !email.contains('@') {
            errors.add("email", ValidationKind::Invalid);
        } else if find_user_by_email(db, &email).await?.is_some() {
            errors.add("email", ValidationKind::Taken);
        }
    }

    if !username.is_empty() {
        let existing = user::Entity::find()
            .filter(user::Column::Username.eq(&username))
            .one(db)
            .await?;
        if existing.is_some() {
            errors.add("username", ValidationKind::Taken);
        }
    }

    errors.into_result()?;

    let now = Utc::now();
    let new_user = user::ActiveModel {
        email: Set(email.clone()),
        username: Set(username.clone()),
        password_hash: Set(new_user.password_hash),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    // The unique indexes still decide when two signups race.
    let user = match user::Entity::insert(new_user).exec_with_returning(db).await {
        Ok(user) => user,
        Err(e) => {
            if let Some(SqlErr::UniqueConstraintViolation(_)) = e.sql_err() {
                return Err(taken_fields(db, &email, &username).await?);
            }
            return Err(StoreError::Database(e));
        }
    };

    log::info!("Created user {} ({})", user.id, user.username);
    Ok(user)
}

/// Works out which of `email` / `username` a lost signup race collided on.
async fn taken_fields(db: &DbPool, email: &str, username: &str) -> Result<StoreError, StoreError> {
    let mut errors = ValidationErrors::new();
    if find_user_by_email(db, email).await?.is_some() {
        errors.add("email", ValidationKind::Taken);
    }
    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?;
    if existing.is_some() {
        errors.add("username", ValidationKind::Taken);
    }
    if errors.is_empty() {
        errors.add("email", ValidationKind::Taken);
    }
    Ok(StoreError::Validation(errors))
}

pub async fn find_user(db: &DbPool, user_id: i64) -> Result<user::Model, StoreError> {
    user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or_else(|| StoreError::not_found("user", user_id))
}

pub async fn find_user_by_email(
    db: &DbPool,
    email: &str,
) -> Result<Option<user::Model>, StoreError> {
    let user = user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await?;
    Ok(user)
}

pub async fn list_users(db: &DbPool) -> Result<Vec<user::Model>, StoreError> {
    let users = user::Entity::find()
        .order_by_asc(user::Column::Id)
        .all(db)
        .await?;
    Ok(users)
}
