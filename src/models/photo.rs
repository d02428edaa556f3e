use crate::entities::{like, photo};
use crate::models::UserSummary;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePhotoRequest {
    #[schema(example = "https://images.example.com/sunset.jpg")]
    pub image: String,
    pub caption: Option<String>,
}

/// Fields left out keep their current value.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdatePhotoRequest {
    pub image: Option<String>,
    pub caption: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CommentRequest {
    #[schema(example = "Great shot!")]
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PhotoResponse {
    pub id: i64,
    pub user_id: i64,
    pub image: String,
    pub caption: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<photo::Model> for PhotoResponse {
    fn from(photo: photo::Model) -> Self {
        PhotoResponse {
            id: photo.id,
            user_id: photo.user_id,
            image: photo.image,
            caption: photo.caption,
            created_at: photo.created_at,
            updated_at: photo.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CommentResponse {
    pub id: i64,
    pub photo_id: i64,
    pub author: UserSummary,
    pub body: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LikeResponse {
    pub id: i64,
    pub photo_id: i64,
    pub user_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<like::Model> for LikeResponse {
    fn from(like: like::Model) -> Self {
        LikeResponse {
            id: like.id,
            photo_id: like.photo_id,
            user_id: like.user_id,
            created_at: like.created_at,
        }
    }
}

/// A photo with everything the feed shows next to it, seen by one viewer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedPhoto {
    pub id: i64,
    pub owner: UserSummary,
    pub image: String,
    pub caption: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub comments: Vec<CommentResponse>,
    pub like_count: i64,
    pub liked_by_viewer: bool,
    /// Id of the viewer's own like, needed to remove it.
    pub viewer_like_id: Option<i64>,
    pub can_edit: bool,
    pub can_delete: bool,
}
