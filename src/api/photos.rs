use crate::auth::AuthenticatedUser;
use crate::db::DbPool;
use crate::models::{
    CommentRequest, CommentResponse, CreatePhotoRequest, FeedPhoto, LikeResponse, PhotoResponse,
    UpdatePhotoRequest, UserResponse,
};
use crate::services::photos::PhotoChanges;
use crate::services::{comments, feed, likes, photos};
use actix_web::{web, HttpResponse, Result as ActixResult};
use serde::Deserialize;
use serde_json::json;

const DEFAULT_PAGE_SIZE: u64 = 20;
const MAX_PAGE_SIZE: u64 = 100;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct FeedQuery {
    #[schema(example = 1)]
    pub page: Option<u64>,
    #[schema(example = 20)]
    pub limit: Option<u64>,
}

impl FeedQuery {
    fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    fn limit(&self) -> u64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }
}

#[utoipa::path(
    get,
    path = "/api/photos",
    params(
        ("page" = Option<u64>, Query, description = "Page number (default: 1)"),
        ("limit" = Option<u64>, Query, description = "Items per page (default: 20, max: 100)")
    ),
    responses(
        (status = 200, description = "Feed, newest photo first", body = Vec<FeedPhoto>)
    ),
    tag = "photos"
)]
pub async fn get_feed(
    user: Option<AuthenticatedUser>,
    pool: web::Data<DbPool>,
    query: web::Query<FeedQuery>,
) -> ActixResult<HttpResponse> {
    let viewer_id = user.map(|u| u.user_id);
    let feed = feed::list_feed(pool.get_ref(), viewer_id, query.page(), query.limit()).await?;
    Ok(HttpResponse::Ok().json(feed))
}

#[utoipa::path(
    post,
    path = "/api/photos",
    request_body = CreatePhotoRequest,
    responses(
        (status = 201, description = "Photo uploaded", body = PhotoResponse),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Blank image")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "photos"
)]
pub async fn create_photo(
    req: web::Json<CreatePhotoRequest>,
    user: AuthenticatedUser,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    let req = req.into_inner();
    let photo = photos::create_photo(pool.get_ref(), user.user_id, &req.image, req.caption).await?;
    Ok(HttpResponse::Created().json(PhotoResponse::from(photo)))
}

#[utoipa::path(
    get,
    path = "/api/photos/{photo_id}",
    params(
        ("photo_id" = i64, Path, description = "Photo ID")
    ),
    responses(
        (status = 200, description = "Photo with comments and likes", body = FeedPhoto),
        (status = 404, description = "Photo not found")
    ),
    tag = "photos"
)]
pub async fn get_photo(
    path: web::Path<i64>,
    user: Option<AuthenticatedUser>,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    let viewer_id = user.map(|u| u.user_id);
    let photo = feed::find_photo(pool.get_ref(), path.into_inner(), viewer_id).await?;
    Ok(HttpResponse::Ok().json(photo))
}

#[utoipa::path(
    put,
    path = "/api/photos/{photo_id}",
    params(
        ("photo_id" = i64, Path, description = "Photo ID")
    ),
    request_body = UpdatePhotoRequest,
    responses(
        (status = 200, description = "Photo updated", body = PhotoResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Photo belongs to another user"),
        (status = 404, description = "Photo not found"),
        (status = 422, description = "Blank image")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "photos"
)]
pub async fn update_photo(
    path: web::Path<i64>,
    req: web::Json<UpdatePhotoRequest>,
    user: AuthenticatedUser,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    let req = req.into_inner();
    let changes = PhotoChanges {
        image: req.image,
        caption: req.caption,
    };
    let photo = photos::update_photo(pool.get_ref(), path.into_inner(), user.user_id, changes).await?;
    Ok(HttpResponse::Ok().json(PhotoResponse::from(photo)))
}

#[utoipa::path(
    delete,
    path = "/api/photos/{photo_id}",
    params(
        ("photo_id" = i64, Path, description = "Photo ID")
    ),
    responses(
        (status = 200, description = "Photo deleted with its comments and likes"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Photo belongs to another user"),
        (status = 404, description = "Photo not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "photos"
)]
pub async fn delete_photo(
    path: web::Path<i64>,
    user: AuthenticatedUser,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    photos::delete_photo(pool.get_ref(), path.into_inner(), user.user_id).await?;
    Ok(HttpResponse::Ok().json(json!({"message": "Photo deleted"})))
}

#[utoipa::path(
    get,
    path = "/api/photos/{photo_id}/comments",
    params(
        ("photo_id" = i64, Path, description = "Photo ID")
    ),
    responses(
        (status = 200, description = "Comments, oldest first", body = Vec<CommentResponse>),
        (status = 404, description = "Photo not found")
    ),
    tag = "photos"
)]
pub async fn get_comments(
    path: web::Path<i64>,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    let comments = comments::list_comments(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(comments))
}

#[utoipa::path(
    post,
    path = "/api/photos/{photo_id}/comments",
    params(
        ("photo_id" = i64, Path, description = "Photo ID")
    ),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Blank body or missing photo")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "photos"
)]
pub async fn comment_photo(
    path: web::Path<i64>,
    req: web::Json<CommentRequest>,
    user: AuthenticatedUser,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    let comment =
        comments::create_comment(pool.get_ref(), user.user_id, path.into_inner(), &req.body)
            .await?;
    Ok(HttpResponse::Created().json(comment))
}

#[utoipa::path(
    get,
    path = "/api/photos/{photo_id}/fans",
    params(
        ("photo_id" = i64, Path, description = "Photo ID")
    ),
    responses(
        (status = 200, description = "Users who liked the photo", body = Vec<UserResponse>),
        (status = 404, description = "Photo not found")
    ),
    tag = "photos"
)]
pub async fn get_fans(path: web::Path<i64>, pool: web::Data<DbPool>) -> ActixResult<HttpResponse> {
    let fans: Vec<UserResponse> = photos::list_fans(pool.get_ref(), path.into_inner())
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(fans))
}

#[utoipa::path(
    post,
    path = "/api/photos/{photo_id}/likes",
    params(
        ("photo_id" = i64, Path, description = "Photo ID")
    ),
    responses(
        (status = 201, description = "Photo liked", body = LikeResponse),
        (status = 401, description = "Unauthorized"),
        (status = 422, description = "Already liked, or photo missing")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "photos"
)]
pub async fn like_photo(
    path: web::Path<i64>,
    user: AuthenticatedUser,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    let like = likes::create_like(pool.get_ref(), user.user_id, path.into_inner()).await?;
    Ok(HttpResponse::Created().json(LikeResponse::from(like)))
}
