use crate::auth::AuthenticatedUser;
use crate::db::DbPool;
use crate::services::likes;
use actix_web::{web, HttpResponse, Result as ActixResult};
use serde_json::json;

#[utoipa::path(
    delete,
    path = "/api/likes/{like_id}",
    params(
        ("like_id" = i64, Path, description = "Like ID")
    ),
    responses(
        (status = 200, description = "Like removed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Like belongs to another user"),
        (status = 404, description = "Like not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "likes"
)]
pub async fn delete_like(
    path: web::Path<i64>,
    user: AuthenticatedUser,
    pool: web::Data<DbPool>,
) -> ActixResult<HttpResponse> {
    likes::delete_like(pool.get_ref(), path.into_inner(), user.user_id).await?;
    Ok(HttpResponse::Ok().json(json!({"message": "Like removed"})))
}
