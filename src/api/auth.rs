use crate::auth::{hash_password, issue_token, verify_password};
use crate::config::Config;
use crate::db::DbPool;
use crate::errors::{StoreError, ValidationKind};
use crate::models::{AuthResponse, LoginRequest, SignupRequest, UserResponse};
use crate::services::users::{self, NewUser};
use actix_web::{web, HttpResponse, Result as ActixResult};
use serde_json::json;

const MIN_PASSWORD_LENGTH: usize = 6;

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created successfully", body = AuthResponse),
        (status = 422, description = "Blank, malformed or already taken email/username")
    ),
    tag = "auth"
)]
pub async fn signup(
    req: web::Json<SignupRequest>,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> ActixResult<HttpResponse> {
    let req = req.into_inner();

    if req.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(StoreError::validation("password", ValidationKind::Invalid).into());
    }

    let password_hash =
        hash_password(&req.password).map_err(actix_web::error::ErrorInternalServerError)?;

    let user = users::create_user(
        pool.get_ref(),
        NewUser {
            email: req.email,
            username: req.username,
            password_hash,
        },
    )
    .await?;

    let token =
        issue_token(&user, &config.jwt).map_err(actix_web::error::ErrorInternalServerError)?;

    Ok(HttpResponse::Created().json(AuthResponse {
        token,
        user: UserResponse::from(user),
    }))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 404, description = "User not found")
    ),
    tag = "auth"
)]
pub async fn login(
    req: web::Json<LoginRequest>,
    pool: web::Data<DbPool>,
    config: web::Data<Config>,
) -> ActixResult<HttpResponse> {
    let user = match users::find_user_by_email(pool.get_ref(), req.email.trim()).await? {
        Some(u) => u,
        None => {
            return Ok(HttpResponse::NotFound().json(json!({
                "error": "User not found"
            })));
        }
    };

    if !verify_password(&req.password, &user.password_hash) {
        return Ok(HttpResponse::Unauthorized().json(json!({
            "error": "Invalid credentials"
        })));
    }

    let token =
        issue_token(&user, &config.jwt).map_err(actix_web::error::ErrorInternalServerError)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user: UserResponse::from(user),
    }))
}
