pub mod auth;
pub mod likes;
pub mod photos;
pub mod users;

use crate::models::{
    AuthResponse, CommentRequest, CommentResponse, CreatePhotoRequest, FeedPhoto, LikeResponse,
    LoginRequest, PhotoResponse, SignupRequest, UpdatePhotoRequest, UserResponse, UserSummary,
};
use actix_web::web;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth endpoints
        auth::signup,
        auth::login,
        // User endpoints
        users::list_users,
        users::current_user,
        users::get_user,
        // Photo endpoints
        photos::get_feed,
        photos::create_photo,
        photos::get_photo,
        photos::update_photo,
        photos::delete_photo,
        photos::get_comments,
        photos::comment_photo,
        photos::get_fans,
        photos::like_photo,
        // Like endpoints
        likes::delete_like,
    ),
    components(schemas(
        // Auth schemas
        SignupRequest,
        LoginRequest,
        AuthResponse,
        UserResponse,
        UserSummary,
        // Photo schemas
        CreatePhotoRequest,
        UpdatePhotoRequest,
        PhotoResponse,
        FeedPhoto,
        CommentRequest,
        CommentResponse,
        LikeResponse,
        // Query schemas
        photos::FeedQuery,
    )),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "User profiles"),
        (name = "photos", description = "Photos, comments and likes"),
        (name = "likes", description = "Like management"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

/// Registers every `/api` route. Shared by the server and the integration tests.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::scope("/auth")
                    .route("/signup", web::post().to(auth::signup))
                    .route("/login", web::post().to(auth::login)),
            )
            .service(
                web::scope("/users")
                    .route("", web::get().to(users::list_users))
                    .route("/me", web::get().to(users::current_user))
                    .route("/{user_id}", web::get().to(users::get_user)),
            )
            .service(
                web::scope("/photos")
                    .route("", web::get().to(photos::get_feed))
                    .route("", web::post().to(photos::create_photo))
                    .route("/{photo_id}", web::get().to(photos::get_photo))
                    .route("/{photo_id}", web::put().to(photos::update_photo))
                    .route("/{photo_id}", web::delete().to(photos::delete_photo))
                    .route("/{photo_id}/comments", web::get().to(photos::get_comments))
                    .route("/{photo_id}/comments", web::post().to(photos::comment_photo))
                    .route("/{photo_id}/fans", web::get().to(photos::get_fans))
                    .route("/{photo_id}/likes", web::post().to(photos::like_photo)),
            )
            .service(
                web::scope("/likes").route("/{like_id}", web::delete().to(likes::delete_like)),
            ),
    );
}

use utoipa::Modify;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
