use crate::auth::verify_token;
use crate::config::Config;
use actix_web::{web, Error, FromRequest, HttpRequest};
use std::future::{ready, Ready};

/// The acting user, taken from an `Authorization: Bearer <jwt>` header.
///
/// Use `Option<AuthenticatedUser>` on endpoints that also serve anonymous
/// viewers.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub username: String,
}

impl AuthenticatedUser {
    fn from_header(req: &HttpRequest) -> Result<Self, Error> {
        let token = req
            .headers()
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| {
                actix_web::error::ErrorUnauthorized("Missing or invalid authorization header")
            })?;

        let config = req.app_data::<web::Data<Config>>().ok_or_else(|| {
            log::error!("Config is not registered as app data");
            actix_web::error::ErrorInternalServerError("Server misconfigured")
        })?;

        let claims = verify_token(token, &config.jwt.secret).map_err(|e| {
            log::debug!("Rejected bearer token: {:?}", e);
            actix_web::error::ErrorUnauthorized("Invalid token")
        })?;

        let user_id = claims
            .user_id()
            .ok_or_else(|| actix_web::error::ErrorUnauthorized("Invalid token"))?;

        Ok(AuthenticatedUser {
            user_id,
            username: claims.username,
        })
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(Self::from_header(req))
    }
}
