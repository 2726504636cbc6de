use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use uuid::Uuid;

use crate::domain::auth::Role;
use crate::errors::AppError;

/// Header carrying the authenticated user id, set by the edge proxy.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the authenticated role, set by the edge proxy.
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// The authenticated caller. Session and cookie handling live at the
/// edge; by the time a request reaches this service its identity is a
/// pair of trusted headers.
#[derive(Debug, Clone, Copy)]
pub struct Caller {
    pub user_id: Uuid,
    pub role: Role,
}

impl FromRequest for Caller {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(parse_identity(req))
    }
}

fn parse_identity(req: &HttpRequest) -> Result<Caller, AppError> {
    let user_id = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or(AppError::Unauthorized)?;
    let role = req
        .headers()
        .get(USER_ROLE_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(Role::parse)
        .ok_or(AppError::Unauthorized)?;
    Ok(Caller { user_id, role })
}
