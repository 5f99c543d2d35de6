//! Request extractors
//!
//! Identity arrives pre-authenticated from the upstream gateway as
//! `X-Actor-Id` and `X-Actor-Role` headers; authentication itself lives
//! outside this service.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::api::error::ApiError;
use crate::models::event::{Actor, ActorRole};
use crate::utils::errors::GuestPassError;

pub const ACTOR_ID_HEADER: &str = "x-actor-id";
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

#[axum::async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(ACTOR_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<i64>().ok())
            .ok_or_else(|| {
                ApiError(GuestPassError::PermissionDenied(
                    "Missing or invalid X-Actor-Id header".to_string(),
                ))
            })?;

        let role = match parts
            .headers
            .get(ACTOR_ROLE_HEADER)
            .and_then(|value| value.to_str().ok())
        {
            Some("platform_admin") => ActorRole::PlatformAdmin,
            Some("company_admin") => ActorRole::CompanyAdmin,
            _ => {
                return Err(ApiError(GuestPassError::PermissionDenied(
                    "Missing or invalid X-Actor-Role header".to_string(),
                )))
            }
        };

        Ok(Actor { user_id, role })
    }
}
