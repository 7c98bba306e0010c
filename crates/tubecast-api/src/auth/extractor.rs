//! Bearer-token extractor.
//!
//! Implemented as `FromRequestParts` so it composes with `Multipart`, which
//! consumes the request body.

use crate::auth::jwt;
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts};
use std::sync::Arc;
use tubecast_core::AppError;
use uuid::Uuid;

/// The authenticated caller, resolved from the `Authorization` header.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Uuid);

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Couldn't find JWT".to_string()))?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Couldn't find JWT".to_string()))
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = HttpAppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let user_id = jwt::validate_jwt(token, state.config.jwt_secret())?;
        Ok(AuthUser(user_id))
    }
}
