use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::{error, warn};

use super::{jwt::JwtKeys, repo_types::User};
use crate::{error::ApiError, state::AppState};

/// Validates the bearer JWT and resolves the acting user.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("missing Authorization header".into()))?;

        // Expect "Bearer <token>"
        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or_else(|| ApiError::Unauthorized("invalid auth scheme".into()))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify_access(token).map_err(|e| {
            warn!(error = %e, "rejected token");
            ApiError::Unauthorized("invalid or expired token".into())
        })?;

        match state.store.find_user(claims.sub).await {
            Ok(Some(user)) => Ok(AuthUser(user)),
            Ok(None) => {
                warn!(user_id = %claims.sub, "token subject does not exist");
                Err(ApiError::Unauthorized("user not found".into()))
            }
            Err(e) => {
                error!(error = %e, user_id = %claims.sub, "user lookup failed");
                Err(e.into())
            }
        }
    }
}
