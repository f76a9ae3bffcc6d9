use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use schoolhub_auth::{Claims, verify_token};
use schoolhub_core::AppError;
use schoolhub_models::UserRole;
use uuid::Uuid;

use crate::state::AppState;

/// Extractor that validates the bearer JWT and exposes its claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn user_id(&self) -> Result<Uuid, AppError> {
        Uuid::parse_str(&self.0.sub)
            .map_err(|_| AppError::unauthorized("Invalid user ID in token".to_string()))
    }

    pub fn role(&self) -> Result<UserRole, AppError> {
        self.0
            .role
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid role in token".to_string()))
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Authorization required".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::unauthorized("Invalid authorization header format".to_string())
        })?;

        let claims = verify_token(token, &state.jwt_config)?;

        Ok(AuthUser(claims))
    }
}
