//! Authentication request and response payloads.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::users::{User, UserRole};

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct RegisterRequestDto {
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    /// Defaults to `student`. Admin accounts cannot self-register.
    pub role: Option<UserRole>,
}

#[derive(Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: User,
}

#[derive(Deserialize, Debug, Default, Validate, ToSchema)]
pub struct UpdateProfileDto {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Image data URL (`data:image/png;base64,...`) or an absolute URL.
    pub avatar: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}
