//! Role-based authorization.
//!
//! Roles travel in the JWT, so checks need no database round trip. Use one of
//! the extractors below in a handler signature, or [`check_any_role`] when the
//! allowed roles depend on the request.

use schoolhub_core::AppError;
use schoolhub_models::UserRole;

use crate::middleware::auth::AuthUser;

/// Fails with 403 unless the user holds one of `allowed`.
pub fn check_any_role(auth_user: &AuthUser, allowed: &[UserRole]) -> Result<UserRole, AppError> {
    let role = auth_user.role()?;

    if !allowed.contains(&role) {
        return Err(AppError::forbidden("Forbidden".to_string()));
    }

    Ok(role)
}

/// Declares an extractor that wraps [`AuthUser`] and admits only the listed roles.
#[macro_export]
macro_rules! require_roles {
    ($name:ident, [$($role:expr),+ $(,)?]) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = $crate::schoolhub_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user = <$crate::middleware::auth::AuthUser as axum::extract::FromRequestParts<
                    $crate::state::AppState,
                >>::from_request_parts(parts, state)
                .await?;

                $crate::middleware::role::check_any_role(&auth_user, &[$($role),+])?;

                Ok($name(auth_user))
            }
        }
    };
}

require_roles!(RequireAdmin, [UserRole::Admin]);
require_roles!(RequireStaff, [UserRole::Admin, UserRole::Teacher]);
require_roles!(
    RequireStudentViewer,
    [UserRole::Admin, UserRole::Teacher, UserRole::Student]
);

#[cfg(test)]
mod tests {
    use super::*;
    use schoolhub_auth::Claims;
    use uuid::Uuid;

    fn user_with_role(role: &str) -> AuthUser {
        AuthUser(Claims {
            sub: Uuid::new_v4().to_string(),
            email: "test@example.com".to_string(),
            role: role.to_string(),
            exp: 9999999999,
            iat: 1234567890,
        })
    }

    #[test]
    fn test_allowed_role_passes() {
        let teacher = user_with_role("teacher");
        assert_eq!(
            check_any_role(&teacher, &[UserRole::Admin, UserRole::Teacher]).unwrap(),
            UserRole::Teacher
        );
    }

    #[test]
    fn test_other_role_is_forbidden() {
        let parent = user_with_role("parent");
        let err = check_any_role(&parent, &[UserRole::Admin]).unwrap_err();
        assert_eq!(err.status.as_u16(), 403);
    }

    #[test]
    fn test_unknown_role_is_unauthorized() {
        let unknown = user_with_role("superuser");
        let err = check_any_role(&unknown, &[UserRole::Admin]).unwrap_err();
        assert_eq!(err.status.as_u16(), 401);
    }
}
