//! Authentication and authorization extractors.
//!
//! - [`auth`]: [`auth::AuthUser`] validates the bearer token
//! - [`role`]: Role-gated extractors built on top of `AuthUser`
//!
//! # Authentication Flow
//!
//! 1. Client sends request with `Authorization: Bearer <token>` header
//! 2. `AuthUser` validates the JWT and extracts claims (401 on failure)
//! 3. Role extractors check the role carried in the claims (403 on mismatch)
//! 4. Handler executes if all checks pass
//!
//! ```ignore
//! use crate::middleware::role::RequireAdmin;
//!
//! async fn create_teacher(RequireAdmin(auth_user): RequireAdmin) -> impl IntoResponse {
//!     // Only executes for admins
//! }
//! ```

pub mod auth;
pub mod role;
