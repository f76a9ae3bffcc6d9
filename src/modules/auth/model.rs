//! Authentication DTOs, re-exported from `schoolhub-models`.

pub use schoolhub_models::auth::*;
pub use schoolhub_models::users::{User, UserCredentials, UserRole};
