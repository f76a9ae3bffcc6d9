//! # SchoolHub Auth
//!
//! JWT claims and token helpers.
//!
//! ```ignore
//! use schoolhub_auth::{create_access_token, verify_token};
//!
//! let token = create_access_token(user_id, "admin@school.test", "admin", &jwt_config)?;
//! let claims = verify_token(&token, &jwt_config)?;
//! assert_eq!(claims.role, "admin");
//! ```

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
