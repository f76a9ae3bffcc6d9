//! # SchoolHub Core
//!
//! Core types, errors, and utilities for the SchoolHub API.
//!
//! - [`codes`]: Student/teacher short-code generation and the uniqueness resolver
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`file_storage`]: Storage backends for uploaded avatars
//! - [`password`]: Password hashing, verification and temporary password generation
//! - [`serde`]: Custom serde deserialization helpers
//!
//! # Example
//!
//! ```ignore
//! use schoolhub_core::codes::{CodeKind, resolve_unique_code};
//! use schoolhub_core::errors::AppError;
//!
//! let mut rng = rand::rngs::StdRng::from_entropy();
//! let code = resolve_unique_code(CodeKind::Student, &mut rng, 10, |candidate| async move {
//!     student_code_exists(&pool, &candidate).await
//! })
//! .await?;
//! ```

pub mod codes;
pub mod errors;
pub mod file_storage;
pub mod password;
pub mod serde;

pub use codes::{CodeKind, CodeRandom, RetriesExhausted, resolve_unique_code};
pub use errors::AppError;
pub use password::{generate_temporary_password, hash_password, verify_password};
