//! Student data models and DTOs.
//!
//! This module re-exports student models from the `schoolhub-models` crate.

pub use schoolhub_models::auth::MessageResponse;
pub use schoolhub_models::students::*;
