//! Fee data models and DTOs, re-exported from `schoolhub-models`.

pub use schoolhub_models::auth::MessageResponse;
pub use schoolhub_models::fees::*;
