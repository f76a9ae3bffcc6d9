//! Shared helpers for the feature modules.
//!
//! - [`avatar`]: Inline avatar decoding, pre-checks and storage
//! - [`codes`]: Unique student/teacher code resolution against the database

pub mod avatar;
pub mod codes;
