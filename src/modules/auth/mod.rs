//! Authentication module.
//!
//! Registration, login, the current user and profile updates. Admin accounts
//! cannot be registered here; they are created with the CLI.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
