//! Students module.
//!
//! Provisioning creates the user account and the student record in one
//! transaction and assigns a unique student code (`AB123`) unless the caller
//! supplies one.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
