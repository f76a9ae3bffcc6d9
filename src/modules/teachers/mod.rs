//! Teachers module.
//!
//! Admins provision teachers; a staff ID (`T-AB123`) is generated when none
//! is supplied, and a temporary password is generated and returned once when
//! the request carries no password.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
