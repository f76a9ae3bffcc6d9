//! Fees module.
//!
//! A fee's status and paid date are recomputed from its amounts and due date
//! whenever it is saved.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
