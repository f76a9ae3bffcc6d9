//! Classes module: CRUD over classes with their assigned teacher, weekly
//! schedule and enrolled student count.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
