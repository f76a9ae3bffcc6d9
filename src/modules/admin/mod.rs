//! Admin module: database health and the featured teacher.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;
