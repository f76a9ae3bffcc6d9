pub mod admin;
pub mod auth;
pub mod classes;
pub mod fees;
pub mod students;
pub mod teachers;
